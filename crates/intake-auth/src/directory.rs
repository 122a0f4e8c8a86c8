//! In-memory identifier directory.

use async_trait::async_trait;
use intake_validate::ExternalCheckAdapter;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Identifiers in use, grouped by scope (for development/testing).
///
/// Lookups compare identifiers case-insensitively.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    scopes: RwLock<HashMap<String, HashSet<String>>>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory with `identifiers` already taken in `scope`.
    pub fn seeded<I, S>(scope: &str, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let taken = identifiers
            .into_iter()
            .map(|id| normalize(id.as_ref()))
            .collect();
        Self {
            scopes: RwLock::new(HashMap::from([(scope.to_string(), taken)])),
        }
    }

    /// Mark `identifier` as taken in `scope`.
    ///
    /// Returns `false` if it was already taken.
    pub fn claim(&self, scope: &str, identifier: &str) -> Result<bool, String> {
        let mut scopes = self
            .scopes
            .write()
            .map_err(|e| format!("Failed to acquire lock: {}", e))?;
        Ok(scopes
            .entry(scope.to_string())
            .or_default()
            .insert(normalize(identifier)))
    }

    /// Free `identifier` in `scope`.
    ///
    /// Returns `false` if it was not taken.
    pub fn release(&self, scope: &str, identifier: &str) -> Result<bool, String> {
        let mut scopes = self
            .scopes
            .write()
            .map_err(|e| format!("Failed to acquire lock: {}", e))?;
        Ok(scopes
            .get_mut(scope)
            .is_some_and(|taken| taken.remove(&normalize(identifier))))
    }

    /// Number of identifiers taken in `scope`.
    pub fn count(&self, scope: &str) -> Result<usize, String> {
        let scopes = self
            .scopes
            .read()
            .map_err(|e| format!("Failed to acquire lock: {}", e))?;
        Ok(scopes.get(scope).map_or(0, HashSet::len))
    }
}

#[async_trait]
impl ExternalCheckAdapter for InMemoryDirectory {
    async fn is_identifier_taken(&self, scope: &str, value: &str) -> Result<bool, String> {
        let scopes = self
            .scopes
            .read()
            .map_err(|e| format!("Failed to acquire lock: {}", e))?;
        Ok(scopes
            .get(scope)
            .is_some_and(|taken| taken.contains(&normalize(value))))
    }
}

fn normalize(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}
