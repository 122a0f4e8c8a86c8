//! Error types for the validation engine.
//!
//! Violations are never errors: they are returned as data inside
//! [`ValidationResult`](crate::ValidationResult). The types here cover
//! configuration faults and infrastructure failures of external checks.

use std::time::Duration;
use thiserror::Error;

/// Configuration-time errors.
///
/// A record type whose schema produces one of these cannot be validated
/// until the schema or the registry is fixed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Rule already registered: {0}")]
    DuplicateRule(String),

    #[error("Unknown rule: {0}")]
    UnknownRule(String),

    #[error("Malformed constraint on {record}.{field}: {reason}")]
    MalformedConstraint {
        record: String,
        field: String,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn malformed(
        record: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::MalformedConstraint {
            record: record.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Infrastructure failure of an external check.
///
/// Distinct from a check that ran and reported the value as taken, which is
/// an ordinary violation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExternalCheckError {
    #[error("External check on `{field}` in `{scope}` failed: {reason}")]
    Failed {
        field: String,
        scope: String,
        reason: String,
    },

    #[error("External check on `{field}` in `{scope}` timed out after {timeout:?}")]
    TimedOut {
        field: String,
        scope: String,
        timeout: Duration,
    },
}

impl ExternalCheckError {
    /// Field the failed check was attached to.
    pub fn field(&self) -> &str {
        match self {
            ExternalCheckError::Failed { field, .. } | ExternalCheckError::TimedOut { field, .. } => {
                field
            }
        }
    }
}

/// Errors returned by the [`Validator`](crate::Validator) facade.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    External(#[from] ExternalCheckError),

    #[error("Invalid engine configuration: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
