//! External checks: predicates that need state outside the record.

use crate::engine::Violation;
use crate::error::ExternalCheckError;
use crate::resolver::ConstraintSet;
use crate::schema::{ExternalCheckKind, FieldSource};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Lookups the engine delegates to the caller.
///
/// Implementations return `Ok(true)` when the value is already in use,
/// `Ok(false)` when it is free, and `Err` when the lookup itself failed.
///
/// ## Example
///
/// ```rust,ignore
/// use intake_validate::prelude::*;
///
/// struct Accounts { pool: PgPool }
///
/// #[async_trait]
/// impl ExternalCheckAdapter for Accounts {
///     async fn is_identifier_taken(&self, scope: &str, value: &str) -> Result<bool, String> {
///         // SELECT EXISTS(...) against `scope`
///     }
/// }
/// ```
#[async_trait]
pub trait ExternalCheckAdapter: Send + Sync {
    /// Whether `value` is already taken within `scope`.
    async fn is_identifier_taken(&self, scope: &str, value: &str) -> Result<bool, String>;
}

#[async_trait]
impl<T: ExternalCheckAdapter + ?Sized> ExternalCheckAdapter for Arc<T> {
    async fn is_identifier_taken(&self, scope: &str, value: &str) -> Result<bool, String> {
        (**self).is_identifier_taken(scope, value).await
    }
}

/// Run every external check of `set` against `record`.
///
/// Empty values are not looked up; integers and booleans are looked up by
/// their rendered form. Each lookup is bounded by `timeout`; an
/// adapter error or a timeout aborts with [`ExternalCheckError`] rather than
/// being read as either outcome.
pub async fn validate_external(
    set: &ConstraintSet,
    record: &(dyn FieldSource + Sync),
    adapter: &dyn ExternalCheckAdapter,
    timeout: Duration,
) -> Result<Vec<Violation>, ExternalCheckError> {
    let mut violations = Vec::new();

    for check in set.external() {
        let value = record.value(&check.field);
        if value.is_empty() {
            continue;
        }
        let Some(identifier) = value.as_identifier() else {
            continue;
        };

        match &check.kind {
            ExternalCheckKind::IdentifierTaken { scope } => {
                let lookup = adapter.is_identifier_taken(scope, &identifier);
                let taken = match tokio::time::timeout(timeout, lookup).await {
                    Ok(Ok(taken)) => taken,
                    Ok(Err(reason)) => {
                        tracing::warn!(
                            record = set.record(),
                            field = %check.field,
                            scope = %scope,
                            error = %reason,
                            "External check failed"
                        );
                        return Err(ExternalCheckError::Failed {
                            field: check.field.clone(),
                            scope: scope.clone(),
                            reason,
                        });
                    }
                    Err(_) => {
                        tracing::warn!(
                            record = set.record(),
                            field = %check.field,
                            scope = %scope,
                            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                            "External check timed out"
                        );
                        return Err(ExternalCheckError::TimedOut {
                            field: check.field.clone(),
                            scope: scope.clone(),
                            timeout,
                        });
                    }
                };

                if taken {
                    violations.push(Violation::new(&check.field, "unique", value.kind()));
                }
            }
        }
    }

    Ok(violations)
}
