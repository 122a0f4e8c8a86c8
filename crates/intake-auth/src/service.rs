//! Registration and login intake.

use crate::error::{IntakeError, Result};
use crate::records::{LoginRequest, RegisterRequest};
use intake_validate::{ConfigError, ExternalCheckAdapter, ValidationResult, Validator};
use std::sync::Arc;

/// Validates registration and login payloads before they reach the
/// account logic.
///
/// ## Example
///
/// ```rust,ignore
/// let intake = AuthIntake::new(InMemoryDirectory::seeded("accounts", ["ada@example.com"]))?;
///
/// if let Err(err) = intake.check_registration(&request).await {
///     let status = status_for(&err);
///     let body = ErrorResponse::from(&err).to_json()?;
///     // respond with `status` and `body`
/// }
/// ```
pub struct AuthIntake {
    validator: Arc<Validator>,
    directory: Arc<dyn ExternalCheckAdapter>,
}

impl AuthIntake {
    /// Create an intake over `directory` with the default validator.
    pub fn new<A>(directory: A) -> std::result::Result<Self, ConfigError>
    where
        A: ExternalCheckAdapter + 'static,
    {
        Self::with_validator(Arc::new(Validator::default()), Arc::new(directory))
    }

    /// Create an intake from a shared validator and directory.
    ///
    /// Both record types are resolved up front, so a schema that does not
    /// fit the validator's registry is reported here rather than on the
    /// first request.
    pub fn with_validator(
        validator: Arc<Validator>,
        directory: Arc<dyn ExternalCheckAdapter>,
    ) -> std::result::Result<Self, ConfigError> {
        validator.prepare::<RegisterRequest>()?;
        validator.prepare::<LoginRequest>()?;
        Ok(Self {
            validator,
            directory,
        })
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Validate a registration payload, including the email uniqueness check.
    pub async fn check_registration(&self, request: &RegisterRequest) -> Result<()> {
        let result = self
            .validator
            .validate_with_checks(request, self.directory.as_ref())
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "Registration check failed");
                err
            })?;
        reject_invalid(result, "Registration validation failed")
    }

    /// Validate a login payload.
    pub fn check_login(&self, request: &LoginRequest) -> Result<()> {
        let result = self.validator.validate(request)?;
        reject_invalid(result, "Invalid input data")
    }
}

fn reject_invalid(result: ValidationResult, message: &str) -> Result<()> {
    result.into_result().map_err(|errors| {
        tracing::debug!(fields = ?errors.fields(), "{}", message);
        IntakeError::invalid(message, errors)
    })
}
