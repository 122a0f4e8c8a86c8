//! Error types for the intake service.

use intake_validate::FieldErrors;
use thiserror::Error;

/// Result type alias for intake operations
pub type Result<T, E = IntakeError> = std::result::Result<T, E>;

/// Why an intake request was turned away.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The payload failed validation; `errors` holds one message per field.
    #[error("{message}: {errors}")]
    Invalid {
        message: String,
        errors: FieldErrors,
    },

    /// The engine could not finish validating the payload.
    #[error(transparent)]
    Engine(#[from] intake_validate::Error),
}

impl IntakeError {
    pub fn invalid(message: impl Into<String>, errors: FieldErrors) -> Self {
        IntakeError::Invalid {
            message: message.into(),
            errors,
        }
    }

    /// Field errors, if this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            IntakeError::Invalid { errors, .. } => Some(errors),
            IntakeError::Engine(_) => None,
        }
    }
}
