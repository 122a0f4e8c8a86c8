//! Error response envelope and status mapping.

use crate::error::IntakeError;
use http::StatusCode;
use intake_validate::{Error, FieldErrors};
use serde::Serialize;

/// `error` value of envelopes produced by validation failures.
pub const VALIDATION_ERROR: &str = "Validation Error";

/// `error` value of envelopes produced by infrastructure failures.
pub const SERVER_ERROR: &str = "Server Error";

/// JSON body sent back when an intake request is rejected.
///
/// ```json
/// {
///   "error": "Validation Error",
///   "message": "Registration validation failed",
///   "details": { "email": "Email must be a valid email address" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

impl ErrorResponse {
    /// Envelope for a validation failure.
    pub fn validation(message: impl Into<String>, details: FieldErrors) -> Self {
        Self {
            error: VALIDATION_ERROR.to_string(),
            message: message.into(),
            details: Some(details),
        }
    }

    /// Envelope for an infrastructure failure; carries no field details.
    pub fn server_error(message: impl Into<String>) -> Self {
        Self {
            error: SERVER_ERROR.to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<&IntakeError> for ErrorResponse {
    fn from(err: &IntakeError) -> Self {
        match err {
            IntakeError::Invalid { message, errors } => {
                ErrorResponse::validation(message.clone(), errors.clone())
            }
            IntakeError::Engine(Error::External(_)) => {
                ErrorResponse::server_error("Unable to complete validation")
            }
            IntakeError::Engine(_) => ErrorResponse::server_error("Validation is misconfigured"),
        }
    }
}

impl From<IntakeError> for ErrorResponse {
    fn from(err: IntakeError) -> Self {
        ErrorResponse::from(&err)
    }
}

/// HTTP status for a rejected intake request.
///
/// Validation failures are `422 Unprocessable Entity`, failed external
/// checks are `503 Service Unavailable`, and configuration faults are
/// `500 Internal Server Error`.
pub fn status_for(err: &IntakeError) -> StatusCode {
    match err {
        IntakeError::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        IntakeError::Engine(Error::External(_)) => StatusCode::SERVICE_UNAVAILABLE,
        IntakeError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_validate::{ConfigError, ExternalCheckError};
    use std::time::Duration;

    fn field_errors() -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.insert_first("email", "email", "Email must be a valid email address");
        errors.insert_first("terms", "accepted", "You must accept the terms and conditions");
        errors
    }

    #[test]
    fn invalid_maps_to_422_with_details() {
        let err = IntakeError::invalid("Registration validation failed", field_errors());
        assert_eq!(status_for(&err), StatusCode::UNPROCESSABLE_ENTITY);

        let json: serde_json::Value =
            serde_json::from_str(&ErrorResponse::from(&err).to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error": "Validation Error",
                "message": "Registration validation failed",
                "details": {
                    "email": "Email must be a valid email address",
                    "terms": "You must accept the terms and conditions"
                }
            })
        );
    }

    #[test]
    fn external_failure_maps_to_503_without_details() {
        let err = IntakeError::from(Error::External(ExternalCheckError::TimedOut {
            field: "email".into(),
            scope: "accounts".into(),
            timeout: Duration::from_secs(2),
        }));
        assert_eq!(status_for(&err), StatusCode::SERVICE_UNAVAILABLE);

        let response = ErrorResponse::from(err);
        assert_eq!(response.error, SERVER_ERROR);
        assert!(response.details.is_none());
        assert!(!response.to_json().unwrap().contains("details"));
    }

    #[test]
    fn config_fault_maps_to_500() {
        let err = IntakeError::from(Error::Config(ConfigError::UnknownRule("luhn".into())));
        assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.field_errors().is_none());
    }
}
