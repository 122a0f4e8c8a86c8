//! # Intake Auth
//!
//! Registration and login payload validation built on `intake-validate`.
//!
//! - [`RegisterRequest`] / [`LoginRequest`]: decoded payloads with their
//!   declared constraints
//! - [`InMemoryDirectory`]: identifier directory used for the email
//!   uniqueness check
//! - [`AuthIntake`]: runs the checks and reports [`IntakeError`]
//! - [`ErrorResponse`] / [`status_for`]: the JSON envelope and HTTP status
//!   for a rejected request

mod directory;
mod error;
mod records;
mod response;
mod service;

pub use directory::InMemoryDirectory;
pub use error::{IntakeError, Result};
pub use records::{LoginRequest, RegisterRequest, ACCOUNTS_SCOPE, TERMS_MESSAGE};
pub use response::{status_for, ErrorResponse, SERVER_ERROR, VALIDATION_ERROR};
pub use service::AuthIntake;
