//! # Intake Validation
//!
//! Validation engine for decoded input records. A record type declares its
//! constraints once through a typed [`RecordSchema`]; the engine resolves
//! them against an injected [`RuleRegistry`], evaluates every constraint and
//! cross-field rule without stopping at the first failure, optionally runs
//! external checks (uniqueness lookups) once the record is structurally
//! valid, and reports a [`ValidationResult`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use intake_validate::prelude::*;
//!
//! impl Record for RegisterRequest {
//!     fn schema() -> RecordSchema {
//!         RecordSchema::new("RegisterRequest")
//!             .field("email", |f| f.required().email())
//!             .field("password", |f| f.required().length(8, 100).strong_password())
//!             .field("confirm_password", |f| f.required())
//!             .matches("confirm_password", "password")
//!             .unique("email", "accounts")
//!     }
//! }
//!
//! let validator = Validator::new(RuleRegistry::new());
//! match validator.validate(&request)? {
//!     ValidationResult::Valid => {}
//!     ValidationResult::Invalid(errors) => println!("{}", serde_json::to_string(&errors)?),
//! }
//! ```
//!
//! ## Built-in Rules
//!
//! - `required` - Non-empty value (blank text, `0`, `false` and absent are empty)
//! - `min` / `max` - Character count for text, value for integers
//! - `email`, `url`, `phone`, `alpha_space` - Fixed formats
//! - `strong_password` - 8+ characters with upper, lower, digit and symbol
//! - `equals` - Exact match, e.g. `true` for acceptance flags
//! - `one_of` - Value is one of a parameter list
//!
//! ## Error Format
//!
//! [`FieldErrors`] serializes to an object keyed by field in declaration
//! order, one message per field:
//!
//! ```json
//! {
//!   "email": "Email must be a valid email address",
//!   "confirm_password": "Confirm password does not match Password"
//! }
//! ```

mod aggregate;
mod config;
mod engine;
mod error;
mod external;
mod message;
mod registry;
mod resolver;
mod rules;
mod schema;
mod validator;
mod value;


pub use aggregate::{aggregate, FieldError, FieldErrors, ValidationResult};
pub use config::{DuplicatePolicy, EngineConfig};
pub use engine::{validate_cross_field, validate_fields, Violation};
pub use error::{ConfigError, Error, ExternalCheckError, Result};
pub use external::{validate_external, ExternalCheckAdapter};
pub use message::MessageCatalog;
pub use registry::{Predicate, Rule, RuleRegistry};
pub use resolver::{humanize, Constraint, ConstraintSet, ResolvedField, Resolver, Severity};
pub use rules::{PASSWORD_MIN_LENGTH, PASSWORD_SYMBOLS};
pub use schema::{
    CrossFieldCheck, CrossFieldRule, ExternalCheck, ExternalCheckKind, FieldBuilder, FieldSource,
    FieldSpec, Record, RecordPredicate, RecordSchema, RuleRef,
};
pub use validator::Validator;
pub use value::{Arity, FieldValue, Param, ParamKind, Params, ValueKind};

// Re-exported so adapter implementations don't need their own dependency.
pub use async_trait::async_trait;

/// Prelude module for validation
pub mod prelude {
    pub use crate::aggregate::{FieldErrors, ValidationResult};
    pub use crate::config::{DuplicatePolicy, EngineConfig};
    pub use crate::error::{ConfigError, Error, ExternalCheckError};
    pub use crate::external::ExternalCheckAdapter;
    pub use crate::registry::RuleRegistry;
    pub use crate::schema::{CrossFieldRule, FieldSource, Record, RecordSchema};
    pub use crate::validator::Validator;
    pub use crate::value::{Arity, FieldValue, Param, ParamKind, Params};
    pub use async_trait::async_trait;
}
