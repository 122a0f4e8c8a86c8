//! Violation aggregation and the validation result type.
//!
//! Each field reports at most one message: the first violation recorded for
//! it wins. Field violations come before cross-field violations, which come
//! before external-check violations, and the resulting entries are ordered
//! by field declaration order.

use crate::engine::Violation;
use crate::message::MessageCatalog;
use crate::resolver::ConstraintSet;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// A single field message in a [`FieldErrors`] map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    /// Rule that produced the message
    pub rule: String,
    pub message: String,
}

/// Ordered map from field name to message.
///
/// Serializes as a JSON object whose keys follow field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entry(field).map(|e| e.message.as_str())
    }

    /// Full entry for `field`, if it failed.
    pub fn entry(&self, field: &str) -> Option<&FieldError> {
        self.entries.iter().find(|e| e.field == field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entry(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names in order.
    pub fn fields(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.entries.iter()
    }

    /// Add `message` for `field` unless the field already has one.
    ///
    /// Returns whether the entry was added.
    pub fn insert_first(
        &mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> bool {
        let field = field.into();
        if self.contains(&field) {
            return false;
        }
        self.entries.push(FieldError {
            field,
            rule: rule.into(),
            message: message.into(),
        });
        true
    }
}

impl Serialize for FieldErrors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.field, &entry.message)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {} field error(s)", self.len())
    }
}

/// Outcome of validating one record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum ValidationResult {
    Valid,
    Invalid(FieldErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// The error map, if invalid.
    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(errors) => Some(errors),
        }
    }

    /// Convert to `Result`: `Ok(())` if valid, `Err(errors)` otherwise.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(errors) => Err(errors),
        }
    }
}

/// Merge the three violation streams into a [`ValidationResult`].
pub fn aggregate(
    set: &ConstraintSet,
    field: Vec<Violation>,
    cross_field: Vec<Violation>,
    external: Vec<Violation>,
    catalog: &MessageCatalog,
) -> ValidationResult {
    let mut errors = FieldErrors::new();

    for violation in field.into_iter().chain(cross_field).chain(external) {
        if errors.contains(&violation.field) {
            continue;
        }
        let message = catalog.render(&violation, &set.label(&violation.field));
        errors.insert_first(violation.field, violation.rule, message);
    }

    if errors.is_empty() {
        return ValidationResult::Valid;
    }

    // stable: fields outside the schema keep their encounter order at the end
    errors
        .entries
        .sort_by_key(|e| set.position(&e.field).unwrap_or(usize::MAX));
    ValidationResult::Invalid(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RuleRegistry;
    use crate::resolver::Resolver;
    use crate::schema::RecordSchema;
    use crate::value::{Param, Params, ValueKind};
    use std::sync::Arc;

    fn signup() -> ConstraintSet {
        Resolver::new(Arc::new(RuleRegistry::new()))
            .resolve_schema(
                RecordSchema::new("Signup")
                    .field("email", |f| f.required().email())
                    .field("password", |f| f.required().min(8))
                    .field("confirm_password", |f| f.required()),
            )
            .unwrap()
    }

    #[test]
    fn empty_streams_are_valid() {
        let result = aggregate(&signup(), vec![], vec![], vec![], &MessageCatalog::new());
        assert!(result.is_valid());
        assert!(result.errors().is_none());
    }

    #[test]
    fn first_violation_per_field_wins() {
        let field = vec![
            Violation::new("password", "required", ValueKind::Text),
            Violation::new("password", "min", ValueKind::Text)
                .with_params(Params::One(Param::Integer(8))),
        ];
        let result = aggregate(&signup(), field, vec![], vec![], &MessageCatalog::new());
        let errors = result.errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("password"), Some("Password is required"));
        assert_eq!(errors.entry("password").unwrap().rule, "required");
    }

    #[test]
    fn field_violation_beats_cross_field_on_same_field() {
        let field = vec![Violation::new("confirm_password", "required", ValueKind::Text)];
        let cross = vec![Violation::new("confirm_password", "matches", ValueKind::Text)
            .with_other("Password")];
        let result = aggregate(&signup(), field, cross, vec![], &MessageCatalog::new());
        assert_eq!(
            result.errors().unwrap().get("confirm_password"),
            Some("Confirm password is required")
        );
    }

    #[test]
    fn entries_follow_declaration_order() {
        let cross = vec![Violation::new("confirm_password", "matches", ValueKind::Text)
            .with_other("Password")];
        let external = vec![Violation::new("email", "unique", ValueKind::Text)];
        let field = vec![Violation::new("password", "min", ValueKind::Text)
            .with_params(Params::One(Param::Integer(8)))];

        let result = aggregate(&signup(), field, cross, external, &MessageCatalog::new());
        let errors = result.errors().unwrap();
        assert_eq!(errors.fields(), ["email", "password", "confirm_password"]);
        assert_eq!(errors.get("email"), Some("Email has already been taken"));
    }

    #[test]
    fn serializes_as_ordered_object() {
        let field = vec![
            Violation::new("password", "required", ValueKind::Text),
            Violation::new("email", "email", ValueKind::Text),
        ];
        let result = aggregate(&signup(), field, vec![], vec![], &MessageCatalog::new());
        let json = serde_json::to_string(result.errors().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"email":"Email must be a valid email address","password":"Password is required"}"#
        );
    }

    #[test]
    fn into_result() {
        assert!(ValidationResult::Valid.into_result().is_ok());
        let mut errors = FieldErrors::new();
        assert!(errors.insert_first("email", "required", "Email is required"));
        assert!(!errors.insert_first("email", "email", "ignored"));
        let err = ValidationResult::Invalid(errors).into_result().unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: 1 field error(s)");
    }
}
