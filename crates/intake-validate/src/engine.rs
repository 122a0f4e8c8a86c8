//! Field and cross-field evaluation.
//!
//! Neither pass stops at the first failure: every constraint and every
//! cross-field rule is evaluated so the caller gets all problems at once.

use crate::resolver::ConstraintSet;
use crate::schema::{CrossFieldCheck, FieldSource};
use crate::value::{Params, ValueKind};
use serde::Serialize;

/// One failed constraint, cross-field rule or external check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Field the violation is reported on
    pub field: String,
    /// Rule name, used to pick the message template
    pub rule: String,
    #[serde(skip_serializing_if = "Params::is_none")]
    pub params: Params,
    /// Tag of the offending value
    pub kind: ValueKind,
    /// Fixed message that bypasses the catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Label of a second field involved (e.g. the field a confirmation must match)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

impl Violation {
    pub fn new(field: impl Into<String>, rule: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            params: Params::None,
            kind,
            message: None,
            other: None,
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_other(mut self, other: impl Into<String>) -> Self {
        self.other = Some(other.into());
        self
    }
}

/// Evaluate every field constraint of `set` against `record`.
///
/// Optional fields whose value is empty only run `required`.
pub fn validate_fields(set: &ConstraintSet, record: &dyn FieldSource) -> Vec<Violation> {
    let mut violations = Vec::new();

    for field in set.fields() {
        let value = record.value(&field.name);
        let skip_optional = field.optional && value.is_empty();

        for constraint in &field.constraints {
            if skip_optional && constraint.rule_name() != "required" {
                continue;
            }
            if !constraint.rule().check(&value, &constraint.params) {
                tracing::trace!(
                    record = set.record(),
                    field = %field.name,
                    rule = constraint.rule_name(),
                    "Constraint failed"
                );
                violations.push(
                    Violation::new(&field.name, constraint.rule_name(), value.kind())
                        .with_params(constraint.params.clone()),
                );
            }
        }
    }

    violations
}

/// Evaluate every cross-field rule of `set` against `record`.
pub fn validate_cross_field(set: &ConstraintSet, record: &dyn FieldSource) -> Vec<Violation> {
    set.cross_field()
        .iter()
        .filter(|rule| !rule.holds(record))
        .map(|rule| {
            tracing::trace!(
                record = set.record(),
                field = %rule.target,
                rule = rule.check.rule_name(),
                "Cross-field rule failed"
            );
            let kind = record.value(&rule.target).kind();
            let mut violation = Violation::new(&rule.target, rule.check.rule_name(), kind);
            if let CrossFieldCheck::Matches { other } = &rule.check {
                violation = violation.with_other(set.label(other));
            }
            if let Some(message) = &rule.message {
                violation = violation.with_message(message.clone());
            }
            violation
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RuleRegistry;
    use crate::resolver::Resolver;
    use crate::schema::RecordSchema;
    use crate::value::FieldValue;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct Form(HashMap<&'static str, FieldValue>);

    impl FieldSource for Form {
        fn value(&self, field: &str) -> FieldValue {
            self.0.get(field).cloned().unwrap_or(FieldValue::Absent)
        }
    }

    fn resolve(schema: RecordSchema) -> ConstraintSet {
        Resolver::new(Arc::new(RuleRegistry::new()))
            .resolve_schema(schema)
            .unwrap()
    }

    fn signup() -> ConstraintSet {
        resolve(
            RecordSchema::new("Signup")
                .field("name", |f| f.required().length(2, 50).alpha_space())
                .field("age", |f| f.optional().min(13).max(120))
                .field("phone", |f| f.optional().phone())
                .field("password", |f| f.required())
                .field("confirm_password", |f| f.required())
                .field("terms", |f| f)
                .matches("confirm_password", "password")
                .must_be_true("terms"),
        )
    }

    #[test]
    fn collects_every_failing_constraint() {
        let form = Form(HashMap::from([
            ("name", FieldValue::from("R")),
            ("age", FieldValue::Integer(9)),
            ("password", FieldValue::from("x")),
            ("confirm_password", FieldValue::from("x")),
        ]));

        let violations = validate_fields(&signup(), &form);
        let got: Vec<(&str, &str)> = violations
            .iter()
            .map(|v| (v.field.as_str(), v.rule.as_str()))
            .collect();
        // "R" is too short and 9 is below the minimum age
        assert_eq!(got, [("name", "min"), ("age", "min")]);
        assert_eq!(violations[0].kind, ValueKind::Text);
        assert_eq!(violations[1].kind, ValueKind::Integer);
    }

    #[test]
    fn optional_empty_fields_are_skipped() {
        let form = Form(HashMap::from([
            ("name", FieldValue::from("Ada")),
            ("phone", FieldValue::from("")),
            ("password", FieldValue::from("x")),
            ("confirm_password", FieldValue::from("x")),
        ]));
        assert!(validate_fields(&signup(), &form).is_empty());

        let form = Form(HashMap::from([
            ("name", FieldValue::from("Ada")),
            ("phone", FieldValue::from("12-34")),
            ("password", FieldValue::from("x")),
            ("confirm_password", FieldValue::from("x")),
        ]));
        let violations = validate_fields(&signup(), &form);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "phone");
        assert_eq!(violations[0].rule, "phone");
    }

    #[test]
    fn optional_field_still_runs_required() {
        let set =
            resolve(RecordSchema::new("Odd").field("nick", |f| f.optional().required().min(3)));
        let form = Form(HashMap::new());
        let violations = validate_fields(&set, &form);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "required");
        assert_eq!(violations[0].kind, ValueKind::Absent);
    }

    #[test]
    fn cross_field_reports_on_target_only() {
        let form = Form(HashMap::from([
            ("password", FieldValue::from("Abcd123!")),
            ("confirm_password", FieldValue::from("Abcd124!")),
            ("terms", FieldValue::Boolean(false)),
        ]));

        let violations = validate_cross_field(&signup(), &form);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, "confirm_password");
        assert_eq!(violations[0].rule, "matches");
        assert_eq!(violations[0].other.as_deref(), Some("Password"));
        assert_eq!(violations[1].field, "terms");
        assert_eq!(violations[1].rule, "accepted");
    }

    #[test]
    fn cross_field_message_override() {
        let set = resolve(
            RecordSchema::new("Signup")
                .field("terms", |f| f)
                .cross_field(
                    crate::schema::CrossFieldRule::must_be_true("terms")
                        .with_message("You must accept the terms and conditions"),
                ),
        );
        let form = Form(HashMap::new());
        let violations = validate_cross_field(&set, &form);
        assert_eq!(
            violations[0].message.as_deref(),
            Some("You must accept the terms and conditions")
        );
    }
}
