//! Declarative record metadata.
//!
//! A record type describes its constraints once through [`RecordSchema`],
//! a typed builder. The [`Resolver`](crate::Resolver) turns the schema into
//! a cached [`ConstraintSet`](crate::ConstraintSet).
//!
//! ## Example
//!
//! ```rust,ignore
//! use intake_validate::prelude::*;
//!
//! struct LoginRequest {
//!     email: String,
//!     password: String,
//! }
//!
//! impl FieldSource for LoginRequest {
//!     fn value(&self, field: &str) -> FieldValue {
//!         match field {
//!             "email" => FieldValue::from(&self.email),
//!             "password" => FieldValue::from(&self.password),
//!             _ => FieldValue::Absent,
//!         }
//!     }
//! }
//!
//! impl Record for LoginRequest {
//!     fn schema() -> RecordSchema {
//!         RecordSchema::new("LoginRequest")
//!             .field("email", |f| f.required().email())
//!             .field("password", |f| f.required().min(6))
//!     }
//! }
//! ```

use crate::value::{FieldValue, Param, Params};
use std::fmt;
use std::sync::Arc;

/// Read access to a record's fields by name.
pub trait FieldSource {
    /// Current value of `field`. Unknown fields read as [`FieldValue::Absent`].
    fn value(&self, field: &str) -> FieldValue;
}

/// A record type the engine can validate.
pub trait Record: FieldSource + Send + Sync + 'static {
    /// Declarative constraints for this type.
    ///
    /// Called once per type; the result is resolved and cached.
    fn schema() -> RecordSchema;
}

/// A rule reference declared on a field, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleRef {
    pub name: String,
    pub params: Params,
}

/// Declared constraints of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub label: Option<String>,
    /// Empty values skip every rule except `required`
    pub optional: bool,
    pub rules: Vec<RuleRef>,
}

/// Builder for a [`FieldSpec`].
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    spec: FieldSpec,
}

impl FieldBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            spec: FieldSpec {
                name: name.into(),
                label: None,
                optional: false,
                rules: Vec::new(),
            },
        }
    }

    /// Attach a rule by name with the given parameters.
    pub fn rule_with(mut self, name: impl Into<String>, params: Params) -> Self {
        self.spec.rules.push(RuleRef {
            name: name.into(),
            params,
        });
        self
    }

    /// Attach a parameterless rule by name.
    pub fn rule(self, name: impl Into<String>) -> Self {
        self.rule_with(name, Params::None)
    }

    /// Human-readable field name used in messages.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.spec.label = Some(label.into());
        self
    }

    /// Mark the field as optional: absent or empty is acceptable.
    pub fn optional(mut self) -> Self {
        self.spec.optional = true;
        self
    }

    pub fn required(self) -> Self {
        self.rule("required")
    }

    pub fn min(self, bound: i64) -> Self {
        self.rule_with("min", Params::One(Param::Integer(bound)))
    }

    pub fn max(self, bound: i64) -> Self {
        self.rule_with("max", Params::One(Param::Integer(bound)))
    }

    /// Shorthand for `min(min).max(max)`.
    pub fn length(self, min: i64, max: i64) -> Self {
        self.min(min).max(max)
    }

    pub fn email(self) -> Self {
        self.rule("email")
    }

    pub fn url(self) -> Self {
        self.rule("url")
    }

    pub fn phone(self) -> Self {
        self.rule("phone")
    }

    pub fn alpha_space(self) -> Self {
        self.rule("alpha_space")
    }

    pub fn strong_password(self) -> Self {
        self.rule("strong_password")
    }

    pub fn equals(self, expected: impl Into<Param>) -> Self {
        self.rule_with("equals", Params::One(expected.into()))
    }

    pub fn one_of<I, P>(self, allowed: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Param>,
    {
        let list = allowed.into_iter().map(Into::into).collect();
        self.rule_with("one_of", Params::List(list))
    }

    fn build(self) -> FieldSpec {
        self.spec
    }
}

/// Predicate over a whole record.
pub type RecordPredicate = Arc<dyn Fn(&dyn FieldSource) -> bool + Send + Sync>;

/// What a cross-field rule checks.
#[derive(Clone)]
pub enum CrossFieldCheck {
    /// Target must equal `other` (confirmation fields)
    Matches { other: String },
    /// Target must be `true`
    MustBeTrue,
    /// Caller-supplied predicate; `rule` names it for message lookup
    Custom {
        rule: String,
        predicate: RecordPredicate,
    },
}

impl CrossFieldCheck {
    /// Rule name used for message lookup.
    pub fn rule_name(&self) -> &str {
        match self {
            CrossFieldCheck::Matches { .. } => "matches",
            CrossFieldCheck::MustBeTrue => "accepted",
            CrossFieldCheck::Custom { rule, .. } => rule,
        }
    }
}

impl fmt::Debug for CrossFieldCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrossFieldCheck::Matches { other } => {
                f.debug_struct("Matches").field("other", other).finish()
            }
            CrossFieldCheck::MustBeTrue => f.write_str("MustBeTrue"),
            CrossFieldCheck::Custom { rule, .. } => f
                .debug_struct("Custom")
                .field("rule", rule)
                .finish_non_exhaustive(),
        }
    }
}

/// A record-level rule whose violation is attached to `target`.
#[derive(Debug, Clone)]
pub struct CrossFieldRule {
    pub target: String,
    pub check: CrossFieldCheck,
    pub message: Option<String>,
}

impl CrossFieldRule {
    /// `target` must equal `other`.
    pub fn matches(target: impl Into<String>, other: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            check: CrossFieldCheck::Matches {
                other: other.into(),
            },
            message: None,
        }
    }

    /// `target` must be `true`.
    pub fn must_be_true(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            check: CrossFieldCheck::MustBeTrue,
            message: None,
        }
    }

    /// Custom predicate over the whole record.
    pub fn custom<F>(target: impl Into<String>, rule: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&dyn FieldSource) -> bool + Send + Sync + 'static,
    {
        Self {
            target: target.into(),
            check: CrossFieldCheck::Custom {
                rule: rule.into(),
                predicate: Arc::new(predicate),
            },
            message: None,
        }
    }

    /// Use a fixed message instead of the catalog template.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Evaluate against a record.
    pub fn holds(&self, record: &dyn FieldSource) -> bool {
        match &self.check {
            CrossFieldCheck::Matches { other } => record.value(&self.target) == record.value(other),
            CrossFieldCheck::MustBeTrue => record.value(&self.target) == FieldValue::Boolean(true),
            CrossFieldCheck::Custom { predicate, .. } => predicate(record),
        }
    }
}

/// Kinds of checks that need state outside the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalCheckKind {
    /// The value must not already be in use within `scope`
    IdentifierTaken { scope: String },
}

/// An external check declared on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCheck {
    pub field: String,
    pub kind: ExternalCheckKind,
}

/// Declarative metadata of one record type.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub name: String,
    pub fields: Vec<FieldSpec>,
    pub cross_field: Vec<CrossFieldRule>,
    pub external: Vec<ExternalCheck>,
}

impl RecordSchema {
    /// Start a schema for the record called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            cross_field: Vec::new(),
            external: Vec::new(),
        }
    }

    /// Declare a field. Declaration order is the order of reported errors.
    pub fn field<F>(mut self, name: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(FieldBuilder) -> FieldBuilder,
    {
        self.fields.push(build(FieldBuilder::new(name)).build());
        self
    }

    /// Add a cross-field rule.
    pub fn cross_field(mut self, rule: CrossFieldRule) -> Self {
        self.cross_field.push(rule);
        self
    }

    /// `target` must equal `other`; the violation is reported on `target`.
    pub fn matches(self, target: impl Into<String>, other: impl Into<String>) -> Self {
        self.cross_field(CrossFieldRule::matches(target, other))
    }

    /// `target` must be `true`.
    pub fn must_be_true(self, target: impl Into<String>) -> Self {
        self.cross_field(CrossFieldRule::must_be_true(target))
    }

    /// `field` must not already be taken within `scope`.
    pub fn unique(mut self, field: impl Into<String>, scope: impl Into<String>) -> Self {
        self.external.push(ExternalCheck {
            field: field.into(),
            kind: ExternalCheckKind::IdentifierTaken {
                scope: scope.into(),
            },
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Form(HashMap<&'static str, FieldValue>);

    impl FieldSource for Form {
        fn value(&self, field: &str) -> FieldValue {
            self.0.get(field).cloned().unwrap_or(FieldValue::Absent)
        }
    }

    #[test]
    fn builder_collects_rules_in_order() {
        let schema = RecordSchema::new("Signup")
            .field("name", |f| f.required().length(2, 50).alpha_space())
            .field("tier", |f| f.optional().one_of(["tier_1", "tier_2"]));

        assert_eq!(schema.fields.len(), 2);
        let names: Vec<&str> = schema.fields[0]
            .rules
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, ["required", "min", "max", "alpha_space"]);
        assert!(schema.fields[1].optional);
        assert_eq!(
            schema.fields[1].rules[0].params,
            Params::List(vec!["tier_1".into(), "tier_2".into()])
        );
    }

    #[test]
    fn format_shorthands_name_their_rules() {
        let schema = RecordSchema::new("Profile")
            .field("homepage", |f| f.optional().url().label("Home page"))
            .field("phone", |f| f.phone())
            .field("terms", |f| f.equals(true));

        assert_eq!(schema.fields[0].rules[0].name, "url");
        assert_eq!(schema.fields[0].label.as_deref(), Some("Home page"));
        assert_eq!(schema.fields[1].rules[0].name, "phone");
        assert_eq!(
            schema.fields[2].rules[0].params,
            Params::One(Param::Boolean(true))
        );
    }

    #[test]
    fn cross_field_rules_evaluate() {
        let form = Form(HashMap::from([
            ("password", FieldValue::from("Abcd123!")),
            ("confirm", FieldValue::from("Abcd124!")),
            ("terms", FieldValue::Boolean(true)),
        ]));

        assert!(!CrossFieldRule::matches("confirm", "password").holds(&form));
        assert!(CrossFieldRule::must_be_true("terms").holds(&form));
        assert!(!CrossFieldRule::must_be_true("missing").holds(&form));

        let custom = CrossFieldRule::custom("confirm", "not_password", |r| {
            r.value("confirm") != r.value("password")
        });
        assert!(custom.holds(&form));
        assert_eq!(custom.check.rule_name(), "not_password");
    }

    #[test]
    fn unique_declares_external_check() {
        let schema = RecordSchema::new("Signup")
            .field("email", |f| f.required().email())
            .unique("email", "accounts");
        assert_eq!(
            schema.external,
            vec![ExternalCheck {
                field: "email".into(),
                kind: ExternalCheckKind::IdentifierTaken {
                    scope: "accounts".into()
                },
            }]
        );
    }
}
