//! Message templates for violations.
//!
//! Templates are looked up by `"<rule>.<kind>"` first (so `min` can say
//! "characters" for text and stay numeric for integers), then by `"<rule>"`,
//! then fall back to `"{field} is invalid"`. Placeholders:
//!
//! - `{field}`: label of the violated field
//! - `{param}`: the rule parameters, comma separated
//! - `{other}`: label of the second field of a `matches` rule

use crate::engine::Violation;
use std::collections::HashMap;

const FALLBACK: &str = "{field} is invalid";

const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("required", "{field} is required"),
    ("min.text", "{field} must be at least {param} characters"),
    ("min.absent", "{field} must be at least {param} characters"),
    ("min", "{field} must be at least {param}"),
    ("max.text", "{field} must not exceed {param} characters"),
    ("max", "{field} must not exceed {param}"),
    ("email", "{field} must be a valid email address"),
    ("url", "{field} must be a valid URL"),
    ("phone", "{field} must be a valid phone number"),
    ("alpha_space", "{field} must contain only letters and spaces"),
    (
        "strong_password",
        "{field} must contain at least 8 characters with uppercase, lowercase, number and special character",
    ),
    ("equals", "{field} must equal {param}"),
    ("one_of", "{field} must be one of: {param}"),
    ("matches", "{field} does not match {other}"),
    ("accepted", "{field} must be accepted"),
    ("unique", "{field} has already been taken"),
];

/// Template table used to render violation messages.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: HashMap<String, String>,
}

impl MessageCatalog {
    /// Catalog with the default templates.
    pub fn new() -> Self {
        Self {
            templates: DEFAULT_TEMPLATES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Catalog with the default templates and `overrides` applied on top.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut catalog = Self::new();
        catalog
            .templates
            .extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        catalog
    }

    /// Set the template for `key`.
    pub fn set(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(key.into(), template.into());
    }

    /// Template that applies to `violation`.
    pub fn template_for(&self, violation: &Violation) -> &str {
        let specific = format!("{}.{}", violation.rule, violation.kind.name());
        self.templates
            .get(&specific)
            .or_else(|| self.templates.get(&violation.rule))
            .map(String::as_str)
            .unwrap_or(FALLBACK)
    }

    /// Render the message for `violation` on a field labelled `label`.
    pub fn render(&self, violation: &Violation, label: &str) -> String {
        if let Some(message) = &violation.message {
            return message.clone();
        }

        let mut values = vec![
            ("field", label.to_string()),
            ("param", violation.params.to_string()),
        ];
        if let Some(other) = &violation.other {
            values.push(("other", other.clone()));
        }
        interpolate(self.template_for(violation), &values)
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace `{key}` placeholders with their values in a single pass.
///
/// Substituted values are never rescanned; unknown placeholders and
/// unbalanced braces are kept as written.
fn interpolate(template: &str, values: &[(&str, String)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            rest = &rest[open..];
            break;
        };
        let key = &after[..close];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => result.push_str(value),
            None => {
                result.push('{');
                result.push_str(key);
                result.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Param, Params, ValueKind};

    fn min_violation(kind: ValueKind) -> Violation {
        Violation::new("first_name", "min", kind).with_params(Params::One(Param::Integer(2)))
    }

    #[test]
    fn kind_specific_template_first() {
        let catalog = MessageCatalog::new();
        assert_eq!(
            catalog.render(&min_violation(ValueKind::Text), "First name"),
            "First name must be at least 2 characters"
        );
        assert_eq!(
            catalog.render(&min_violation(ValueKind::Integer), "Age"),
            "Age must be at least 2"
        );
    }

    #[test]
    fn unknown_rule_falls_back() {
        let catalog = MessageCatalog::new();
        let violation = Violation::new("code", "luhn", ValueKind::Text);
        assert_eq!(catalog.render(&violation, "Code"), "Code is invalid");
    }

    #[test]
    fn matches_uses_other_label() {
        let catalog = MessageCatalog::new();
        let violation = Violation::new("confirm_password", "matches", ValueKind::Text)
            .with_other("Password");
        assert_eq!(
            catalog.render(&violation, "Confirm password"),
            "Confirm password does not match Password"
        );
    }

    #[test]
    fn explicit_message_bypasses_catalog() {
        let catalog = MessageCatalog::new();
        let violation = Violation::new("terms", "accepted", ValueKind::Boolean)
            .with_message("You must accept the terms and conditions");
        assert_eq!(
            catalog.render(&violation, "Terms"),
            "You must accept the terms and conditions"
        );
    }

    #[test]
    fn overrides_replace_defaults() {
        let overrides = HashMap::from([(
            "required".to_string(),
            "{field} field is required.".to_string(),
        )]);
        let catalog = MessageCatalog::with_overrides(&overrides);
        let violation = Violation::new("email", "required", ValueKind::Text);
        assert_eq!(catalog.render(&violation, "Email"), "Email field is required.");
    }

    #[test]
    fn list_params_render_comma_separated() {
        let catalog = MessageCatalog::new();
        let violation = Violation::new("kyc_level", "one_of", ValueKind::Text).with_params(
            Params::List(vec!["tier_1".into(), "tier_2".into()]),
        );
        assert_eq!(
            catalog.render(&violation, "Kyc level"),
            "Kyc level must be one of: tier_1, tier_2"
        );
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        let catalog = MessageCatalog::new();
        let violation = Violation::new("tier", "one_of", ValueKind::Text)
            .with_params(Params::List(vec!["{field}".into(), "{other}".into()]));
        assert_eq!(
            catalog.render(&violation, "{param}"),
            "{param} must be one of: {field}, {other}"
        );
    }

    #[test]
    fn unknown_and_unbalanced_placeholders_are_kept() {
        let values = [("field", "Email".to_string())];
        assert_eq!(
            interpolate("{field} {unknown} {field", &values),
            "Email {unknown} {field"
        );
    }

    #[test]
    fn set_replaces_single_template() {
        let mut catalog = MessageCatalog::new();
        catalog.set("unique", "{field} is already registered");
        let violation = Violation::new("email", "unique", ValueKind::Text);
        assert_eq!(catalog.render(&violation, "Email"), "Email is already registered");
        assert_eq!(
            catalog.render(&Violation::new("email", "required", ValueKind::Text), "Email"),
            "Email is required"
        );
    }
}
