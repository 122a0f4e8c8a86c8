//! Built-in rule predicates.
//!
//! Every predicate has the shape `(value, params) -> bool` so built-ins and
//! caller-registered rules go through the same registry path.

use crate::value::{FieldValue, Params};
use regex::Regex;
use std::sync::OnceLock;

// Pre-compiled regex patterns
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();
static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
static ALPHA_SPACE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Symbols accepted by `strong_password`.
pub const PASSWORD_SYMBOLS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

/// Minimum length accepted by `strong_password`.
pub const PASSWORD_MIN_LENGTH: usize = 8;

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        // RFC 5322 simplified
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("email pattern is valid")
    })
}

fn url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| {
        Regex::new(r"^(https?|ftp)://[^\s/$.?#].[^\s]*$").expect("url pattern is valid")
    })
}

fn phone_regex() -> &'static Regex {
    // E.164: optional plus, no leading zero, at most 15 digits
    PHONE_REGEX
        .get_or_init(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("phone pattern is valid"))
}

fn alpha_space_regex() -> &'static Regex {
    ALPHA_SPACE_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z\s]+$").expect("alpha pattern is valid"))
}

fn text_matches(value: &FieldValue, regex: &Regex) -> bool {
    value.as_text().is_some_and(|s| regex.is_match(s))
}

pub(crate) fn required(value: &FieldValue, _params: &Params) -> bool {
    !value.is_empty()
}

/// Text compares its character count, integers compare their value.
fn measure(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Text(s) => Some(i64::try_from(s.chars().count()).unwrap_or(i64::MAX)),
        FieldValue::Integer(n) => Some(*n),
        FieldValue::Absent => Some(0),
        FieldValue::Boolean(_) => None,
    }
}

pub(crate) fn min(value: &FieldValue, params: &Params) -> bool {
    match (measure(value), params.single().and_then(|p| p.as_integer())) {
        (Some(actual), Some(bound)) => actual >= bound,
        _ => false,
    }
}

pub(crate) fn max(value: &FieldValue, params: &Params) -> bool {
    match (measure(value), params.single().and_then(|p| p.as_integer())) {
        (Some(actual), Some(bound)) => actual <= bound,
        _ => false,
    }
}

pub(crate) fn email(value: &FieldValue, _params: &Params) -> bool {
    text_matches(value, email_regex())
}

pub(crate) fn url(value: &FieldValue, _params: &Params) -> bool {
    text_matches(value, url_regex())
}

pub(crate) fn phone(value: &FieldValue, _params: &Params) -> bool {
    text_matches(value, phone_regex())
}

pub(crate) fn alpha_space(value: &FieldValue, _params: &Params) -> bool {
    text_matches(value, alpha_space_regex())
}

pub(crate) fn strong_password(value: &FieldValue, _params: &Params) -> bool {
    let Some(password) = value.as_text() else {
        return false;
    };

    password.chars().count() >= PASSWORD_MIN_LENGTH
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

pub(crate) fn equals(value: &FieldValue, params: &Params) -> bool {
    params.single().is_some_and(|p| value.matches_param(p))
}

pub(crate) fn one_of(value: &FieldValue, params: &Params) -> bool {
    params.as_slice().iter().any(|p| value.matches_param(p))
}
