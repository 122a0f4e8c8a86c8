//! Tagged field values and rule parameters.
//!
//! Records expose their fields as [`FieldValue`]s so shared rules such as
//! `min` and `max` can branch on a known tag instead of guessing from the
//! parameter.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Runtime value of a single record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Textual value
    Text(String),
    /// Integral value
    Integer(i64),
    /// Boolean flag
    Boolean(bool),
    /// Optional field that was not supplied
    Absent,
}

impl FieldValue {
    /// The tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::Integer(_) => ValueKind::Integer,
            FieldValue::Boolean(_) => ValueKind::Boolean,
            FieldValue::Absent => ValueKind::Absent,
        }
    }

    /// Whether the value is the zero value for its kind.
    ///
    /// Blank text, `0`, `false` and [`FieldValue::Absent`] are all empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Integer(n) => *n == 0,
            FieldValue::Boolean(b) => !*b,
            FieldValue::Absent => true,
        }
    }

    /// Borrow the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an identifier for external lookups.
    ///
    /// Integers and booleans render in decimal and `true`/`false`;
    /// [`FieldValue::Absent`] has no identifier.
    pub fn as_identifier(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s)),
            FieldValue::Integer(n) => Some(Cow::Owned(n.to_string())),
            FieldValue::Boolean(b) => Some(Cow::Owned(b.to_string())),
            FieldValue::Absent => None,
        }
    }

    /// Whether this value equals the given parameter (same tag, same value).
    pub fn matches_param(&self, param: &Param) -> bool {
        match (self, param) {
            (FieldValue::Text(a), Param::Text(b)) => a == b,
            (FieldValue::Integer(a), Param::Integer(b)) => a == b,
            (FieldValue::Boolean(a), Param::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Absent, Into::into)
    }
}

/// Tag of a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Integer,
    Boolean,
    Absent,
}

impl ValueKind {
    /// Name used in message catalog keys (`min.text`, `min.integer`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Boolean => "boolean",
            ValueKind::Absent => "absent",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single rule parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Integer(i64),
    Text(String),
    Boolean(bool),
}

impl Param {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Param::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether this parameter is acceptable where `kind` is expected.
    pub fn is_kind(&self, kind: ParamKind) -> bool {
        matches!(
            (kind, self),
            (ParamKind::Any, _)
                | (ParamKind::Integer, Param::Integer(_))
                | (ParamKind::Text, Param::Text(_))
                | (ParamKind::Boolean, Param::Boolean(_))
        )
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Integer(n) => write!(f, "{n}"),
            Param::Text(s) => f.write_str(s),
            Param::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Integer(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Boolean(value)
    }
}

/// Parameters bound to a constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    #[default]
    None,
    One(Param),
    List(Vec<Param>),
}

impl Params {
    /// The single parameter, if there is exactly one.
    pub fn single(&self) -> Option<&Param> {
        match self {
            Params::One(p) => Some(p),
            _ => None,
        }
    }

    /// All parameters as a slice.
    pub fn as_slice(&self) -> &[Param] {
        match self {
            Params::None => &[],
            Params::One(p) => std::slice::from_ref(p),
            Params::List(list) => list,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Params::None)
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.as_slice().iter().map(Param::to_string).collect();
        f.write_str(&rendered.join(", "))
    }
}

/// Expected type of a rule parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Any,
    Integer,
    Text,
    Boolean,
}

/// Parameter arity a rule expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// No parameters
    None,
    /// Exactly one parameter of the given kind
    One(ParamKind),
    /// A non-empty list of parameters of the given kind
    List(ParamKind),
}

impl Arity {
    /// Check `params` against this arity.
    ///
    /// Returns a short reason on mismatch, used in configuration errors.
    pub fn check(&self, params: &Params) -> Result<(), String> {
        match (self, params) {
            (Arity::None, Params::None) => Ok(()),
            (Arity::None, _) => Err("rule takes no parameters".to_string()),
            (Arity::One(kind), Params::One(p)) => {
                if p.is_kind(*kind) {
                    Ok(())
                } else {
                    Err(format!("parameter `{p}` is not of the expected kind {kind:?}"))
                }
            }
            (Arity::One(_), _) => Err("rule takes exactly one parameter".to_string()),
            (Arity::List(kind), Params::List(list)) => {
                if list.is_empty() {
                    return Err("rule takes a non-empty parameter list".to_string());
                }
                match list.iter().find(|p| !p.is_kind(*kind)) {
                    Some(p) => Err(format!(
                        "parameter `{p}` is not of the expected kind {kind:?}"
                    )),
                    None => Ok(()),
                }
            }
            (Arity::List(_), _) => Err("rule takes a parameter list".to_string()),
        }
    }
}
