//! Registration and login payloads.

use intake_validate::{CrossFieldRule, FieldSource, FieldValue, Record, RecordSchema};
use serde::Deserialize;

/// Scope of the identifier directory holding registered emails.
pub const ACCOUNTS_SCOPE: &str = "accounts";

/// Message reported when the terms flag is not set.
pub const TERMS_MESSAGE: &str = "You must accept the terms and conditions";

/// Payload of a registration request.
///
/// Missing keys decode to their empty value so the validator reports them
/// as field errors instead of failing the decode.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub terms: bool,
}

impl FieldSource for RegisterRequest {
    fn value(&self, field: &str) -> FieldValue {
        match field {
            "first_name" => FieldValue::from(&self.first_name),
            "last_name" => FieldValue::from(&self.last_name),
            "email" => FieldValue::from(&self.email),
            "password" => FieldValue::from(&self.password),
            "confirm_password" => FieldValue::from(&self.confirm_password),
            "phone" => FieldValue::from(self.phone.as_deref()),
            "age" => FieldValue::from(self.age),
            "terms" => FieldValue::from(self.terms),
            _ => FieldValue::Absent,
        }
    }
}

impl Record for RegisterRequest {
    fn schema() -> RecordSchema {
        RecordSchema::new("RegisterRequest")
            .field("first_name", |f| f.required().length(2, 50).alpha_space())
            .field("last_name", |f| f.required().length(2, 50).alpha_space())
            .field("email", |f| f.required().email())
            .field("password", |f| f.required().length(8, 100).strong_password())
            .field("confirm_password", |f| f.required())
            .field("phone", |f| f.optional().phone())
            .field("age", |f| f.optional().min(13).max(120))
            .field("terms", |f| f)
            .matches("confirm_password", "password")
            .cross_field(CrossFieldRule::must_be_true("terms").with_message(TERMS_MESSAGE))
            .unique("email", ACCOUNTS_SCOPE)
    }
}

/// Payload of a login request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl FieldSource for LoginRequest {
    fn value(&self, field: &str) -> FieldValue {
        match field {
            "email" => FieldValue::from(&self.email),
            "password" => FieldValue::from(&self.password),
            _ => FieldValue::Absent,
        }
    }
}

impl Record for LoginRequest {
    fn schema() -> RecordSchema {
        RecordSchema::new("LoginRequest")
            .field("email", |f| f.required().email())
            .field("password", |f| f.required().min(6))
    }
}
