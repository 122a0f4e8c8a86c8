//! Engine configuration.

use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::time::Duration;

/// What the rule registry does when a rule name is registered twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with [`ConfigError::DuplicateRule`](crate::ConfigError::DuplicateRule)
    #[default]
    Reject,
    /// Replace the existing rule and log a warning
    Replace,
}

/// Validation engine configuration.
///
/// Deserializable from JSON; missing keys take their defaults:
///
/// ```json
/// {
///   "duplicate_policy": "reject",
///   "external_check_timeout_ms": 2000,
///   "messages": { "required": "{field} field is required." }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Behavior of the registry on re-registration
    pub duplicate_policy: DuplicatePolicy,
    /// Upper bound for a single external check
    #[serde(
        rename = "external_check_timeout_ms",
        serialize_with = "serialize_millis",
        deserialize_with = "deserialize_millis"
    )]
    pub external_check_timeout: Duration,
    /// Message template overrides, keyed like the message catalog
    pub messages: HashMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            external_check_timeout: Duration::from_secs(2),
            messages: HashMap::new(),
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the duplicate registration policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Set the external check timeout.
    pub fn with_external_check_timeout(mut self, timeout: Duration) -> Self {
        self.external_check_timeout = timeout;
        self
    }

    /// Override the message template for a catalog key.
    pub fn with_message(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(key.into(), template.into());
        self
    }
}

fn serialize_millis<S: Serializer>(
    value: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
}

fn deserialize_millis<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}
