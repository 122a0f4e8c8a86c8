//! Rule registry.
//!
//! A registry maps rule names to predicates. It is built once at startup,
//! shared read-only afterwards, and passed explicitly to the
//! [`Validator`](crate::Validator) rather than living in a global.
//!
//! ## Example
//!
//! ```rust,ignore
//! use intake_validate::prelude::*;
//!
//! let mut registry = RuleRegistry::new();
//! registry.register("no_spaces", Arity::None, |value, _| {
//!     value.as_text().is_some_and(|s| !s.contains(' '))
//! })?;
//! ```

use crate::config::{DuplicatePolicy, EngineConfig};
use crate::error::ConfigError;
use crate::rules;
use crate::value::{Arity, FieldValue, ParamKind, Params};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Type alias for rule predicates.
pub type Predicate = Arc<dyn Fn(&FieldValue, &Params) -> bool + Send + Sync>;

/// A named predicate plus the parameter arity it expects.
#[derive(Clone)]
pub struct Rule {
    name: String,
    arity: Arity,
    predicate: Predicate,
}

impl Rule {
    /// Create a rule.
    pub fn new<F>(name: impl Into<String>, arity: Arity, predicate: F) -> Self
    where
        F: Fn(&FieldValue, &Params) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Evaluate the predicate.
    pub fn check(&self, value: &FieldValue, params: &Params) -> bool {
        (self.predicate)(value, params)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Registry of named rules.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, Rule>,
    policy: DuplicatePolicy,
}

impl RuleRegistry {
    /// Names of the rules every registry starts with.
    pub const BUILTIN: &'static [&'static str] = &[
        "required",
        "min",
        "max",
        "email",
        "url",
        "phone",
        "alpha_space",
        "strong_password",
        "equals",
        "one_of",
    ];

    /// Create a registry with the built-in rules that rejects duplicates.
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::Reject)
    }

    /// Create a registry with the built-in rules and the given policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        let mut registry = Self::empty(policy);
        registry.install_builtins();
        registry
    }

    /// Create a registry from the engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_policy(config.duplicate_policy)
    }

    /// Create a registry without any rules.
    pub fn empty(policy: DuplicatePolicy) -> Self {
        Self {
            rules: HashMap::new(),
            policy,
        }
    }

    fn install_builtins(&mut self) {
        let builtins = [
            Rule::new("required", Arity::None, rules::required),
            Rule::new("min", Arity::One(ParamKind::Integer), rules::min),
            Rule::new("max", Arity::One(ParamKind::Integer), rules::max),
            Rule::new("email", Arity::None, rules::email),
            Rule::new("url", Arity::None, rules::url),
            Rule::new("phone", Arity::None, rules::phone),
            Rule::new("alpha_space", Arity::None, rules::alpha_space),
            Rule::new("strong_password", Arity::None, rules::strong_password),
            Rule::new("equals", Arity::One(ParamKind::Any), rules::equals),
            Rule::new("one_of", Arity::List(ParamKind::Any), rules::one_of),
        ];
        for rule in builtins {
            self.rules.insert(rule.name.clone(), rule);
        }
    }

    /// The duplicate registration policy in effect.
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Register a custom rule.
    ///
    /// Fails with [`ConfigError::DuplicateRule`] if the name is taken and the
    /// policy is [`DuplicatePolicy::Reject`].
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        arity: Arity,
        predicate: F,
    ) -> Result<(), ConfigError>
    where
        F: Fn(&FieldValue, &Params) -> bool + Send + Sync + 'static,
    {
        self.insert(Rule::new(name, arity, predicate))
    }

    /// Register an already constructed rule.
    pub fn insert(&mut self, rule: Rule) -> Result<(), ConfigError> {
        if self.rules.contains_key(&rule.name) {
            match self.policy {
                DuplicatePolicy::Reject => return Err(ConfigError::DuplicateRule(rule.name)),
                DuplicatePolicy::Replace => {
                    tracing::warn!(rule = %rule.name, "Replacing previously registered rule");
                }
            }
        }
        self.rules.insert(rule.name.clone(), rule);
        Ok(())
    }

    /// Look up a rule by name.
    pub fn lookup(&self, name: &str) -> Result<&Rule, ConfigError> {
        self.rules
            .get(name)
            .ok_or_else(|| ConfigError::UnknownRule(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
