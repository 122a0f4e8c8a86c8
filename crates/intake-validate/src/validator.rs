//! The validation facade.

use crate::aggregate::{aggregate, ValidationResult};
use crate::config::EngineConfig;
use crate::engine::{validate_cross_field, validate_fields, Violation};
use crate::error::{ConfigError, Result};
use crate::external::{validate_external, ExternalCheckAdapter};
use crate::message::MessageCatalog;
use crate::registry::RuleRegistry;
use crate::resolver::{ConstraintSet, Resolver};
use crate::schema::Record;
use std::sync::Arc;
use std::time::Duration;

/// Validates records against their resolved constraints.
///
/// Cheap to share: wrap it in an `Arc` and use it from any number of tasks.
///
/// ## Example
///
/// ```rust,ignore
/// use intake_validate::prelude::*;
///
/// let validator = Validator::new(RuleRegistry::new());
/// validator.prepare::<RegisterRequest>()?;
///
/// match validator.validate_with_checks(&request, &accounts).await? {
///     ValidationResult::Valid => { /* continue */ }
///     ValidationResult::Invalid(errors) => { /* 422 with `errors` */ }
/// }
/// ```
#[derive(Debug)]
pub struct Validator {
    resolver: Resolver,
    catalog: MessageCatalog,
    config: EngineConfig,
}

impl Validator {
    /// Create a validator over `registry` with the default configuration.
    pub fn new(registry: RuleRegistry) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    /// Create a validator over `registry` with `config`.
    pub fn with_config(registry: RuleRegistry, config: EngineConfig) -> Self {
        Self::from_shared(Arc::new(registry), config)
    }

    /// Create a validator over an already shared registry.
    pub fn from_shared(registry: Arc<RuleRegistry>, config: EngineConfig) -> Self {
        Self {
            resolver: Resolver::new(registry),
            catalog: MessageCatalog::with_overrides(&config.messages),
            config,
        }
    }

    /// Create a validator with the built-in rules from a JSON configuration.
    pub fn from_json_config(json: &str) -> Result<Self> {
        let config = EngineConfig::from_json(json)?;
        Ok(Self::with_config(RuleRegistry::from_config(&config), config))
    }

    pub fn registry(&self) -> &RuleRegistry {
        self.resolver.registry()
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve `T` ahead of the first request so schema errors surface early.
    pub fn prepare<T: Record>(&self) -> std::result::Result<Arc<ConstraintSet>, ConfigError> {
        self.resolver.resolve::<T>()
    }

    /// Field and cross-field validation of `record`.
    pub fn validate<T: Record>(&self, record: &T) -> Result<ValidationResult> {
        let set = self.resolver.resolve::<T>()?;
        let field = validate_fields(&set, record);
        let cross_field = validate_cross_field(&set, record);
        Ok(self.finish(&set, field, cross_field, Vec::new()))
    }

    /// Full validation: structural checks, then external checks if those passed.
    ///
    /// External checks use the configured timeout.
    pub async fn validate_with_checks<T: Record>(
        &self,
        record: &T,
        adapter: &dyn ExternalCheckAdapter,
    ) -> Result<ValidationResult> {
        self.validate_with_checks_timeout(record, adapter, self.config.external_check_timeout)
            .await
    }

    /// Like [`validate_with_checks`](Self::validate_with_checks) with an explicit timeout.
    pub async fn validate_with_checks_timeout<T: Record>(
        &self,
        record: &T,
        adapter: &dyn ExternalCheckAdapter,
        timeout: Duration,
    ) -> Result<ValidationResult> {
        let set = self.resolver.resolve::<T>()?;
        let field = validate_fields(&set, record);
        let cross_field = validate_cross_field(&set, record);

        if !field.is_empty() || !cross_field.is_empty() {
            return Ok(self.finish(&set, field, cross_field, Vec::new()));
        }

        let external = validate_external(&set, record, adapter, timeout).await?;
        Ok(self.finish(&set, field, cross_field, external))
    }

    fn finish(
        &self,
        set: &ConstraintSet,
        field: Vec<Violation>,
        cross_field: Vec<Violation>,
        external: Vec<Violation>,
    ) -> ValidationResult {
        let result = aggregate(set, field, cross_field, external, &self.catalog);
        tracing::debug!(
            record = set.record(),
            errors = result.errors().map_or(0, |e| e.len()),
            "Validated record"
        );
        result
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(RuleRegistry::new())
    }
}
