//! Constraint descriptor resolution and caching.
//!
//! Resolution checks every declared rule against the registry up front, so
//! a misspelled rule name or a wrong parameter fails when the record type is
//! first resolved rather than when a request happens to reach it.

use crate::error::ConfigError;
use crate::registry::{Rule, RuleRegistry};
use crate::schema::{CrossFieldCheck, CrossFieldRule, ExternalCheck, Record, RecordSchema};
use crate::value::Params;
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

/// Severity of a constraint. Only errors exist today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Error,
}

/// A rule bound to a field with its parameters.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub field: String,
    pub params: Params,
    pub severity: Severity,
    rule: Rule,
}

impl Constraint {
    pub fn rule_name(&self) -> &str {
        self.rule.name()
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }
}

/// A field with its resolved constraints.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub name: String,
    pub label: String,
    pub optional: bool,
    pub constraints: Vec<Constraint>,
}

/// Resolved, immutable constraints of one record type.
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    record: String,
    fields: Vec<ResolvedField>,
    cross_field: Vec<CrossFieldRule>,
    external: Vec<ExternalCheck>,
}

impl ConstraintSet {
    /// Name of the record type.
    pub fn record(&self) -> &str {
        &self.record
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }

    /// All field constraints, in declaration order.
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.fields.iter().flat_map(|f| f.constraints.iter())
    }

    pub fn cross_field(&self) -> &[CrossFieldRule] {
        &self.cross_field
    }

    pub fn external(&self) -> &[ExternalCheck] {
        &self.external
    }

    /// Declaration index of `field`.
    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == field)
    }

    /// Label of `field`, falling back to one derived from its name.
    pub fn label(&self, field: &str) -> String {
        self.fields
            .iter()
            .find(|f| f.name == field)
            .map(|f| f.label.clone())
            .unwrap_or_else(|| humanize(field))
    }
}

/// Derive a label from a field name: `confirm_password` -> `Confirm password`.
pub fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolves record schemas against a registry and caches the result per type.
#[derive(Debug)]
pub struct Resolver {
    registry: Arc<RuleRegistry>,
    cache: RwLock<HashMap<TypeId, Arc<ConstraintSet>>>,
}

impl Resolver {
    /// Create a resolver over `registry`.
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// Resolve the constraints of `T`, parsing its schema only on first use.
    ///
    /// Repeated calls return the same `Arc`. Concurrent first resolutions of
    /// the same type converge on whichever result is cached first.
    pub fn resolve<T: Record>(&self) -> Result<Arc<ConstraintSet>, ConfigError> {
        let id = TypeId::of::<T>();

        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return Ok(Arc::clone(cached));
        }

        let resolved = Arc::new(self.resolve_schema(T::schema())?);
        tracing::debug!(
            record = %resolved.record,
            fields = resolved.fields.len(),
            "Resolved record constraints"
        );

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(id).or_insert(resolved)))
    }

    /// Whether `T` has already been resolved.
    pub fn is_cached<T: Record>(&self) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    /// Resolve a schema without caching it.
    pub fn resolve_schema(&self, schema: RecordSchema) -> Result<ConstraintSet, ConfigError> {
        let RecordSchema {
            name: record,
            fields,
            cross_field,
            external,
        } = schema;

        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(fields.len());

        for spec in fields {
            if !seen.insert(spec.name.clone()) {
                return Err(ConfigError::malformed(
                    &record,
                    &spec.name,
                    "field declared more than once",
                ));
            }

            let mut constraints = Vec::with_capacity(spec.rules.len());
            for rule_ref in spec.rules {
                let rule = self.registry.lookup(&rule_ref.name).map_err(|_| {
                    ConfigError::malformed(
                        &record,
                        &spec.name,
                        format!("unknown rule `{}`", rule_ref.name),
                    )
                })?;
                rule.arity().check(&rule_ref.params).map_err(|reason| {
                    ConfigError::malformed(
                        &record,
                        &spec.name,
                        format!("rule `{}`: {reason}", rule_ref.name),
                    )
                })?;

                constraints.push(Constraint {
                    field: spec.name.clone(),
                    params: rule_ref.params,
                    severity: Severity::Error,
                    rule: rule.clone(),
                });
            }

            resolved.push(ResolvedField {
                label: spec.label.unwrap_or_else(|| humanize(&spec.name)),
                name: spec.name,
                optional: spec.optional,
                constraints,
            });
        }

        for rule in &cross_field {
            let mut referenced = vec![rule.target.as_str()];
            if let CrossFieldCheck::Matches { other } = &rule.check {
                referenced.push(other);
            }
            if let Some(missing) = referenced.into_iter().find(|f| !seen.contains(*f)) {
                return Err(ConfigError::malformed(
                    &record,
                    missing,
                    format!(
                        "cross-field rule `{}` references an undeclared field",
                        rule.check.rule_name()
                    ),
                ));
            }
        }

        if let Some(check) = external.iter().find(|c| !seen.contains(&c.field)) {
            return Err(ConfigError::malformed(
                &record,
                &check.field,
                "external check references an undeclared field",
            ));
        }

        Ok(ConstraintSet {
            record,
            fields: resolved,
            cross_field,
            external,
        })
    }
}
