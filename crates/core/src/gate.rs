//! The conditional validation gate.
//!
//! A gate holds two ordered rule lists. On evaluation the "if" rules run
//! against a throwaway snapshot of the model; only when that snapshot comes
//! out without errors do the "then" rules run against the model itself.
//! Errors from the "if" phase are never visible to the caller.

use std::sync::Arc;

use serde_json::Value;

use crate::error::CoreError;
use crate::factory::{ValidatorContext, ValidatorFactory};
use crate::model::Model;
use crate::rules::{parse_rule_specs, resolve_all, RuleDeclaration};
use crate::types::is_empty_value;
use crate::validators::Validator;

/// How a single evaluation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// `skip_on_empty` was set and the attribute was empty; nothing ran.
    Skipped,
    /// The snapshot collected errors, so the "then" rules did not run.
    PreconditionFailed,
    /// The "then" rules ran against the target.
    Applied,
}

#[derive(Debug, Clone)]
pub struct ConditionalGate {
    attributes: Vec<String>,
    if_rules: Vec<RuleDeclaration>,
    then_rules: Vec<RuleDeclaration>,
    skip_on_empty: bool,
    skip_on_error: bool,
    factory: ValidatorFactory,
}

impl ConditionalGate {
    /// A gate resolving rule specs through the built-in factory.
    pub fn new(
        if_rules: Vec<RuleDeclaration>,
        then_rules: Vec<RuleDeclaration>,
        skip_on_empty: bool,
    ) -> Self {
        Self {
            attributes: Vec::new(),
            if_rules,
            then_rules,
            skip_on_empty,
            skip_on_error: true,
            factory: ValidatorFactory::builtin(),
        }
    }

    pub fn with_factory(mut self, factory: ValidatorFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Attributes this gate is declared against when used as a [`Validator`].
    pub fn bind<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Whether [`Validator::validate_attributes`] passes over a bound
    /// attribute that already has errors. Defaults to true.
    pub fn with_skip_on_error(mut self, skip_on_error: bool) -> Self {
        self.skip_on_error = skip_on_error;
        self
    }

    pub fn skip_on_empty(&self) -> bool {
        self.skip_on_empty
    }

    /// Evaluate the gate for `attribute` of `target`.
    ///
    /// `attribute` only decides the empty-value skip. Both rule lists run over
    /// every active attribute of the model, so either side may refer to
    /// attributes other than the one the gate is declared against.
    ///
    /// Each phase resolves all of its rules before running any of them, so a
    /// configuration error aborts the phase without recording anything.
    pub fn evaluate(
        &self,
        target: &mut dyn Model,
        attribute: &str,
    ) -> Result<GateOutcome, CoreError> {
        if self.skip_on_empty && is_empty_value(target.value(attribute)) {
            tracing::debug!(attribute, "Conditional gate skipped: attribute is empty");
            return Ok(GateOutcome::Skipped);
        }

        let mut snapshot = target.snapshot();
        snapshot.clear_errors();
        let attributes = snapshot.active_attributes();

        let if_validators = resolve_all(&self.if_rules, &self.factory, &*target)?;
        for validator in &if_validators {
            validator.validate_attributes(&mut *snapshot, &attributes)?;
        }

        if snapshot.has_errors() {
            tracing::debug!(
                attribute,
                precondition_errors = snapshot.errors().len(),
                "Conditional gate closed: precondition failed"
            );
            return Ok(GateOutcome::PreconditionFailed);
        }

        let then_validators = resolve_all(&self.then_rules, &self.factory, &*target)?;
        let before = target.errors().len();
        for validator in &then_validators {
            validator.validate_attributes(&mut *target, &attributes)?;
        }

        tracing::debug!(
            attribute,
            new_errors = target.errors().len().saturating_sub(before),
            "Conditional gate applied"
        );
        Ok(GateOutcome::Applied)
    }
}

impl Validator for ConditionalGate {
    /// Evaluates once per bound attribute that is being validated.
    fn validate_attributes(
        &self,
        model: &mut dyn Model,
        attributes: &[String],
    ) -> Result<(), CoreError> {
        for attribute in self.attributes.iter().filter(|a| attributes.contains(*a)) {
            if self.skip_on_error && model.has_error(attribute) {
                tracing::debug!(%attribute, "Conditional gate skipped: attribute has errors");
                continue;
            }
            self.evaluate(model, attribute)?;
        }
        Ok(())
    }
}

/// Constructor for the `conditional` kind.
///
/// Options: `if` and `then` (arrays of rules, default empty),
/// `skip_on_empty` (default false) and `skip_on_error` (default true).
pub fn build(ctx: &ValidatorContext<'_>) -> Result<Arc<dyn Validator>, CoreError> {
    let mut options = ctx.options();
    let empty = Value::Array(Vec::new());
    let if_rules = parse_rule_specs(options.value("if").unwrap_or(&empty), "if")?;
    let then_rules = parse_rule_specs(options.value("then").unwrap_or(&empty), "then")?;
    let skip_on_empty = options.bool("skip_on_empty")?.unwrap_or(false);
    let skip_on_error = options.bool("skip_on_error")?.unwrap_or(true);
    options.finish()?;

    let gate = ConditionalGate::new(
        if_rules.into_iter().map(Into::into).collect(),
        then_rules.into_iter().map(Into::into).collect(),
        skip_on_empty,
    )
    .with_factory(ctx.factory.clone())
    .with_skip_on_error(skip_on_error)
    .bind(ctx.attributes.iter().cloned());
    Ok(Arc::new(gate))
}
