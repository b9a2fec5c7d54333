//! Validator trait and the built-in validator library.
//!
//! Every built-in is a [`RuleValidator`] wrapping a [`Check`]: the wrapper
//! handles attribute selection, the skip options and message rendering, the
//! check only decides whether one value is acceptable.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::CoreError;
use crate::factory::ValidatorContext;
use crate::model::Model;
use crate::types::is_empty_value;

pub mod boolean;
pub mod compare;
pub mod format;
pub mod number;
pub mod options;
pub mod pattern;
pub mod range;
pub mod required;
pub mod string;

use options::OptionReader;

/// A unit of validation bound to some attributes.
pub trait Validator: fmt::Debug + Send + Sync {
    /// Check the given attributes of `model`, appending messages to its error
    /// bag. `Err` is reserved for configuration problems.
    fn validate_attributes(
        &self,
        model: &mut dyn Model,
        attributes: &[String],
    ) -> Result<(), CoreError>;
}

/// A rejected value: message template plus placeholder values.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    template: &'static str,
    params: Vec<(&'static str, String)>,
}

impl Failure {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            params: Vec::new(),
        }
    }

    pub fn with(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.params.push((name, value.to_string()));
        self
    }

    /// Render `custom` if given, otherwise the default template.
    pub fn render(&self, custom: Option<&str>, attribute: &str) -> String {
        let mut message = custom.unwrap_or(self.template).replace("{attribute}", attribute);
        for (name, value) in &self.params {
            message = message.replace(&format!("{{{name}}}"), value);
        }
        message
    }
}

/// Decides whether a single attribute value is acceptable.
pub trait Check: fmt::Debug + Send + Sync {
    fn check(&self, model: &dyn Model, attribute: &str, value: Option<&Value>) -> Option<Failure>;
}

/// Options every built-in validator accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonOptions {
    pub message: Option<String>,
    pub skip_on_error: bool,
    pub skip_on_empty: bool,
}

impl CommonOptions {
    fn read(options: &mut OptionReader<'_>, skip_on_empty: bool) -> Result<Self, CoreError> {
        Ok(Self {
            message: options.string("message")?,
            skip_on_error: options.bool("skip_on_error")?.unwrap_or(true),
            skip_on_empty: options.bool("skip_on_empty")?.unwrap_or(skip_on_empty),
        })
    }
}

/// A [`Check`] bound to attributes.
#[derive(Debug)]
pub struct RuleValidator<C> {
    kind: String,
    attributes: Vec<String>,
    common: CommonOptions,
    check: C,
}

impl<C: Check + 'static> RuleValidator<C> {
    /// Read the common options, reject leftovers and wrap `check`.
    pub fn build(
        ctx: &ValidatorContext<'_>,
        mut options: OptionReader<'_>,
        skip_on_empty: bool,
        check: C,
    ) -> Result<Arc<dyn Validator>, CoreError> {
        let common = CommonOptions::read(&mut options, skip_on_empty)?;
        options.finish()?;
        Ok(Arc::new(Self {
            kind: ctx.kind.to_string(),
            attributes: ctx.attributes.to_vec(),
            common,
            check,
        }))
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl<C: Check> Validator for RuleValidator<C> {
    fn validate_attributes(
        &self,
        model: &mut dyn Model,
        attributes: &[String],
    ) -> Result<(), CoreError> {
        for attribute in self.attributes.iter().filter(|a| attributes.contains(*a)) {
            if self.common.skip_on_error && model.has_error(attribute) {
                continue;
            }
            let value = model.value(attribute);
            if self.common.skip_on_empty && is_empty_value(value) {
                continue;
            }
            if let Some(failure) = self.check.check(&*model, attribute, value) {
                let message = failure.render(self.common.message.as_deref(), attribute);
                model.add_error(attribute, message);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Value helpers shared by the checks
// ---------------------------------------------------------------------------

/// Numeric reading of a value; numeric strings count.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Equality that coerces between numbers, numeric strings and booleans.
pub(crate) fn loose_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (a, b) {
        (Value::String(_), Value::String(_)) => false,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => false,
        _ => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

/// Text form used in messages: strings unquoted, everything else as JSON.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
