//! `in`: the value must be one of a fixed list.

use std::sync::Arc;

use serde_json::Value;

use super::{loose_eq, Check, Failure, RuleValidator, Validator};
use crate::error::CoreError;
use crate::factory::ValidatorContext;
use crate::model::Model;

#[derive(Debug)]
pub struct InCheck {
    pub range: Vec<Value>,
    /// Invert: the value must *not* be in the list.
    pub not: bool,
    pub strict: bool,
}

impl InCheck {
    fn contains(&self, value: &Value) -> bool {
        self.range.iter().any(|allowed| {
            if self.strict {
                allowed == value
            } else {
                loose_eq(allowed, value)
            }
        })
    }
}

impl Check for InCheck {
    fn check(&self, _model: &dyn Model, _attribute: &str, value: Option<&Value>) -> Option<Failure> {
        let in_range = match value {
            None => false,
            Some(Value::Array(items)) => items.iter().all(|item| self.contains(item)),
            Some(v) => self.contains(v),
        };
        (in_range == self.not).then(|| Failure::new("{attribute} is invalid."))
    }
}

/// The list comes from `range` (alias `values`) or from the model property
/// named by `range_property`, looked up on the model the rule is built for.
pub fn build(ctx: &ValidatorContext<'_>) -> Result<Arc<dyn Validator>, CoreError> {
    let mut options = ctx.options();
    let inline = match options.array("range")? {
        Some(range) => Some(range),
        None => options.array("values")?,
    };
    let range = match (inline, options.string("range_property")?) {
        (Some(range), None) => range.clone(),
        (None, Some(property)) => match ctx.model.property(&property) {
            Some(Value::Array(range)) => range.clone(),
            Some(_) => {
                return Err(CoreError::invalid_option(
                    ctx.kind,
                    "range_property",
                    format!("model property '{property}' is not an array"),
                ))
            }
            None => {
                return Err(CoreError::invalid_option(
                    ctx.kind,
                    "range_property",
                    format!("model has no property '{property}'"),
                ))
            }
        },
        (Some(_), Some(_)) => {
            return Err(CoreError::invalid_option(
                ctx.kind,
                "range_property",
                "cannot be combined with an inline range",
            ))
        }
        (None, None) => {
            return Err(CoreError::invalid_option(
                ctx.kind,
                "range",
                "the \"range\" option must be set",
            ))
        }
    };
    let check = InCheck {
        range,
        not: options.bool("not")?.unwrap_or(false),
        strict: options.bool("strict")?.unwrap_or(false),
    };
    RuleValidator::build(ctx, options, true, check)
}
