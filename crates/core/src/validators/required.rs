//! `required`: the attribute must hold a value.

use std::sync::Arc;

use serde_json::Value;

use super::{display_value, loose_eq, Check, Failure, RuleValidator, Validator};
use crate::error::CoreError;
use crate::factory::ValidatorContext;
use crate::model::Model;
use crate::types::is_empty_value;

#[derive(Debug)]
pub struct RequiredCheck {
    /// When set, the value must equal this rather than merely be non-empty.
    pub required_value: Option<Value>,
    /// Without `required_value`, only a missing or `null` value fails.
    pub strict: bool,
}

impl Check for RequiredCheck {
    fn check(&self, _model: &dyn Model, _attribute: &str, value: Option<&Value>) -> Option<Failure> {
        match &self.required_value {
            None => {
                let missing = if self.strict {
                    matches!(value, None | Some(Value::Null))
                } else {
                    is_empty_value(value)
                };
                missing.then(|| Failure::new("{attribute} cannot be blank."))
            }
            Some(required) => {
                let matches = match value {
                    Some(v) if self.strict => v == required,
                    Some(v) => loose_eq(v, required),
                    None => false,
                };
                (!matches).then(|| {
                    Failure::new("{attribute} must be \"{required_value}\".")
                        .with("required_value", display_value(required))
                })
            }
        }
    }
}

pub fn build(ctx: &ValidatorContext<'_>) -> Result<Arc<dyn Validator>, CoreError> {
    let mut options = ctx.options();
    let check = RequiredCheck {
        required_value: options.value("required_value").cloned(),
        strict: options.bool("strict")?.unwrap_or(false),
    };
    RuleValidator::build(ctx, options, false, check)
}
