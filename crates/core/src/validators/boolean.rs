//! `boolean`: the value must be the configured true or false value.

use std::sync::Arc;

use serde_json::Value;

use super::{display_value, loose_eq, Check, Failure, RuleValidator, Validator};
use crate::error::CoreError;
use crate::factory::ValidatorContext;
use crate::model::Model;

#[derive(Debug)]
pub struct BooleanCheck {
    pub true_value: Value,
    pub false_value: Value,
    pub strict: bool,
}

impl BooleanCheck {
    fn is(&self, value: &Value, expected: &Value) -> bool {
        if self.strict {
            value == expected
        } else {
            loose_eq(value, expected)
        }
    }
}

impl Check for BooleanCheck {
    fn check(&self, _model: &dyn Model, _attribute: &str, value: Option<&Value>) -> Option<Failure> {
        let valid =
            value.is_some_and(|v| self.is(v, &self.true_value) || self.is(v, &self.false_value));
        (!valid).then(|| {
            Failure::new("{attribute} must be either \"{true}\" or \"{false}\".")
                .with("true", display_value(&self.true_value))
                .with("false", display_value(&self.false_value))
        })
    }
}

pub fn build(ctx: &ValidatorContext<'_>) -> Result<Arc<dyn Validator>, CoreError> {
    let mut options = ctx.options();
    let check = BooleanCheck {
        true_value: options.value("true_value").cloned().unwrap_or(Value::Bool(true)),
        false_value: options.value("false_value").cloned().unwrap_or(Value::Bool(false)),
        strict: options.bool("strict")?.unwrap_or(false),
    };
    RuleValidator::build(ctx, options, true, check)
}
