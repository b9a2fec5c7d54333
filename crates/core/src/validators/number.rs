//! `number` / `integer`: numeric values with optional bounds.

use std::sync::Arc;

use serde_json::Value;

use super::{Check, Failure, RuleValidator, Validator};
use crate::error::CoreError;
use crate::factory::ValidatorContext;
use crate::model::Model;

#[derive(Debug)]
pub struct NumberCheck {
    pub integer_only: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumberCheck {
    /// Numbers and numeric strings; booleans and containers are rejected.
    fn parse(&self, value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => {
                let number = n.as_f64()?;
                (!self.integer_only || number.fract() == 0.0).then_some(number)
            }
            Value::String(s) if self.integer_only => s.trim().parse::<i64>().ok().map(|n| n as f64),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

impl Check for NumberCheck {
    fn check(&self, _model: &dyn Model, _attribute: &str, value: Option<&Value>) -> Option<Failure> {
        let Some(number) = value.and_then(|v| self.parse(v)) else {
            return Some(if self.integer_only {
                Failure::new("{attribute} must be an integer.")
            } else {
                Failure::new("{attribute} must be a number.")
            });
        };
        if let Some(min) = self.min.filter(|min| number < *min) {
            return Some(Failure::new("{attribute} must be no less than {min}.").with("min", min));
        }
        if let Some(max) = self.max.filter(|max| number > *max) {
            return Some(
                Failure::new("{attribute} must be no greater than {max}.").with("max", max),
            );
        }
        None
    }
}

/// `integer` forces `integer_only`.
pub fn build(ctx: &ValidatorContext<'_>) -> Result<Arc<dyn Validator>, CoreError> {
    let mut options = ctx.options();
    let integer_only = options.bool("integer_only")?.unwrap_or(false) || ctx.kind == "integer";
    let check = NumberCheck {
        integer_only,
        min: options.number("min")?,
        max: options.number("max")?,
    };
    if let (Some(min), Some(max)) = (check.min, check.max) {
        if min > max {
            return Err(CoreError::invalid_option(
                ctx.kind,
                "min",
                format!("min ({min}) must be <= max ({max})"),
            ));
        }
    }
    RuleValidator::build(ctx, options, true, check)
}
