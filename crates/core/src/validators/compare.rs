//! `compare`: compare the value with another attribute or a constant.

use std::cmp::Ordering;
use std::sync::Arc;

use serde_json::Value;

use super::{as_number, display_value, loose_eq, Check, Failure, RuleValidator, Validator};
use crate::error::CoreError;
use crate::factory::ValidatorContext;
use crate::model::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    StrictEq,
    NotEq,
    StrictNotEq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    pub fn parse(op: &str) -> Option<Self> {
        Some(match op {
            "==" => Self::Eq,
            "===" => Self::StrictEq,
            "!=" => Self::NotEq,
            "!==" => Self::StrictNotEq,
            ">" => Self::Gt,
            ">=" => Self::Gte,
            "<" => Self::Lt,
            "<=" => Self::Lte,
            _ => return None,
        })
    }

    fn holds(self, value: &Value, other: &Value) -> bool {
        match self {
            Self::Eq => loose_eq(value, other),
            Self::StrictEq => value == other,
            Self::NotEq => !loose_eq(value, other),
            Self::StrictNotEq => value != other,
            Self::Gt => order(value, other) == Some(Ordering::Greater),
            Self::Gte => matches!(order(value, other), Some(Ordering::Greater | Ordering::Equal)),
            Self::Lt => order(value, other) == Some(Ordering::Less),
            Self::Lte => matches!(order(value, other), Some(Ordering::Less | Ordering::Equal)),
        }
    }

    fn template(self) -> &'static str {
        match self {
            Self::Eq | Self::StrictEq => "{attribute} must be equal to \"{compare_value}\".",
            Self::NotEq | Self::StrictNotEq => {
                "{attribute} must not be equal to \"{compare_value}\"."
            }
            Self::Gt => "{attribute} must be greater than \"{compare_value}\".",
            Self::Gte => "{attribute} must be greater than or equal to \"{compare_value}\".",
            Self::Lt => "{attribute} must be less than \"{compare_value}\".",
            Self::Lte => "{attribute} must be less than or equal to \"{compare_value}\".",
        }
    }
}

/// Numeric order when both sides are numeric, otherwise string order.
fn order(a: &Value, b: &Value) -> Option<Ordering> {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y),
        _ => match (a, b) {
            (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
            _ => None,
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompareTarget {
    /// Another attribute; `None` means `<attribute>_repeat`.
    Attribute(Option<String>),
    Value(Value),
}

#[derive(Debug)]
pub struct CompareCheck {
    pub target: CompareTarget,
    pub operator: Operator,
}

impl Check for CompareCheck {
    fn check(&self, model: &dyn Model, attribute: &str, value: Option<&Value>) -> Option<Failure> {
        let (other, label) = match &self.target {
            CompareTarget::Value(v) => (v.clone(), display_value(v)),
            CompareTarget::Attribute(name) => {
                let name = name
                    .clone()
                    .unwrap_or_else(|| format!("{attribute}_repeat"));
                (model.value(&name).cloned().unwrap_or(Value::Null), name)
            }
        };
        let value = value.cloned().unwrap_or(Value::Null);
        (!self.operator.holds(&value, &other))
            .then(|| Failure::new(self.operator.template()).with("compare_value", label))
    }
}

pub fn build(ctx: &ValidatorContext<'_>) -> Result<Arc<dyn Validator>, CoreError> {
    let mut options = ctx.options();
    let attribute = options.string("compare_attribute")?;
    let value = options.value("compare_value").cloned();
    let target = match (attribute, value) {
        (Some(_), Some(_)) => {
            return Err(CoreError::invalid_option(
                ctx.kind,
                "compare_value",
                "cannot be combined with \"compare_attribute\"",
            ))
        }
        (None, Some(value)) => CompareTarget::Value(value),
        (attribute, None) => CompareTarget::Attribute(attribute),
    };
    let operator = match options.string("operator")? {
        None => Operator::Eq,
        Some(op) => Operator::parse(&op).ok_or_else(|| {
            CoreError::invalid_option(ctx.kind, "operator", format!("unknown operator '{op}'"))
        })?,
    };
    RuleValidator::build(ctx, options, true, CompareCheck { target, operator })
}
