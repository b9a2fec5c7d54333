//! `string`: string values with optional length limits (in characters).

use std::sync::Arc;

use serde_json::Value;

use super::{Check, Failure, RuleValidator, Validator};
use crate::error::CoreError;
use crate::factory::ValidatorContext;
use crate::model::Model;

#[derive(Debug)]
pub struct StringCheck {
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub length: Option<usize>,
}

impl Check for StringCheck {
    fn check(&self, _model: &dyn Model, _attribute: &str, value: Option<&Value>) -> Option<Failure> {
        let Some(Value::String(s)) = value else {
            return Some(Failure::new("{attribute} must be a string."));
        };
        let len = s.chars().count();
        if let Some(min) = self.min.filter(|min| len < *min) {
            return Some(
                Failure::new("{attribute} should contain at least {min} characters.")
                    .with("min", min),
            );
        }
        if let Some(max) = self.max.filter(|max| len > *max) {
            return Some(
                Failure::new("{attribute} should contain at most {max} characters.")
                    .with("max", max),
            );
        }
        if let Some(length) = self.length.filter(|length| len != *length) {
            return Some(
                Failure::new("{attribute} should contain {length} characters.")
                    .with("length", length),
            );
        }
        None
    }
}

pub fn build(ctx: &ValidatorContext<'_>) -> Result<Arc<dyn Validator>, CoreError> {
    let mut options = ctx.options();
    let check = StringCheck {
        min: options.count("min")?,
        max: options.count("max")?,
        length: options.count("length")?,
    };
    RuleValidator::build(ctx, options, true, check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use serde_json::json;

    fn rule(min: Option<usize>, max: Option<usize>, length: Option<usize>) -> StringCheck {
        StringCheck { min, max, length }
    }

    fn passes(rule: &StringCheck, value: Value) -> bool {
        rule.check(&Record::default(), "name", Some(&value)).is_none()
    }

    #[test]
    fn rejects_non_strings() {
        assert!(!passes(&rule(None, None, None), json!(42)));
    }

    #[test]
    fn min_and_max() {
        let r = rule(Some(2), Some(4), None);
        assert!(passes(&r, json!("ab")));
        assert!(passes(&r, json!("abcd")));
        assert!(!passes(&r, json!("a")));
        assert!(!passes(&r, json!("abcde")));
    }

    #[test]
    fn exact_length_counts_characters() {
        let r = rule(None, None, Some(3));
        assert!(passes(&r, json!("été")));
        assert!(!passes(&r, json!("ab")));
    }
}
