//! `match`: string values tested against a regular expression.

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use super::{Check, Failure, RuleValidator, Validator};
use crate::error::CoreError;
use crate::factory::ValidatorContext;
use crate::model::Model;

#[derive(Debug)]
pub struct MatchCheck {
    pub pattern: Regex,
    pub not: bool,
}

impl Check for MatchCheck {
    fn check(&self, _model: &dyn Model, _attribute: &str, value: Option<&Value>) -> Option<Failure> {
        let valid = match value {
            Some(Value::String(s)) => self.pattern.is_match(s) != self.not,
            _ => false,
        };
        (!valid).then(|| Failure::new("{attribute} is invalid."))
    }
}

pub fn build(ctx: &ValidatorContext<'_>) -> Result<Arc<dyn Validator>, CoreError> {
    let mut options = ctx.options();
    let Some(source) = options.string("pattern")? else {
        return Err(CoreError::invalid_option(
            ctx.kind,
            "pattern",
            "the \"pattern\" option must be set",
        ));
    };
    let pattern = Regex::new(&source)
        .map_err(|e| CoreError::invalid_option(ctx.kind, "pattern", e.to_string()))?;
    let check = MatchCheck {
        pattern,
        not: options.bool("not")?.unwrap_or(false),
    };
    RuleValidator::build(ctx, options, true, check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use serde_json::json;

    fn rule(pattern: &str, not: bool) -> MatchCheck {
        MatchCheck {
            pattern: Regex::new(pattern).expect("valid regex"),
            not,
        }
    }

    fn passes(rule: &MatchCheck, value: Value) -> bool {
        rule.check(&Record::default(), "code", Some(&value)).is_none()
    }

    #[test]
    fn matching_value_passes() {
        assert!(passes(&rule("^[a-z]+$", false), json!("hello")));
        assert!(!passes(&rule("^[a-z]+$", false), json!("Hello123")));
    }

    #[test]
    fn not_inverts_the_match() {
        assert!(passes(&rule("^tmp_", true), json!("final")));
        assert!(!passes(&rule("^tmp_", true), json!("tmp_file")));
    }

    #[test]
    fn non_strings_are_invalid() {
        assert!(!passes(&rule(".*", false), json!(5)));
    }
}
