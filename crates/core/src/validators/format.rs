//! `email` and `url` format checks, backed by the `validator` crate.

use std::sync::Arc;

use serde_json::Value;
use validator::{ValidateEmail, ValidateUrl};

use super::{Check, Failure, RuleValidator, Validator};
use crate::error::CoreError;
use crate::factory::ValidatorContext;
use crate::model::Model;

#[derive(Debug)]
pub struct EmailCheck;

impl Check for EmailCheck {
    fn check(&self, _model: &dyn Model, _attribute: &str, value: Option<&Value>) -> Option<Failure> {
        let valid = matches!(value, Some(Value::String(s)) if s.validate_email());
        (!valid).then(|| Failure::new("{attribute} is not a valid email address."))
    }
}

#[derive(Debug)]
pub struct UrlCheck;

impl Check for UrlCheck {
    fn check(&self, _model: &dyn Model, _attribute: &str, value: Option<&Value>) -> Option<Failure> {
        let valid = matches!(value, Some(Value::String(s)) if s.validate_url());
        (!valid).then(|| Failure::new("{attribute} is not a valid URL."))
    }
}

pub fn build_email(ctx: &ValidatorContext<'_>) -> Result<Arc<dyn Validator>, CoreError> {
    RuleValidator::build(ctx, ctx.options(), true, EmailCheck)
}

pub fn build_url(ctx: &ValidatorContext<'_>) -> Result<Arc<dyn Validator>, CoreError> {
    RuleValidator::build(ctx, ctx.options(), true, UrlCheck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use serde_json::json;

    fn passes(check: &dyn Check, value: Value) -> bool {
        check.check(&Record::default(), "field", Some(&value)).is_none()
    }

    #[test]
    fn email_addresses() {
        assert!(passes(&EmailCheck, json!("billing@example.com")));
        assert!(!passes(&EmailCheck, json!("not-an-email")));
        assert!(!passes(&EmailCheck, json!(12)));
    }

    #[test]
    fn urls() {
        assert!(passes(&UrlCheck, json!("https://example.com/pay")));
        assert!(!passes(&UrlCheck, json!("example dot com")));
    }
}
