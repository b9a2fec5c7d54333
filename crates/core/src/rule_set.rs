//! An ordered list of rules forming one validation pass over a model.

use serde_json::Value;

use crate::error::CoreError;
use crate::factory::ValidatorFactory;
use crate::model::Model;
use crate::rules::{parse_rule_specs, resolve_all, RuleDeclaration};

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<RuleDeclaration>,
    factory: ValidatorFactory,
}

impl RuleSet {
    pub fn new(rules: Vec<RuleDeclaration>) -> Self {
        Self {
            rules,
            factory: ValidatorFactory::builtin(),
        }
    }

    /// Parse a JSON array of rules. Malformed rules are rejected here rather
    /// than on first use.
    pub fn from_value(value: &Value) -> Result<Self, CoreError> {
        let specs = parse_rule_specs(value, "rules")?;
        Ok(Self::new(specs.into_iter().map(Into::into).collect()))
    }

    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| CoreError::Configuration(format!("rules are not valid JSON: {e}")))?;
        Self::from_value(&value)
    }

    pub fn with_factory(mut self, factory: ValidatorFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn push(&mut self, rule: impl Into<RuleDeclaration>) {
        self.rules.push(rule.into());
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule over the model's active attributes, in order.
    ///
    /// Existing errors are kept. Returns whether the model ends up without
    /// errors.
    pub fn validate(&self, model: &mut dyn Model) -> Result<bool, CoreError> {
        let validators = resolve_all(&self.rules, &self.factory, &*model)?;
        let attributes = model.active_attributes();
        for validator in &validators {
            validator.validate_attributes(&mut *model, &attributes)?;
        }
        tracing::debug!(
            rules = validators.len(),
            errors = model.errors().len(),
            "Rule set validated"
        );
        Ok(!model.has_errors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::rules::RuleSpec;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn runs_rules_in_order_and_reports_validity() {
        let rules = RuleSet::from_value(&json!([
            [["name"], "required"],
            [["name"], "string", {"max": 3}]
        ]))
        .expect("valid rules");
        let mut model = Record::from_value(json!({"name": "Alexandra"})).expect("object");
        assert!(!rules.validate(&mut model).expect("valid configuration"));
        assert_eq!(
            model.errors().get("name"),
            ["name should contain at most 3 characters."]
        );
    }

    #[test]
    fn skip_on_error_stops_later_rules_for_the_attribute() {
        let rules = RuleSet::from_value(&json!([
            [["age"], "required"],
            [["age"], "number", {"min": 18}]
        ]))
        .expect("valid rules");
        let mut model = Record::from_value(json!({"age": ""})).expect("object");
        rules.validate(&mut model).expect("valid configuration");
        assert_eq!(model.errors().get("age"), ["age cannot be blank."]);
    }

    #[test]
    fn conditional_rules_compose_with_plain_ones() {
        let rules = RuleSet::from_value(&json!([
            [["method"], "required"],
            [["due_date"], "conditional", {
                "if": [[["method"], "in", {"range": ["card", "cash"]}]],
                "then": [[["due_date"], "required"], [["due_date"], "number"]]
            }]
        ]))
        .expect("valid rules");
        let mut model =
            Record::from_value(json!({"method": "card", "due_date": "soon"})).expect("object");
        assert!(!rules.validate(&mut model).expect("valid configuration"));
        assert_eq!(model.errors().get("due_date"), ["due_date must be a number."]);
    }

    #[test]
    fn conditional_rule_passes_over_attribute_with_errors() {
        let rules = |skip_on_error: bool| {
            RuleSet::from_value(&json!([
                [["due_date"], "required"],
                [["due_date"], "conditional", {
                    "then": [[["amount"], "required"]],
                    "skip_on_error": skip_on_error
                }]
            ]))
            .expect("valid rules")
        };
        let record = || {
            Record::from_value(json!({"due_date": null, "amount": null})).expect("object")
        };

        let mut model = record();
        rules(true).validate(&mut model).expect("valid configuration");
        assert_eq!(model.errors().get("due_date"), ["due_date cannot be blank."]);
        assert!(!model.has_error("amount"));

        let mut model = record();
        rules(false).validate(&mut model).expect("valid configuration");
        assert_eq!(model.errors().get("amount"), ["amount cannot be blank."]);
    }

    #[test]
    fn malformed_rule_is_rejected_at_load() {
        let err = RuleSet::from_value(&json!([["name"]])).unwrap_err();
        assert_matches!(err, CoreError::Configuration(_));
    }

    #[test]
    fn invalid_json_is_a_configuration_error() {
        assert_matches!(
            RuleSet::from_json_str("[[").unwrap_err(),
            CoreError::Configuration(_)
        );
    }

    #[test]
    fn push_appends_rules() {
        let mut rules = RuleSet::default();
        assert!(rules.is_empty());
        rules.push(RuleSpec::new(["a"], "required"));
        assert_eq!(rules.len(), 1);
    }
}
