//! Loading a single gate from JSON.
//!
//! Shape: `{"if": [...], "then": [...], "skip_on_empty": false}`. Both lists
//! default to empty but, when present, must be arrays. All checks run at load
//! time so a bad configuration never reaches evaluation.

use serde::Deserialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::factory::ValidatorFactory;
use crate::gate::ConditionalGate;
use crate::model::json_type_name;
use crate::rules::{parse_rule_specs, RuleSpec};

/// Keys accepted at the top level of a gate configuration.
pub const GATE_CONFIG_KEYS: &[&str] = &["if", "then", "skip_on_empty"];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct GateConfig {
    pub if_rules: Vec<RuleSpec>,
    pub then_rules: Vec<RuleSpec>,
    pub skip_on_empty: bool,
}

impl GateConfig {
    pub fn from_value(value: &Value) -> Result<Self, CoreError> {
        let Value::Object(map) = value else {
            return Err(CoreError::Configuration(format!(
                "a gate configuration must be an object, got {}",
                json_type_name(value)
            )));
        };
        if let Some(unknown) = map.keys().find(|k| !GATE_CONFIG_KEYS.contains(&k.as_str())) {
            return Err(CoreError::Configuration(format!(
                "unknown gate configuration key '{unknown}'. Valid keys: {}",
                GATE_CONFIG_KEYS.join(", ")
            )));
        }
        let empty = Value::Array(Vec::new());
        let skip_on_empty = match map.get("skip_on_empty") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(CoreError::Configuration(format!(
                    "\"skip_on_empty\" must be a boolean, got {}",
                    json_type_name(other)
                )))
            }
        };
        Ok(Self {
            if_rules: parse_rule_specs(map.get("if").unwrap_or(&empty), "if")?,
            then_rules: parse_rule_specs(map.get("then").unwrap_or(&empty), "then")?,
            skip_on_empty,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            CoreError::Configuration(format!("gate configuration is not valid JSON: {e}"))
        })?;
        Self::from_value(&value)
    }

    pub fn into_gate(self, factory: ValidatorFactory) -> ConditionalGate {
        ConditionalGate::new(
            self.if_rules.into_iter().map(Into::into).collect(),
            self.then_rules.into_iter().map(Into::into).collect(),
            self.skip_on_empty,
        )
        .with_factory(factory)
    }
}

impl TryFrom<Value> for GateConfig {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Model, Record};
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn loads_full_configuration() {
        let config = GateConfig::from_value(&json!({
            "if": [[["method"], "in", {"range": ["card", "cash"]}]],
            "then": [[["due_date"], "required"]],
            "skip_on_empty": true
        }))
        .expect("valid config");
        assert_eq!(config.if_rules.len(), 1);
        assert_eq!(config.then_rules[0].kind, "required");
        assert!(config.skip_on_empty);
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let config = GateConfig::from_value(&json!({})).expect("valid config");
        assert_eq!(config, GateConfig::default());
    }

    #[test]
    fn non_array_if_is_rejected() {
        let err = GateConfig::from_value(&json!({"if": "method", "then": []})).unwrap_err();
        assert_matches!(err, CoreError::Configuration(msg) if msg.contains("\"if\""));
    }

    #[test]
    fn non_array_then_is_rejected() {
        let err = GateConfig::from_value(&json!({"if": [], "then": 3})).unwrap_err();
        assert_matches!(err, CoreError::Configuration(msg) if msg.contains("\"then\""));
    }

    #[test]
    fn malformed_rule_is_rejected_at_load() {
        let err = GateConfig::from_value(&json!({"then": [["due_date"]]})).unwrap_err();
        assert_matches!(err, CoreError::Configuration(_));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = GateConfig::from_value(&json!({"when": []})).unwrap_err();
        assert_matches!(err, CoreError::Configuration(msg) if msg.contains("when"));
    }

    #[test]
    fn deserializes_through_serde() {
        let config: GateConfig =
            serde_json::from_str(r#"{"if": [], "then": [["a", "required"]]}"#).expect("valid");
        assert_eq!(config.then_rules[0].attributes, ["a"]);
        assert!(serde_json::from_str::<GateConfig>(r#"{"if": 1}"#).is_err());
    }

    #[test]
    fn built_gate_evaluates() {
        let gate = GateConfig::from_json_str(r#"{"then": [["a", "required"]]}"#)
            .expect("valid config")
            .into_gate(ValidatorFactory::builtin());
        let mut model = Record::from_value(json!({"a": null})).expect("object");
        gate.evaluate(&mut model, "a").expect("valid configuration");
        assert!(model.has_error("a"));
    }
}
