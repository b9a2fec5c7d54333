//! Rule declarations: pre-built validators or specs resolved on demand.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::factory::ValidatorFactory;
use crate::model::{json_type_name, Model};
use crate::types::Options;
use crate::validators::Validator;

/// A validator to be built by kind for a list of attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub attributes: Vec<String>,
    pub kind: String,
    #[serde(flatten)]
    pub options: Options,
}

impl RuleSpec {
    pub fn new<I, S>(attributes: I, kind: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
            kind: kind.to_string(),
            options: Options::new(),
        }
    }

    pub fn option(mut self, name: &str, value: Value) -> Self {
        self.options.insert(name.to_string(), value);
        self
    }

    /// A spec must name at least one attribute and a validator kind.
    pub fn check(&self) -> Result<(), CoreError> {
        if self.attributes.is_empty() || self.kind.trim().is_empty() {
            return Err(CoreError::Configuration(
                "Invalid validation rule: a rule must specify both attribute names and validator type."
                    .into(),
            ));
        }
        Ok(())
    }

    /// Parse either the tuple form `[attrs, kind, {options}]` or the object
    /// form `{"attributes": [...], "kind": "...", ...options}`.
    pub fn from_value(value: &Value) -> Result<Self, CoreError> {
        let spec = match value {
            Value::Array(parts) => Self::from_tuple(parts)?,
            Value::Object(map) => {
                let mut options = map.clone();
                let attributes = match options.remove("attributes") {
                    Some(attrs) => attribute_list(&attrs)?,
                    None => Vec::new(),
                };
                let kind = match options.remove("kind") {
                    Some(Value::String(kind)) => kind,
                    Some(other) => {
                        return Err(CoreError::Configuration(format!(
                            "rule kind must be a string, got {}",
                            json_type_name(&other)
                        )))
                    }
                    None => String::new(),
                };
                Self {
                    attributes,
                    kind,
                    options,
                }
            }
            other => {
                return Err(CoreError::Configuration(format!(
                    "a rule must be an array or an object, got {}",
                    json_type_name(other)
                )))
            }
        };
        spec.check()?;
        Ok(spec)
    }

    fn from_tuple(parts: &[Value]) -> Result<Self, CoreError> {
        let attributes = match parts.first() {
            Some(attrs) => attribute_list(attrs)?,
            None => Vec::new(),
        };
        let kind = match parts.get(1) {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => {
                return Err(CoreError::Configuration(format!(
                    "rule kind must be a string, got {}",
                    json_type_name(other)
                )))
            }
            None => String::new(),
        };
        let mut options = Options::new();
        for extra in parts.iter().skip(2) {
            match extra {
                Value::Object(map) => options.extend(map.clone()),
                other => {
                    return Err(CoreError::Configuration(format!(
                        "rule options must be objects, got {}",
                        json_type_name(other)
                    )))
                }
            }
        }
        Ok(Self {
            attributes,
            kind,
            options,
        })
    }
}

/// A single attribute name is promoted to a one-element list.
fn attribute_list(value: &Value) -> Result<Vec<String>, CoreError> {
    match value {
        Value::String(name) => Ok(vec![name.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(name) => Ok(name.clone()),
                other => Err(CoreError::Configuration(format!(
                    "attribute names must be strings, got {}",
                    json_type_name(other)
                ))),
            })
            .collect(),
        other => Err(CoreError::Configuration(format!(
            "rule attributes must be a string or an array of strings, got {}",
            json_type_name(other)
        ))),
    }
}

/// One entry of an `if`/`then` list or a rule set.
#[derive(Clone)]
pub enum RuleDeclaration {
    Instance(Arc<dyn Validator>),
    Spec(RuleSpec),
}

impl RuleDeclaration {
    /// Turn the declaration into a validator. Instances are shared as-is;
    /// specs are built through `factory` in the context of `model`.
    pub fn resolve(
        &self,
        factory: &ValidatorFactory,
        model: &dyn Model,
    ) -> Result<Arc<dyn Validator>, CoreError> {
        match self {
            Self::Instance(validator) => Ok(Arc::clone(validator)),
            Self::Spec(spec) => {
                spec.check()?;
                factory.create(&spec.kind, model, &spec.attributes, &spec.options)
            }
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, CoreError> {
        RuleSpec::from_value(value).map(Self::Spec)
    }
}

impl fmt::Debug for RuleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(validator) => f.debug_tuple("Instance").field(validator).finish(),
            Self::Spec(spec) => f.debug_tuple("Spec").field(spec).finish(),
        }
    }
}

impl From<RuleSpec> for RuleDeclaration {
    fn from(spec: RuleSpec) -> Self {
        Self::Spec(spec)
    }
}

impl From<Arc<dyn Validator>> for RuleDeclaration {
    fn from(validator: Arc<dyn Validator>) -> Self {
        Self::Instance(validator)
    }
}

/// Parse a JSON array of rule specs. `what` names the list in errors.
pub fn parse_rule_specs(value: &Value, what: &str) -> Result<Vec<RuleSpec>, CoreError> {
    match value {
        Value::Array(items) => items.iter().map(RuleSpec::from_value).collect(),
        other => Err(CoreError::Configuration(format!(
            "Invalid argument \"{what}\": please supply an array, got {}",
            json_type_name(other)
        ))),
    }
}

/// Resolve every declaration before any of them runs.
pub fn resolve_all(
    declarations: &[RuleDeclaration],
    factory: &ValidatorFactory,
    model: &dyn Model,
) -> Result<Vec<Arc<dyn Validator>>, CoreError> {
    declarations
        .iter()
        .map(|declaration| declaration.resolve(factory, model))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn parses_tuple_form() {
        let spec = RuleSpec::from_value(&json!([["method"], "in", {"range": ["card", "cash"]}]))
            .expect("valid tuple");
        assert_eq!(spec.attributes, ["method"]);
        assert_eq!(spec.kind, "in");
        assert_eq!(spec.options["range"], json!(["card", "cash"]));
    }

    #[test]
    fn single_attribute_name_is_promoted() {
        let spec = RuleSpec::from_value(&json!(["due_date", "required"])).expect("valid tuple");
        assert_eq!(spec.attributes, ["due_date"]);
        assert!(spec.options.is_empty());
    }

    #[test]
    fn parses_object_form() {
        let spec = RuleSpec::from_value(&json!({
            "attributes": ["age"],
            "kind": "number",
            "min": 18
        }))
        .expect("valid object");
        assert_eq!(spec.kind, "number");
        assert_eq!(spec.options.len(), 1);
        assert_eq!(spec.options["min"], json!(18));
    }

    #[test]
    fn tuple_without_kind_is_rejected() {
        let err = RuleSpec::from_value(&json!([["due_date"]])).unwrap_err();
        assert_matches!(err, CoreError::Configuration(_));
    }

    #[test]
    fn empty_attribute_list_is_rejected() {
        let err = RuleSpec::from_value(&json!([[], "required"])).unwrap_err();
        assert_matches!(err, CoreError::Configuration(_));
    }

    #[test]
    fn non_string_kind_is_rejected() {
        let err = RuleSpec::from_value(&json!([["a"], 5])).unwrap_err();
        assert_matches!(err, CoreError::Configuration(_));
    }

    #[test]
    fn scalar_rule_is_rejected() {
        let err = RuleSpec::from_value(&json!("required")).unwrap_err();
        assert_matches!(err, CoreError::Configuration(_));
    }

    #[test]
    fn rule_list_must_be_array() {
        let err = parse_rule_specs(&json!({"a": 1}), "if").unwrap_err();
        assert_matches!(err, CoreError::Configuration(msg) if msg.contains("\"if\""));
    }

    #[test]
    fn spec_built_in_code_is_checked_on_resolve() {
        let factory = ValidatorFactory::builtin();
        let model = crate::model::Record::default();
        let declaration = RuleDeclaration::from(RuleSpec::new(["due_date"], ""));
        let err = declaration.resolve(&factory, &model).unwrap_err();
        assert_matches!(err, CoreError::Configuration(_));
    }
}
