//! The model capability contract and a JSON-backed implementation.

use std::fmt;

use serde_json::Value;

use crate::error::CoreError;
use crate::error_bag::ErrorBag;
use crate::types::Attributes;

/// What validators and the conditional gate need from an object under
/// validation.
pub trait Model: fmt::Debug {
    /// Current value of an attribute, `None` if the model has no such value.
    fn value(&self, attribute: &str) -> Option<&Value>;

    /// Names of the attributes subject to validation, in order.
    fn active_attributes(&self) -> Vec<String>;

    fn errors(&self) -> &ErrorBag;

    fn errors_mut(&mut self) -> &mut ErrorBag;

    /// An independent copy sharing no attribute or error storage with `self`.
    fn snapshot(&self) -> Box<dyn Model>;

    /// Named model configuration visible to validator constructors.
    fn property(&self, _name: &str) -> Option<&Value> {
        None
    }

    fn has_errors(&self) -> bool {
        self.errors().has_errors()
    }

    fn has_error(&self, attribute: &str) -> bool {
        self.errors().has_error(attribute)
    }

    fn add_error(&mut self, attribute: &str, message: String) {
        self.errors_mut().add(attribute, message);
    }

    fn clear_errors(&mut self) {
        self.errors_mut().clear();
    }
}

/// A model whose attributes are a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    active: Vec<String>,
    values: Attributes,
    properties: Attributes,
    errors: ErrorBag,
}

impl Record {
    /// Every key of `values` becomes an active attribute.
    pub fn new(values: Attributes) -> Self {
        Self {
            active: values.keys().cloned().collect(),
            values,
            properties: Attributes::new(),
            errors: ErrorBag::new(),
        }
    }

    /// Build from a JSON object. Any other JSON shape is rejected.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(values) => Ok(Self::new(values)),
            other => Err(CoreError::Configuration(format!(
                "a record must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Restrict validation to the given attributes, in the given order.
    pub fn with_active_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_property(mut self, name: &str, value: Value) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    pub fn set(&mut self, attribute: &str, value: Value) {
        if !self.active.iter().any(|a| a == attribute) {
            self.active.push(attribute.to_string());
        }
        self.values.insert(attribute.to_string(), value);
    }

    pub fn values(&self) -> &Attributes {
        &self.values
    }
}

impl Model for Record {
    fn value(&self, attribute: &str) -> Option<&Value> {
        self.values.get(attribute)
    }

    fn active_attributes(&self) -> Vec<String> {
        self.active.clone()
    }

    fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorBag {
        &mut self.errors
    }

    fn snapshot(&self) -> Box<dyn Model> {
        Box::new(self.clone())
    }

    fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Record {
        Record::from_value(json!({"method": "card", "due_date": null})).expect("object")
    }

    #[test]
    fn active_attributes_default_to_all_keys() {
        let mut attrs = record().active_attributes();
        attrs.sort();
        assert_eq!(attrs, ["due_date", "method"]);
    }

    #[test]
    fn with_active_attributes_overrides_order() {
        let r = record().with_active_attributes(["method"]);
        assert_eq!(r.active_attributes(), ["method"]);
    }

    #[test]
    fn rejects_non_object() {
        assert!(Record::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn snapshot_is_independent() {
        let mut original = record();
        original.add_error("method", "existing".into());

        let mut copy = original.snapshot();
        copy.clear_errors();
        copy.add_error("due_date", "copy only".into());

        assert_eq!(original.errors().get("method"), ["existing"]);
        assert!(!original.has_error("due_date"));
        assert_eq!(copy.value("method"), Some(&json!("card")));
    }

    #[test]
    fn set_adds_new_attribute_once() {
        let mut r = Record::default();
        r.set("a", json!(1));
        r.set("a", json!(2));
        assert_eq!(r.active_attributes(), ["a"]);
        assert_eq!(r.value("a"), Some(&json!(2)));
    }

    #[test]
    fn properties_are_visible() {
        let r = record().with_property("methods", json!(["card"]));
        assert_eq!(r.property("methods"), Some(&json!(["card"])));
        assert_eq!(r.property("other"), None);
    }
}
