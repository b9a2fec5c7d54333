use serde_json::Value;

/// Attribute values of a model, keyed by attribute name.
pub type Attributes = serde_json::Map<String, Value>;

/// Rule options as declared in configuration.
pub type Options = serde_json::Map<String, Value>;

/// A missing value, `null`, `""` and `[]` all count as empty.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        _ => false,
    }
}
