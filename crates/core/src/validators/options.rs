//! Typed access to declared rule options.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::CoreError;
use crate::model::json_type_name;
use crate::types::Options;

/// Reads options by name and reports anything left unread as unknown.
pub struct OptionReader<'a> {
    kind: &'a str,
    options: &'a Options,
    used: BTreeSet<&'a str>,
}

impl<'a> OptionReader<'a> {
    pub fn new(kind: &'a str, options: &'a Options) -> Self {
        Self {
            kind,
            options,
            used: BTreeSet::new(),
        }
    }

    pub fn kind(&self) -> &'a str {
        self.kind
    }

    /// Raw value; `null` counts as absent.
    pub fn value(&mut self, name: &str) -> Option<&'a Value> {
        let options: &'a Options = self.options;
        let (key, value) = options.get_key_value(name)?;
        self.used.insert(key.as_str());
        (!value.is_null()).then_some(value)
    }

    pub fn bool(&mut self, name: &str) -> Result<Option<bool>, CoreError> {
        match self.value(name) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.wrong_type(name, "a boolean", other)),
        }
    }

    pub fn string(&mut self, name: &str) -> Result<Option<String>, CoreError> {
        match self.value(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.wrong_type(name, "a string", other)),
        }
    }

    pub fn number(&mut self, name: &str) -> Result<Option<f64>, CoreError> {
        match self.value(name) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(other) => Err(self.wrong_type(name, "a number", other)),
        }
    }

    pub fn count(&mut self, name: &str) -> Result<Option<usize>, CoreError> {
        match self.value(name) {
            None => Ok(None),
            Some(Value::Number(n)) => match n.as_u64() {
                Some(count) => Ok(Some(count as usize)),
                None => Err(CoreError::invalid_option(
                    self.kind,
                    name,
                    format!("expected a non-negative integer, got {n}"),
                )),
            },
            Some(other) => Err(self.wrong_type(name, "a non-negative integer", other)),
        }
    }

    pub fn array(&mut self, name: &str) -> Result<Option<&'a Vec<Value>>, CoreError> {
        match self.value(name) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(other) => Err(self.wrong_type(name, "an array", other)),
        }
    }

    /// Fails if any declared option was never read.
    pub fn finish(self) -> Result<(), CoreError> {
        match self
            .options
            .keys()
            .find(|key| !self.used.contains(key.as_str()))
        {
            Some(unknown) => Err(CoreError::invalid_option(
                self.kind,
                unknown,
                "unknown option",
            )),
            None => Ok(()),
        }
    }

    fn wrong_type(&self, name: &str, expected: &str, got: &Value) -> CoreError {
        CoreError::invalid_option(
            self.kind,
            name,
            format!("expected {expected}, got {}", json_type_name(got)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn options(value: Value) -> Options {
        match value {
            Value::Object(map) => map,
            _ => panic!("options must be an object"),
        }
    }

    #[test]
    fn reads_typed_values() {
        let opts = options(json!({"min": 3, "strict": true, "pattern": "^a", "range": [1]}));
        let mut reader = OptionReader::new("test", &opts);
        assert_eq!(reader.count("min").unwrap(), Some(3));
        assert_eq!(reader.bool("strict").unwrap(), Some(true));
        assert_eq!(reader.string("pattern").unwrap().as_deref(), Some("^a"));
        assert_eq!(reader.array("range").unwrap().map(Vec::len), Some(1));
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn null_counts_as_absent_but_known() {
        let opts = options(json!({"max": null}));
        let mut reader = OptionReader::new("test", &opts);
        assert_eq!(reader.number("max").unwrap(), None);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn wrong_type_is_rejected() {
        let opts = options(json!({"strict": "yes"}));
        let mut reader = OptionReader::new("in", &opts);
        let err = reader.bool("strict").unwrap_err();
        assert_matches!(err, CoreError::InvalidOption { ref option, .. } if option == "strict");
    }

    #[test]
    fn negative_count_is_rejected() {
        let opts = options(json!({"min": -1}));
        let mut reader = OptionReader::new("string", &opts);
        assert!(reader.count("min").is_err());
    }

    #[test]
    fn unread_option_is_unknown() {
        let opts = options(json!({"colour": "red"}));
        let reader = OptionReader::new("required", &opts);
        let err = reader.finish().unwrap_err();
        assert_matches!(
            err,
            CoreError::InvalidOption { ref kind, ref option, .. } if kind == "required" && option == "colour"
        );
    }
}
