//! Per-attribute validation messages owned by a model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from attribute name to the messages recorded against it, in the
/// order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorBag {
    errors: BTreeMap<String, Vec<String>>,
}

impl ErrorBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to an attribute's list.
    pub fn add(&mut self, attribute: &str, message: impl Into<String>) {
        self.errors
            .entry(attribute.to_string())
            .or_default()
            .push(message.into());
    }

    /// Messages recorded for `attribute`, empty if none.
    pub fn get(&self, attribute: &str) -> &[String] {
        self.errors.get(attribute).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, attribute: &str) -> Option<&str> {
        self.get(attribute).first().map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_error(&self, attribute: &str) -> bool {
        self.errors.contains_key(attribute)
    }

    /// Total number of messages across all attributes.
    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(attr, messages)| (attr.as_str(), messages.as_slice()))
    }
}
