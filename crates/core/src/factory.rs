//! Registry mapping validator kinds to constructors.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::CoreError;
use crate::gate;
use crate::model::Model;
use crate::types::Options;
use crate::validators::options::OptionReader;
use crate::validators::{boolean, compare, format, number, pattern, range, required, string};
use crate::validators::Validator;

/// Everything a constructor gets to see.
pub struct ValidatorContext<'a> {
    /// The kind as declared, so aliases can be told apart.
    pub kind: &'a str,
    /// The model the rule is being built for (the live object, never a
    /// snapshot).
    pub model: &'a dyn Model,
    pub attributes: &'a [String],
    pub options: &'a Options,
    /// Lets composite validators resolve their own rules later.
    pub factory: &'a ValidatorFactory,
}

impl<'a> ValidatorContext<'a> {
    pub fn options(&self) -> OptionReader<'a> {
        OptionReader::new(self.kind, self.options)
    }
}

pub type Constructor =
    Arc<dyn Fn(&ValidatorContext<'_>) -> Result<Arc<dyn Validator>, CoreError> + Send + Sync>;

/// Built-in kinds and their constructors.
const BUILTINS: &[(&str, fn(&ValidatorContext<'_>) -> Result<Arc<dyn Validator>, CoreError>)] = &[
    ("required", required::build),
    ("in", range::build),
    ("range", range::build),
    ("number", number::build),
    ("numerical", number::build),
    ("double", number::build),
    ("integer", number::build),
    ("string", string::build),
    ("match", pattern::build),
    ("email", format::build_email),
    ("url", format::build_url),
    ("compare", compare::build),
    ("boolean", boolean::build),
    ("conditional", gate::build),
];

/// Cheap to clone; clones share constructors until one of them registers a
/// new kind.
#[derive(Clone)]
pub struct ValidatorFactory {
    constructors: Arc<HashMap<String, Constructor>>,
}

impl ValidatorFactory {
    /// A factory with no kinds at all.
    pub fn empty() -> Self {
        Self {
            constructors: Arc::new(HashMap::new()),
        }
    }

    /// A factory with every built-in kind registered.
    pub fn builtin() -> Self {
        let mut factory = Self::empty();
        for (kind, build) in BUILTINS {
            factory.register(kind, *build);
        }
        factory
    }

    /// Add a kind, replacing any existing constructor for it.
    pub fn register<F>(&mut self, kind: &str, constructor: F)
    where
        F: Fn(&ValidatorContext<'_>) -> Result<Arc<dyn Validator>, CoreError>
            + Send
            + Sync
            + 'static,
    {
        Arc::make_mut(&mut self.constructors).insert(kind.to_string(), Arc::new(constructor));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Build a validator of `kind` for `attributes` in the context of `model`.
    pub fn create(
        &self,
        kind: &str,
        model: &dyn Model,
        attributes: &[String],
        options: &Options,
    ) -> Result<Arc<dyn Validator>, CoreError> {
        let constructor = self
            .constructors
            .get(kind)
            .ok_or_else(|| CoreError::UnknownValidator {
                kind: kind.to_string(),
            })?;
        tracing::trace!(kind, ?attributes, "Building validator");
        constructor(&ValidatorContext {
            kind,
            model,
            attributes,
            options,
            factory: self,
        })
    }
}

impl Default for ValidatorFactory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for ValidatorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorFactory")
            .field("kinds", &self.kinds())
            .finish()
    }
}
