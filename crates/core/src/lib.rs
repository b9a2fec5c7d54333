//! `ifthen-core` -- conditional validation rules.
//!
//! A [`ConditionalGate`] runs a list of "if" validators against a snapshot of
//! a model and, only when the snapshot stays error-free, runs a list of
//! "then" validators against the model itself. Validators are built from
//! declarative [`RuleSpec`]s by a [`ValidatorFactory`].

pub mod config;
pub mod error;
pub mod error_bag;
pub mod factory;
pub mod gate;
pub mod model;
pub mod rule_set;
pub mod rules;
pub mod types;
pub mod validators;

pub use config::GateConfig;
pub use error::CoreError;
pub use error_bag::ErrorBag;
pub use factory::{ValidatorContext, ValidatorFactory};
pub use gate::{ConditionalGate, GateOutcome};
pub use model::{Model, Record};
pub use rule_set::RuleSet;
pub use rules::{RuleDeclaration, RuleSpec};
pub use validators::Validator;
