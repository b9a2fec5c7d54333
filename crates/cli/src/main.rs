//! `ifthen-check` -- validate a JSON record against a JSON rule set.
//!
//! Prints the resulting error bag as JSON on stdout.
//!
//! # Environment variables
//!
//! | Variable        | Required          | Default | Description                         |
//! |-----------------|-------------------|---------|-------------------------------------|
//! | `IFTHEN_RULES`  | yes (or 1st arg)  | --      | Path to the rule set (JSON array)   |
//! | `IFTHEN_RECORD` | yes (or 2nd arg)  | --      | Path to the record (JSON object)    |
//! | `RUST_LOG`      | no                | `ifthen_cli=info,ifthen_core=info` | Log filter |
//!
//! # Exit codes
//!
//! `0` valid, `1` the record has validation errors, `2` configuration or I/O
//! failure.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use ifthen_core::{Model, Record, RuleSet};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Resolve a path from the positional argument or, failing that, the env var.
fn input_path(arg: Option<String>, var: &str) -> anyhow::Result<PathBuf> {
    arg.or_else(|| std::env::var(var).ok())
        .map(PathBuf::from)
        .with_context(|| format!("{var} environment variable (or positional argument) is required"))
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Returns whether the record is valid.
fn run() -> anyhow::Result<bool> {
    let mut args = std::env::args().skip(1);
    let rules_path = input_path(args.next(), "IFTHEN_RULES")?;
    let record_path = input_path(args.next(), "IFTHEN_RECORD")?;

    let rules = RuleSet::from_value(&read_json(&rules_path)?)
        .with_context(|| format!("Invalid rule set in {}", rules_path.display()))?;
    let mut record = Record::from_value(read_json(&record_path)?)
        .with_context(|| format!("Invalid record in {}", record_path.display()))?;

    tracing::info!(
        rules = rules.len(),
        attributes = record.active_attributes().len(),
        "Validating {}",
        record_path.display()
    );

    let valid = rules.validate(&mut record)?;
    println!("{}", serde_json::to_string_pretty(record.errors())?);

    if valid {
        tracing::info!("Record is valid");
    } else {
        tracing::warn!(errors = record.errors().len(), "Record has validation errors");
    }
    Ok(valid)
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ifthen_cli=info,ifthen_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
