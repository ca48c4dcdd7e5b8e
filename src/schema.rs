//! Structural checks on the parsed input report.
//!
//! Full type validation uses the `jsonschema` crate against a bundled
//! schema that covers only the fields the converter reads. The presence
//! check for `dependencies` is governed by [`DependenciesPolicy`].

use crate::errors::ConverterError;
use clap::ValueEnum;
use log::{info, warn};
use serde_json::Value;

const REPORT_SCHEMA: &str = include_str!("../schemas/dependency-check-report.schema.json");

/// Number of schema violations quoted in the error message.
const MAX_REPORTED_VIOLATIONS: usize = 5;

/// What to do when the report has no `dependencies` field.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DependenciesPolicy {
    /// Treat a missing field as an empty list
    #[default]
    Permissive,
    /// Reject the report
    Strict,
}

/// Applies the missing-field policy. `null` counts as missing.
pub fn check_dependencies_field(
    instance: &Value,
    policy: DependenciesPolicy,
) -> Result<(), ConverterError> {
    let present = instance
        .get("dependencies")
        .is_some_and(|deps| !deps.is_null());
    if present {
        return Ok(());
    }

    match policy {
        DependenciesPolicy::Strict => Err(ConverterError::Schema(
            "report has no `dependencies` field".to_string(),
        )),
        DependenciesPolicy::Permissive => {
            warn!("Report has no `dependencies` field; treating it as empty.");
            Ok(())
        }
    }
}

/// Validates `instance` against the bundled report schema.
pub fn validate_report_schema(instance: &Value) -> Result<(), ConverterError> {
    info!("Loading schema...");
    let schema_json: Value = serde_json::from_str(REPORT_SCHEMA)
        .map_err(|e| ConverterError::SchemaLoad(e.to_string()))?;
    let validator = jsonschema::validator_for(&schema_json)
        .map_err(|e| ConverterError::SchemaLoad(e.to_string()))?;

    info!("Validating report against schema...");
    let violations: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| e.to_string())
        .collect();

    if violations.is_empty() {
        info!("Validation successful!");
        return Ok(());
    }

    let mut message = violations
        .iter()
        .take(MAX_REPORTED_VIOLATIONS)
        .cloned()
        .collect::<Vec<_>>()
        .join("; ");
    if violations.len() > MAX_REPORTED_VIOLATIONS {
        message.push_str(&format!(
            " (and {} more)",
            violations.len() - MAX_REPORTED_VIOLATIONS
        ));
    }
    Err(ConverterError::Schema(message))
}
