//! Main library for the Dependency-Check to SonarQube converter.
//!
//! This crate reads an OWASP Dependency-Check JSON report and produces a
//! SonarQube generic issue import document from it.

pub mod errors;
pub mod location;
pub mod models_owasp;
pub mod models_sonar;
pub mod report_io;
pub mod schema;
pub mod severity;
pub mod transform;

use errors::ConverterError;
use location::LocationMode;
use log::info;
use report_io::ReadOptions;
use schema::DependenciesPolicy;
use severity::SeverityPolicy;
use std::path::PathBuf;
use std::time::Instant;
use transform::{ConversionSummary, TransformOptions};

pub const DEFAULT_INPUT: &str = "target/dependency-check-report/dependency-check-report.json";
pub const DEFAULT_OUTPUT: &str = "sonar-issues.json";
pub const DEFAULT_ASSOCIATED_FILE: &str = "pom.xml";

/// Top-level configuration for a conversion run.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    /// Only read when `location` is [`LocationMode::ClampedColumn`].
    pub associated_file: Option<PathBuf>,
    pub emit_rules: bool,
    pub severity_policy: SeverityPolicy,
    pub dependencies_policy: DependenciesPolicy,
    pub location: LocationMode,
    pub validate_schema: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from(DEFAULT_INPUT),
            output_file: PathBuf::from(DEFAULT_OUTPUT),
            associated_file: Some(PathBuf::from(DEFAULT_ASSOCIATED_FILE)),
            emit_rules: false,
            severity_policy: SeverityPolicy::default(),
            dependencies_policy: DependenciesPolicy::default(),
            location: LocationMode::default(),
            validate_schema: false,
        }
    }
}

/// The main entry point for the conversion logic.
///
/// Everything is read and mapped before the output path is touched, so a
/// failure at any step leaves the destination as it was.
pub fn run(config: &Config) -> Result<ConversionSummary, ConverterError> {
    let start_time = Instant::now();
    info!("Starting conversion");
    info!("  Input: {}", config.input_file.display());
    info!("  Output: {}", config.output_file.display());

    let report = report_io::read_report(
        &config.input_file,
        ReadOptions {
            dependencies_policy: config.dependencies_policy,
            validate_schema: config.validate_schema,
        },
    )?;

    let resolver = location::build_resolver(config.location, config.associated_file.as_deref())?;

    let options = TransformOptions {
        emit_rules: config.emit_rules,
        severity_policy: config.severity_policy,
    };
    let (sonar, summary) = transform::convert(&report, &options, resolver.as_ref());

    report_io::write_report(&config.output_file, &sonar)?;

    info!("Total execution time: {:.2?}", start_time.elapsed());
    Ok(summary)
}
