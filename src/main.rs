//! Main binary entry point for dependency-check-sonar.

use clap::Parser;
use colored::Colorize;
use dependency_check_sonar::errors::ConverterError;
use dependency_check_sonar::location::LocationMode;
use dependency_check_sonar::schema::DependenciesPolicy;
use dependency_check_sonar::severity::SeverityPolicy;
use dependency_check_sonar::{Config, DEFAULT_ASSOCIATED_FILE, DEFAULT_INPUT, DEFAULT_OUTPUT};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Dependency-Check JSON report to read
    #[arg(value_name = "INPUT", requires = "output", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Sonar generic issue report to write
    #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    #[arg(
        long,
        value_name = "FILE",
        default_value = DEFAULT_ASSOCIATED_FILE,
        help = "File whose first line sizes the placeholder column range (--location clamped-column)"
    )]
    associated_file: PathBuf,

    #[arg(long, help = "Emit a deduplicated `rules` section")]
    rules: bool,

    #[arg(long, value_enum, default_value_t = SeverityPolicy::Categorical)]
    severity_policy: SeverityPolicy,

    #[arg(long, value_enum, default_value_t = DependenciesPolicy::Permissive)]
    missing_dependencies: DependenciesPolicy,

    #[arg(long, value_enum, default_value_t = LocationMode::None)]
    location: LocationMode,

    #[arg(long, help = "Validate field types against the bundled report schema")]
    validate_schema: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let filter_level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter(None, filter_level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run_app(cli: Cli) -> Result<(), ConverterError> {
    let config = Config {
        input_file: cli.input,
        output_file: cli.output,
        associated_file: Some(cli.associated_file),
        emit_rules: cli.rules,
        severity_policy: cli.severity_policy,
        dependencies_policy: cli.missing_dependencies,
        location: cli.location,
        validate_schema: cli.validate_schema,
    };

    let summary = dependency_check_sonar::run(&config)?;
    println!(
        "{} {} -> {}",
        "✓".green().bold(),
        summary,
        config.output_file.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    // Usage errors exit with 1 like every other failure; help/version with 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    setup_logging(cli.verbose);

    match run_app(cli) {
        Ok(_) => {
            log::info!("Conversion completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("A fatal error occurred:");
            log::error!("{}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(s) = source {
                log::error!("  Caused by: {}", s);
                source = std::error::Error::source(s);
            }
            ExitCode::FAILURE
        }
    }
}
