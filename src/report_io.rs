//! Reading the Dependency-Check report and persisting the Sonar report.

use crate::errors::ConverterError;
use crate::models_owasp::DependencyReport;
use crate::models_sonar::SonarReport;
use crate::schema::{self, DependenciesPolicy};
use log::info;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Options that govern how strictly the input is checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    pub dependencies_policy: DependenciesPolicy,
    pub validate_schema: bool,
}

/// Reads and parses the report at `path`.
///
/// Missing file -> `FileNotFound`, malformed JSON -> `InvalidInput`,
/// structural problems -> `Schema`.
pub fn read_report(path: &Path, options: ReadOptions) -> Result<DependencyReport, ConverterError> {
    info!("Reading report {}", path.display());
    let content = fs::read_to_string(path).map_err(|e| ConverterError::from_read(e, path))?;
    parse_report(&content, options).map_err(|e| match e {
        ConverterError::InvalidInput(msg) => {
            ConverterError::InvalidInput(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Parses report text already in memory.
pub fn parse_report(
    content: &str,
    options: ReadOptions,
) -> Result<DependencyReport, ConverterError> {
    let instance: Value =
        serde_json::from_str(content).map_err(|e| ConverterError::InvalidInput(e.to_string()))?;

    if !instance.is_object() {
        return Err(ConverterError::Schema(
            "report must be a JSON object".to_string(),
        ));
    }

    schema::check_dependencies_field(&instance, options.dependencies_policy)?;
    if options.validate_schema {
        schema::validate_report_schema(&instance)?;
    }

    serde_json::from_value(instance).map_err(|e| ConverterError::Schema(e.to_string()))
}

/// Serializes the whole report in memory, then writes it to a temporary
/// file next to `path` and renames it into place.
///
/// The staged file is created owner-only, so it takes over the mode of an
/// existing destination (or `0644` for a new one) before the rename.
pub fn write_report(path: &Path, report: &SonarReport) -> Result<(), ConverterError> {
    let mut bytes = serde_json::to_vec_pretty(report)
        .map_err(|e| ConverterError::Serialization(e.to_string()))?;
    bytes.push(b'\n');

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let write_err = |e: std::io::Error| ConverterError::Write(e, path.to_path_buf());
    let mut staged = NamedTempFile::new_in(dir).map_err(write_err)?;
    staged.write_all(&bytes).map_err(write_err)?;
    if let Some(permissions) = output_permissions(path) {
        staged.as_file().set_permissions(permissions).map_err(write_err)?;
    }
    staged.as_file().sync_all().map_err(write_err)?;
    staged.persist(path).map_err(|e| write_err(e.error))?;

    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Mode the written report should end up with.
fn output_permissions(path: &Path) -> Option<fs::Permissions> {
    if let Ok(meta) = fs::metadata(path) {
        return Some(meta.permissions());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(fs::Permissions::from_mode(NEW_REPORT_MODE))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

#[cfg(unix)]
const NEW_REPORT_MODE: u32 = 0o644;
