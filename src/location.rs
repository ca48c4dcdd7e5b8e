//! Text range resolution for emitted issues.
//!
//! Dependency-Check reports carry no line information, so the built-in
//! strategies only produce placeholder anchors on line 1. The
//! [`LocationResolver`] trait lets callers plug in something smarter.

use crate::errors::ConverterError;
use crate::models_owasp::Dependency;
use crate::models_sonar::TextRange;
use clap::ValueEnum;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Widest column the clamped anchor will report.
pub const MAX_END_COLUMN: u32 = 80;
const ANCHOR_LINE: u32 = 1;
const ANCHOR_START_COLUMN: u32 = 1;

/// Resolves where in the project an issue for `dependency` is reported.
pub trait LocationResolver {
    fn resolve(&self, dependency: &Dependency) -> Option<TextRange>;
}

/// Which built-in strategy to use.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LocationMode {
    /// Emit no textRange
    #[default]
    None,
    /// Anchor on line 1 without columns
    Line,
    /// Anchor on line 1, end column clamped to the associated file's first line
    ClampedColumn,
}

/// Emits no text range at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTextRange;

impl LocationResolver for NoTextRange {
    fn resolve(&self, _dependency: &Dependency) -> Option<TextRange> {
        None
    }
}

/// `{startLine: 1, endLine: 1}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineAnchor;

impl LocationResolver for LineAnchor {
    fn resolve(&self, _dependency: &Dependency) -> Option<TextRange> {
        Some(TextRange {
            start_line: ANCHOR_LINE,
            end_line: ANCHOR_LINE,
            start_column: None,
            end_column: None,
        })
    }
}

/// Line 1, columns `1..end_column` where `end_column` comes from the first
/// line of an associated file (usually the build manifest).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnAnchor {
    end_column: u32,
}

impl ColumnAnchor {
    /// Builds the anchor from the first line of `path`.
    pub fn from_file(path: &Path) -> Result<Self, ConverterError> {
        info!("Reading associated file {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| ConverterError::from_read(e, path))?;
        let anchor = Self::from_first_line(content.lines().next().unwrap_or_default());
        debug!("Clamped end column: {}", anchor.end_column);
        Ok(anchor)
    }

    /// `min(80, trimmed length)`, never below `startColumn + 1`.
    pub fn from_first_line(line: &str) -> Self {
        let width = u32::try_from(line.trim_end().chars().count()).unwrap_or(MAX_END_COLUMN);
        Self {
            end_column: width.min(MAX_END_COLUMN).max(ANCHOR_START_COLUMN + 1),
        }
    }

    pub fn end_column(&self) -> u32 {
        self.end_column
    }
}

impl LocationResolver for ColumnAnchor {
    fn resolve(&self, _dependency: &Dependency) -> Option<TextRange> {
        Some(TextRange {
            start_line: ANCHOR_LINE,
            end_line: ANCHOR_LINE,
            start_column: Some(ANCHOR_START_COLUMN),
            end_column: Some(self.end_column),
        })
    }
}

/// Instantiates the strategy selected by `mode`.
///
/// `ClampedColumn` needs `associated_file`; the other modes never touch it.
pub fn build_resolver(
    mode: LocationMode,
    associated_file: Option<&Path>,
) -> Result<Box<dyn LocationResolver>, ConverterError> {
    match mode {
        LocationMode::None => Ok(Box::new(NoTextRange)),
        LocationMode::Line => Ok(Box::new(LineAnchor)),
        LocationMode::ClampedColumn => {
            let path = associated_file.ok_or_else(|| {
                ConverterError::Config(
                    "clamped-column location requires an associated file".to_string(),
                )
            })?;
            Ok(Box::new(ColumnAnchor::from_file(path)?))
        }
    }
}
