//! Data structures for the SonarQube generic issue import format.
//!
//! Field declaration order is the serialization order, so the output is
//! byte-stable across runs.

use serde::Serialize;

pub const ENGINE_ID: &str = "owasp-dependency-check";
pub const ISSUE_TYPE: &str = "VULNERABILITY";
pub const CLEAN_CODE_ATTRIBUTE: &str = "TRUSTWORTHY";
pub const SOFTWARE_QUALITY: &str = "SECURITY";

/// Top-level import document.
#[derive(Serialize, Debug, Default, PartialEq)]
pub struct SonarReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Rule>>,
    pub issues: Vec<Issue>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub engine_id: &'static str,
    pub rule_id: String,
    #[serde(rename = "type")]
    pub issue_type: &'static str,
    pub severity: SonarSeverity,
    pub primary_location: PrimaryLocation,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryLocation {
    pub message: String,
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_range: Option<TextRange>,
}

/// 1-based line/column range.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    pub start_line: u32,
    pub end_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub engine_id: &'static str,
    pub clean_code_attribute: &'static str,
    pub impacts: Vec<Impact>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Impact {
    pub software_quality: &'static str,
    pub severity: ImpactSeverity,
}

/// Issue-level severity scale.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SonarSeverity {
    Blocker,
    Critical,
    Major,
    Minor,
    Info,
}

/// Rule impact scale. Not interchangeable with [`SonarSeverity`].
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImpactSeverity {
    High,
    Medium,
}
