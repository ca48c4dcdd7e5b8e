//! Contains *minimal* data structures for an OWASP Dependency-Check JSON report.
//!
//! We only define the fields we actually need for the conversion,
//! allowing `serde` to skip all other fields (scan info, evidence, ...).

use serde::Deserialize;
use serde_json::Value;

pub const UNKNOWN_FILE: &str = "unknown_file";
pub const UNKNOWN_RULE: &str = "Unknown-CVE";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const DEFAULT_SEVERITY: &str = "MEDIUM";

/// Top-level report structure (minimal).
///
/// `dependencies` stays an `Option` so the missing-field policy can be
/// applied after parsing.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DependencyReport {
    #[serde(default)]
    pub dependencies: Option<Vec<Dependency>>,
}

/// A scanned dependency and the vulnerabilities reported against it.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub vulnerabilities: Option<Vec<Vulnerability>>,
}

impl Dependency {
    pub fn file_name_or_default(&self) -> &str {
        self.file_name.as_deref().unwrap_or(UNKNOWN_FILE)
    }

    pub fn vulnerabilities(&self) -> &[Vulnerability] {
        self.vulnerabilities.as_deref().unwrap_or_default()
    }
}

/// A single vulnerability record.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub cvss_score: Option<f64>,
    #[serde(default)]
    pub cvssv3: Option<CvssV3>,
    #[serde(default)]
    pub cvssv2: Option<CvssV2>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CvssV3 {
    #[serde(default)]
    pub base_score: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct CvssV2 {
    #[serde(default)]
    pub score: Option<f64>,
}

/// The `description` field comes either as plain text or wrapped in an
/// object that carries its own `description`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Nested { description: Option<String> },
    Other(Value),
}

impl Description {
    /// Unwraps at most one level of nesting.
    pub fn text(&self) -> Option<String> {
        match self {
            Description::Text(s) => Some(s.clone()),
            Description::Nested { description } => description.clone(),
            Description::Other(Value::Null) => None,
            Description::Other(v) => Some(v.to_string()),
        }
    }
}

impl Vulnerability {
    pub fn rule_id(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_RULE)
    }

    pub fn message(&self) -> String {
        self.description
            .as_ref()
            .and_then(Description::text)
            .unwrap_or_else(|| NO_DESCRIPTION.to_string())
    }

    /// The severity as written in the report, `MEDIUM` when absent.
    pub fn raw_severity(&self) -> &str {
        self.severity.as_deref().unwrap_or(DEFAULT_SEVERITY)
    }

    /// First score found among `cvssScore`, `cvssv3.baseScore` and `cvssv2.score`.
    pub fn score(&self) -> Option<f64> {
        self.cvss_score
            .or_else(|| self.cvssv3.as_ref().and_then(|c| c.base_score))
            .or_else(|| self.cvssv2.as_ref().and_then(|c| c.score))
    }
}
