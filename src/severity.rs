//! Severity classification.
//!
//! Two policies exist and a run uses exactly one of them. The rule impact
//! severity is a separate scale and does not depend on the chosen policy.

use crate::models_owasp::Vulnerability;
use crate::models_sonar::{ImpactSeverity, SonarSeverity};
use clap::ValueEnum;

/// CVSS score at or above which the threshold policy reports `CRITICAL`.
pub const CVSS_CRITICAL_THRESHOLD: f64 = 7.0;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeverityPolicy {
    /// Map the OWASP severity label through a fixed table
    #[default]
    Categorical,
    /// CRITICAL when the CVSS score is >= 7.0, MAJOR otherwise
    Cvss,
}

impl SeverityPolicy {
    pub fn classify(&self, vuln: &Vulnerability) -> SonarSeverity {
        match self {
            SeverityPolicy::Categorical => map_categorical(vuln.raw_severity()),
            SeverityPolicy::Cvss => map_score(vuln.score()),
        }
    }
}

/// Case-insensitive lookup; anything unrecognised is `MAJOR`.
pub fn map_categorical(severity: &str) -> SonarSeverity {
    match severity.to_uppercase().as_str() {
        "CRITICAL" => SonarSeverity::Blocker,
        "HIGH" => SonarSeverity::Critical,
        "MEDIUM" => SonarSeverity::Major,
        "LOW" => SonarSeverity::Minor,
        "INFO" => SonarSeverity::Info,
        _ => SonarSeverity::Major,
    }
}

pub fn map_score(score: Option<f64>) -> SonarSeverity {
    match score {
        Some(s) if s >= CVSS_CRITICAL_THRESHOLD => SonarSeverity::Critical,
        _ => SonarSeverity::Major,
    }
}

/// `HIGH` only when the raw label is exactly `HIGH`.
pub fn impact_severity(vuln: &Vulnerability) -> ImpactSeverity {
    if vuln.raw_severity() == "HIGH" {
        ImpactSeverity::High
    } else {
        ImpactSeverity::Medium
    }
}
