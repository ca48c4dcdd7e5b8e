//! The Dependency-Check -> Sonar mapping.
//!
//! A single in-memory pass: dependencies in input order, then each
//! dependency's vulnerabilities in input order, one issue per
//! vulnerability. Rules are deduplicated by id, first sighting wins.

use crate::location::LocationResolver;
use crate::models_owasp::DependencyReport;
use crate::models_sonar::{
    CLEAN_CODE_ATTRIBUTE, ENGINE_ID, ISSUE_TYPE, Impact, Issue, PrimaryLocation, Rule,
    SOFTWARE_QUALITY, SonarReport,
};
use crate::severity::{self, SeverityPolicy};
use log::{debug, info};
use std::collections::HashSet;
use std::fmt;

/// Settings for one conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformOptions {
    pub emit_rules: bool,
    pub severity_policy: SeverityPolicy,
}

/// Counts reported after a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub dependencies: usize,
    pub vulnerabilities: usize,
    pub issues: usize,
    pub rules: usize,
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Converted {} vulnerabilities from {} dependencies into {} issues ({} rules)",
            self.vulnerabilities, self.dependencies, self.issues, self.rules
        )
    }
}

/// Maps `report` to a Sonar import document.
pub fn convert(
    report: &DependencyReport,
    options: &TransformOptions,
    locations: &dyn LocationResolver,
) -> (SonarReport, ConversionSummary) {
    let dependencies = report.dependencies.as_deref().unwrap_or_default();
    info!(
        "Mapping {} dependencies (policy: {:?}, rules: {})",
        dependencies.len(),
        options.severity_policy,
        options.emit_rules
    );

    let mut issues = Vec::new();
    let mut rules = Vec::new();
    let mut seen_rules: HashSet<String> = HashSet::new();
    let mut summary = ConversionSummary {
        dependencies: dependencies.len(),
        ..Default::default()
    };

    for dependency in dependencies {
        let file_path = dependency.file_name_or_default();
        let text_range = locations.resolve(dependency);

        for vuln in dependency.vulnerabilities() {
            summary.vulnerabilities += 1;
            let rule_id = vuln.rule_id();
            let message = vuln.message();
            let severity = options.severity_policy.classify(vuln);
            debug!("{} in {} -> {:?}", rule_id, file_path, severity);

            if options.emit_rules && seen_rules.insert(rule_id.to_string()) {
                rules.push(Rule {
                    id: rule_id.to_string(),
                    name: rule_id.to_string(),
                    description: message.clone(),
                    engine_id: ENGINE_ID,
                    clean_code_attribute: CLEAN_CODE_ATTRIBUTE,
                    impacts: vec![Impact {
                        software_quality: SOFTWARE_QUALITY,
                        severity: severity::impact_severity(vuln),
                    }],
                });
            }

            issues.push(Issue {
                engine_id: ENGINE_ID,
                rule_id: rule_id.to_string(),
                issue_type: ISSUE_TYPE,
                severity,
                primary_location: PrimaryLocation {
                    message,
                    file_path: file_path.to_string(),
                    text_range,
                },
            });
        }
    }

    summary.issues = issues.len();
    summary.rules = rules.len();

    let sonar = SonarReport {
        rules: options.emit_rules.then_some(rules),
        issues,
    };
    (sonar, summary)
}
