//! Integration tests for dependency-check-sonar.
//!
//! These tests create report files on the fly and run the full binary
//! against them.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

// --- Helper Functions ---

fn get_cmd() -> Command {
    Command::cargo_bin("dependency-check-sonar").unwrap()
}

fn write_json(path: &Path, value: &Value) {
    let mut file = File::create(path).unwrap();
    writeln!(file, "{}", value).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

/// A small report in the shape Dependency-Check actually emits.
fn get_test_report() -> Value {
    json!({
        "reportSchema": "1.1",
        "scanInfo": {"engineVersion": "9.0.9"},
        "projectInfo": {"name": "demo"},
        "dependencies": [
            {
                "isVirtual": false,
                "fileName": "log4j-core-2.14.1.jar",
                "filePath": "/home/build/.m2/log4j-core-2.14.1.jar",
                "vulnerabilities": [
                    {
                        "source": "NVD",
                        "name": "CVE-2021-44228",
                        "severity": "CRITICAL",
                        "cvssv3": {"baseScore": 10.0},
                        "description": "JNDI lookup"
                    },
                    {
                        "source": "NVD",
                        "name": "CVE-2021-45046",
                        "severity": "high",
                        "cvssv3": {"baseScore": 9.0},
                        "description": {"description": "Incomplete fix"}
                    }
                ]
            },
            {"fileName": "commons-lang3-3.12.0.jar"},
            {
                "fileName": "snakeyaml-1.30.jar",
                "vulnerabilities": [
                    {
                        "name": "CVE-2022-1471",
                        "severity": "HIGH",
                        "cvssScore": 8.3,
                        "description": "Constructor deserialization"
                    },
                    {
                        "name": "CVE-2021-44228",
                        "severity": "LOW",
                        "description": "duplicate id"
                    }
                ]
            }
        ]
    })
}

// --- Test Cases ---

#[test]
fn test_end_to_end_example() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.json");
    let output = dir.path().join("sonar.json");

    write_json(
        &input,
        &json!({"dependencies":[{"fileName":"lib.jar","vulnerabilities":[{"name":"CVE-2021-1","description":"desc","severity":"HIGH"}]}]}),
    );

    get_cmd().arg(&input).arg(&output).assert().success();

    assert_eq!(
        read_json(&output),
        json!({"issues":[{"engineId":"owasp-dependency-check","ruleId":"CVE-2021-1","type":"VULNERABILITY","severity":"CRITICAL","primaryLocation":{"message":"desc","filePath":"lib.jar"}}]})
    );
}

#[test]
fn test_issue_keys_keep_insertion_order() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.json");
    let output = dir.path().join("sonar.json");
    write_json(&input, &get_test_report());

    get_cmd().arg(&input).arg(&output).assert().success();

    let text = fs::read_to_string(&output).unwrap();
    let keys = ["\"engineId\"", "\"ruleId\"", "\"type\"", "\"severity\"", "\"primaryLocation\""];
    let positions: Vec<usize> = keys.iter().map(|k| text.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);
}

#[test]
fn test_full_report_categorical() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.json");
    let output = dir.path().join("sonar.json");
    write_json(&input, &get_test_report());

    get_cmd()
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Converted 4 vulnerabilities from 3 dependencies into 4 issues (0 rules)",
        ));

    let result = read_json(&output);
    assert!(result.get("rules").is_none());
    let issues = result["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 4);

    let summary: Vec<(&str, &str, &str)> = issues
        .iter()
        .map(|i| {
            (
                i["ruleId"].as_str().unwrap(),
                i["severity"].as_str().unwrap(),
                i["primaryLocation"]["filePath"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("CVE-2021-44228", "BLOCKER", "log4j-core-2.14.1.jar"),
            ("CVE-2021-45046", "CRITICAL", "log4j-core-2.14.1.jar"),
            ("CVE-2022-1471", "CRITICAL", "snakeyaml-1.30.jar"),
            ("CVE-2021-44228", "MINOR", "snakeyaml-1.30.jar"),
        ]
    );
    assert_eq!(issues[1]["primaryLocation"]["message"], json!("Incomplete fix"));
}

#[test]
fn test_rules_section_and_cvss_policy() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.json");
    let output = dir.path().join("sonar.json");
    write_json(&input, &get_test_report());

    get_cmd()
        .arg(&input)
        .arg(&output)
        .args(["--rules", "--severity-policy", "cvss"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(3 rules)"));

    let result = read_json(&output);
    let rules = result["rules"].as_array().unwrap();
    let ids: Vec<&str> = rules.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["CVE-2021-44228", "CVE-2021-45046", "CVE-2022-1471"]);

    assert_eq!(
        rules[0],
        json!({
            "id": "CVE-2021-44228",
            "name": "CVE-2021-44228",
            "description": "JNDI lookup",
            "engineId": "owasp-dependency-check",
            "cleanCodeAttribute": "TRUSTWORTHY",
            "impacts": [{"softwareQuality": "SECURITY", "severity": "MEDIUM"}]
        })
    );
    assert_eq!(rules[2]["impacts"][0]["severity"], json!("HIGH"));

    let severities: Vec<&str> = result["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["severity"].as_str().unwrap())
        .collect();
    assert_eq!(severities, vec!["CRITICAL", "CRITICAL", "CRITICAL", "MAJOR"]);
}

#[test]
fn test_clamped_column_location() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.json");
    let output = dir.path().join("sonar.json");
    let pom = dir.path().join("pom.xml");
    write_json(&input, &get_test_report());
    fs::write(&pom, format!("{}   \n<project/>\n", "a".repeat(100))).unwrap();

    get_cmd()
        .arg(&input)
        .arg(&output)
        .args(["--location", "clamped-column", "--associated-file"])
        .arg(&pom)
        .assert()
        .success();

    let result = read_json(&output);
    for issue in result["issues"].as_array().unwrap() {
        assert_eq!(
            issue["primaryLocation"]["textRange"],
            json!({"startLine": 1, "endLine": 1, "startColumn": 1, "endColumn": 80})
        );
    }
}

#[test]
fn test_missing_associated_file_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.json");
    let output = dir.path().join("sonar.json");
    write_json(&input, &get_test_report());

    get_cmd()
        .arg(&input)
        .arg(&output)
        .args(["--location", "clamped-column", "--associated-file"])
        .arg(dir.path().join("pom.xml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found"));

    assert!(!output.exists());
}

#[test]
fn test_missing_input_leaves_output_untouched() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("sonar.json");
    fs::write(&output, "previous").unwrap();

    get_cmd()
        .arg(dir.path().join("absent.json"))
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absent.json"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
}

#[test]
fn test_malformed_json_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.json");
    let output = dir.path().join("sonar.json");
    fs::write(&input, "{\"dependencies\": [").unwrap();

    get_cmd()
        .arg(&input)
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid Input"));

    assert!(!output.exists());
}

#[test]
fn test_missing_dependencies_policies() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.json");
    let output = dir.path().join("sonar.json");
    write_json(&input, &json!({"scanInfo": {}}));

    get_cmd().arg(&input).arg(&output).assert().success();
    assert_eq!(read_json(&output), json!({"issues": []}));

    let strict_output = dir.path().join("strict.json");
    get_cmd()
        .arg(&input)
        .arg(&strict_output)
        .args(["--missing-dependencies", "strict"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Schema Error"));
    assert!(!strict_output.exists());
}

#[test]
fn test_validate_schema_rejects_wrong_types() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.json");
    let output = dir.path().join("sonar.json");
    write_json(
        &input,
        &json!({"dependencies": [{"fileName": 42, "vulnerabilities": []}]}),
    );

    get_cmd()
        .arg(&input)
        .arg(&output)
        .arg("--validate-schema")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Schema Error"));
}

#[test]
fn test_unwritable_output_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.json");
    write_json(&input, &get_test_report());

    get_cmd()
        .arg(&input)
        .arg(dir.path().join("no-such-dir").join("sonar.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Write Error"));
}

#[test]
fn test_wrong_argument_count_is_usage_error() {
    get_cmd()
        .arg("only-one.json")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));

    get_cmd()
        .args(["a.json", "b.json", "c.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_fixed_path_defaults() {
    let dir = tempdir().unwrap();
    let report_dir = dir.path().join("target").join("dependency-check-report");
    fs::create_dir_all(&report_dir).unwrap();
    write_json(
        &report_dir.join("dependency-check-report.json"),
        &json!({"dependencies": [{"fileName": "lib.jar", "vulnerabilities": [{"name": "CVE-1"}]}]}),
    );

    get_cmd()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("sonar-issues.json"));

    let result = read_json(&dir.path().join("sonar-issues.json"));
    assert_eq!(result["issues"][0]["severity"], json!("MAJOR"));
}

#[test]
fn test_reruns_are_byte_identical() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("report.json");
    let output = dir.path().join("sonar.json");
    write_json(&input, &get_test_report());

    get_cmd().arg(&input).arg(&output).arg("--rules").assert().success();
    let first = fs::read(&output).unwrap();
    get_cmd().arg(&input).arg(&output).arg("--rules").assert().success();
    assert_eq!(first, fs::read(&output).unwrap());
}
