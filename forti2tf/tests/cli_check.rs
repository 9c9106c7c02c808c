use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn check_lists_policies_and_addresses() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("forti2tf"));
    cmd.arg("check")
        .arg(fixture("fixtures/policies.conf"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "- policy 10 -> fortios_firewall_policy.allow-web name=\"Allow-Web\"",
        ))
        .stdout(predicate::str::contains("converted=3"));
}

#[test]
fn check_fails_on_record_errors() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("forti2tf"));
    cmd.arg("check")
        .arg(fixture("fixtures/missing_field.conf"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing required field `dstaddr`"))
        .stderr(predicate::str::contains("check failed"));
}

#[test]
fn check_json_reports_findings() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("forti2tf"));
    let output = cmd
        .arg("check")
        .arg(fixture("fixtures/missing_field.conf"))
        .arg("--format")
        .arg("json")
        .output()
        .expect("run check");
    assert!(!output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(report["summary"]["converted"], 1);
    assert_eq!(report["summary"]["failed"], 1);
    assert_eq!(report["findings"][0]["code"], "field_missing");
    assert_eq!(report["findings"][0]["policy"]["id"], 2);
    assert_eq!(report["policies"][0]["identifier"], "allow-dns");
}

#[test]
fn check_reports_structural_errors() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("forti2tf"));
    cmd.arg("check")
        .arg(fixture("fixtures/unterminated.conf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 10"));
}
