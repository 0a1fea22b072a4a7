//! CLI surface tests: argument parsing and fatal-configuration exits.
//!
//! These never reach AWS: configuration validation runs before any network
//! call, so the failure paths are testable offline.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("org-compute-inventory").expect("binary builds")
}

#[test]
fn help_describes_the_tool() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AWS Organization"))
        .stdout(predicate::str::contains("--role-name"));
}

#[test]
fn role_arn_template_without_placeholder_is_fatal() {
    cmd()
        .arg("--role-arn-template")
        .arg("arn:aws:iam::123456789012:role/Fixed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("{account_id}"));
}

#[test]
fn zero_region_pool_width_is_fatal() {
    cmd()
        .arg("--max-concurrent-regions")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn non_numeric_timeout_is_rejected_by_clap() {
    cmd()
        .arg("--call-timeout-secs")
        .arg("soon")
        .assert()
        .failure();
}

#[test]
fn pretty_requires_json() {
    cmd().arg("--pretty").assert().failure();
}
