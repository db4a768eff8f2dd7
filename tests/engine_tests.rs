// Tests for plan loading and the scripted engine - public API only

mod common;

use std::io::Write;

use testreport::engine::{ExecutionEngine, Plan, ScriptedEngine};
use testreport::report::RunListener;
use testreport::state::FailureKind;

struct Silent;

impl RunListener for Silent {}

#[test]
fn test_plan_from_file_runs() {
    // Arrange
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(
        file,
        r#"
[[suites]]
name = "SuiteX"

[[suites.tests]]
name = "t1"
assertions = 3

[[suites.tests]]
name = "t2"
assertions = 1
[[suites.tests.failures]]
condition = "x == 1"
file = "x.c"
line = 7

[[suites]]
name = "SuiteY"
setup_fails = true

[[suites.tests]]
name = "y1"
"#
    )
    .expect("Failed to write plan");

    // Act
    let plan = Plan::from_file(file.path()).expect("Failed to load plan");
    let mut engine = ScriptedEngine::new(plan);
    let summary = engine.run_all(&mut Silent);

    // Assert
    assert_eq!(summary.suites_run, 2);
    assert_eq!(summary.suites_failed, 1);
    assert_eq!(summary.tests_run, 2);
    assert_eq!(summary.tests_failed, 1);
    assert_eq!(summary.asserts, 5);
    assert_eq!(summary.asserts_failed, 1);
    assert_eq!(summary.failure_records, 2);

    let kinds: Vec<FailureKind> = engine.failures().iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FailureKind::AssertionFailed, FailureKind::SuiteInitFailed]);
}

#[test]
fn test_failures_follow_suite_and_test_order() {
    // Arrange
    let plan = common::two_suite_plan();
    let registry = plan.registry();
    let mut engine = ScriptedEngine::new(plan);

    // Act
    engine.run_all(&mut Silent);

    // Assert - records are grouped by suite in registry order
    let suites: Vec<&str> = engine.failures().iter().map(|f| f.suite.as_str()).collect();
    let order: Vec<&str> = registry.suites().iter().map(|s| s.name.as_str()).collect();
    let mut last = 0;
    for suite in suites {
        let position = order.iter().position(|s| *s == suite).expect("known suite");
        assert!(position >= last);
        last = position;
    }
}

#[test]
fn test_missing_plan_file() {
    let result = Plan::from_file(std::path::Path::new("/definitely/not/here.toml"));
    let err = result.err().expect("load should fail");
    assert!(err.to_string().contains("Failed to read plan file"));
}
