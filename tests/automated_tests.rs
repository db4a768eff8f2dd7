// Tests for run orchestration - public API only

mod common;

use common::{assert_well_formed, listing_path, results_path, root_in, two_suite_plan};
use testreport::engine::{ExecutionEngine, ScriptedEngine};
use testreport::report::{CunitFormat, JunitFormat, ListOutcome, RunListener};
use testreport::state::{Registry, RunSummary, Suite, Test};
use testreport::{Automated, ErrorCode, ReportError};

/// Engine that only remembers whether it was asked to run
struct ProbeEngine {
    registry: Option<Registry>,
    ran: bool,
}

impl ProbeEngine {
    fn new() -> Self {
        Self {
            registry: Some(vec![Suite::new("S").with_test(Test::new("t"))].into_iter().collect()),
            ran: false,
        }
    }
}

impl ExecutionEngine for ProbeEngine {
    fn registry(&self) -> Option<&Registry> {
        self.registry.as_ref()
    }

    fn run_all(&mut self, listener: &mut dyn RunListener) -> RunSummary {
        self.ran = true;
        let summary = RunSummary::default();
        if let Some(registry) = &self.registry {
            listener.on_all_tests_complete(registry, &summary, &[]);
        }
        summary
    }
}

#[test]
fn test_open_failure_skips_run() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path().join("missing/dir/Foo").to_string_lossy().into_owned();
    let mut automated = Automated::with_format(Box::new(CunitFormat::new()));
    automated.set_output_filename(Some(&root));
    let mut engine = ProbeEngine::new();

    // Act
    let result = automated.run(&mut engine);

    // Assert
    let err = result.err().expect("open should fail");
    assert!(matches!(err, ReportError::OpenFailed { .. }));
    assert_eq!(err.code(), ErrorCode::FileOpenFailed);
    assert!(!engine.ran);
}

#[test]
#[should_panic(expected = "no active report format")]
fn test_run_without_format_panics() {
    let mut engine = ProbeEngine::new();
    let _ = Automated::new().run(&mut engine);
}

#[test]
#[should_panic(expected = "no test registry")]
fn test_run_without_registry_panics() {
    let mut engine = ProbeEngine::new();
    engine.registry = None;
    let _ = Automated::with_format(Box::new(JunitFormat::new())).run(&mut engine);
}

#[test]
fn test_run_writes_results_and_reuses_format() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let mut automated = Automated::with_format(Box::new(CunitFormat::new()));
    automated.set_output_filename(Some(&root_in(temp_dir.path(), "Twice")));

    // Act - two consecutive runs through the same format
    for _ in 0..2 {
        let mut engine = ScriptedEngine::new(two_suite_plan());
        automated.run(&mut engine).expect("run failed");
    }

    // Assert - the second run truncated the first document
    let xml = std::fs::read_to_string(results_path(temp_dir.path(), "Twice")).unwrap();
    assert_well_formed(&xml);
    assert_eq!(xml.matches("<CUNIT_TEST_RUN_REPORT>").count(), 1);
}

#[test]
fn test_cunit_listing_file() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let mut automated = Automated::with_format(Box::new(CunitFormat::new()));
    automated.set_output_filename(Some(&root_in(temp_dir.path(), "List")));
    let registry = two_suite_plan().registry();

    // Act
    let outcome = automated.list_tests_to_file(Some(&registry)).expect("listing failed");

    // Assert
    assert_eq!(outcome, ListOutcome::Written);
    let xml = std::fs::read_to_string(listing_path(temp_dir.path(), "List")).unwrap();
    assert_well_formed(&xml);
    assert!(xml.contains("<CUNIT_TEST_LIST_REPORT>"));
    assert_eq!(xml.matches("<CUNIT_ALL_TEST_LISTING_SUITE>").count(), 2);
    assert_eq!(xml.matches("<TEST_CASE_DEFINITION>").count(), 3);
    // SuiteY has a (failing) setup
    assert!(xml.contains("<INITIALIZE_VALUE> Yes </INITIALIZE_VALUE>"));
    assert!(!results_path(temp_dir.path(), "List").exists());
}

#[test]
fn test_junit_listing_not_supported() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let mut automated = Automated::with_format(Box::new(JunitFormat::new()));
    automated.set_output_filename(Some(&root_in(temp_dir.path(), "List")));
    let registry = two_suite_plan().registry();

    // Act
    let outcome = automated.list_tests_to_file(Some(&registry));

    // Assert
    assert_eq!(outcome.expect("not an error"), ListOutcome::NotSupported);
    assert!(!listing_path(temp_dir.path(), "List").exists());
}

#[test]
fn test_junit_package_name_in_classname() {
    // Arrange
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let mut automated = Automated::with_format(Box::new(JunitFormat::new()));
    automated.set_output_filename(Some(&root_in(temp_dir.path(), "Pkg")));
    automated.set_package_name(Some("com.example.tests"));
    let mut engine = ScriptedEngine::new(two_suite_plan());

    // Act
    automated.run(&mut engine).expect("run failed");

    // Assert
    let xml = std::fs::read_to_string(results_path(temp_dir.path(), "Pkg")).unwrap();
    assert!(xml.contains("classname=\"com.example.tests.SuiteX\""));
    assert!(xml.contains("<testsuites name=\"com.example.tests\">"));
}
