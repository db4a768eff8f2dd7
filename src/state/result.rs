// Failure records produced by the execution engine

use serde::{Deserialize, Serialize};

/// What kind of problem a failure record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// An assertion inside a test body failed
    AssertionFailed,
    /// The suite setup failed; none of its tests ran
    SuiteInitFailed,
    /// The suite teardown failed after its tests ran
    SuiteCleanupFailed,
    /// The test was registered inactive and did not run
    TestInactive,
}

impl FailureKind {
    /// Suite-level records carry no test reference
    pub fn is_suite_level(self) -> bool {
        matches!(self, Self::SuiteInitFailed | Self::SuiteCleanupFailed)
    }
}

/// One detected failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub kind: FailureKind,
    pub suite: String,
    pub test: Option<String>,
    pub condition: String,
    pub file: String,
    pub line: u32,
}

impl FailureRecord {
    /// Create an assertion failure for a test
    pub fn assertion(
        suite: impl Into<String>,
        test: impl Into<String>,
        condition: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            kind: FailureKind::AssertionFailed,
            suite: suite.into(),
            test: Some(test.into()),
            condition: condition.into(),
            file: file.into(),
            line,
        }
    }

    /// Create the marker recorded for an inactive test
    pub fn inactive(suite: impl Into<String>, test: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::TestInactive,
            suite: suite.into(),
            test: Some(test.into()),
            condition: "Test inactive".to_string(),
            file: "testreport".to_string(),
            line: 0,
        }
    }

    /// Create a suite-level record (setup or teardown failure)
    pub fn suite_level(kind: FailureKind, suite: impl Into<String>) -> Self {
        debug_assert!(kind.is_suite_level());
        let condition = match kind {
            FailureKind::SuiteInitFailed => "Suite Initialization failed",
            _ => "Suite cleanup failed",
        };
        Self {
            kind,
            suite: suite.into(),
            test: None,
            condition: condition.to_string(),
            file: "testreport".to_string(),
            line: 0,
        }
    }

    /// Whether the record belongs to the named test
    pub fn is_for_test(&self, name: &str) -> bool {
        self.test.as_deref() == Some(name)
    }
}
