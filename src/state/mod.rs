// State module - read-only view of the test registry handed to report formats
// Suites and tests are owned by the execution engine; formats only borrow them
// for the duration of one event callback.

pub mod metrics;
pub mod result;

pub use metrics::RunSummary;
pub use result::{FailureKind, FailureRecord};

use serde::{Deserialize, Serialize};

/// A single named test case within a suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Test {
    /// Create an active test
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
        }
    }

    /// Create an inactive test
    pub fn inactive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: false,
        }
    }
}

/// Named group of tests sharing setup and teardown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suite {
    pub name: String,
    #[serde(default)]
    pub tests: Vec<Test>,
    #[serde(default)]
    pub has_setup: bool,
    #[serde(default)]
    pub has_teardown: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Suite {
    /// Create an active suite without setup or teardown
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
            has_setup: false,
            has_teardown: false,
            active: true,
        }
    }

    /// Append a test (builder style)
    pub fn with_test(mut self, test: Test) -> Self {
        self.tests.push(test);
        self
    }

    /// Mark the suite as having setup and/or teardown behavior
    pub fn with_fixtures(mut self, has_setup: bool, has_teardown: bool) -> Self {
        self.has_setup = has_setup;
        self.has_teardown = has_teardown;
        self
    }

    /// Number of tests registered in the suite
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Find a test by name
    pub fn test(&self, name: &str) -> Option<&Test> {
        self.tests.iter().find(|t| t.name == name)
    }
}

/// Ordered collection of every registered suite
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    suites: Vec<Suite>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a suite.
    ///
    /// Suite names are unique within a registry; registering a second suite
    /// under an existing name replaces the earlier one in place.
    pub fn add_suite(&mut self, suite: Suite) {
        match self.suites.iter_mut().find(|s| s.name == suite.name) {
            Some(existing) => *existing = suite,
            None => self.suites.push(suite),
        }
    }

    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    pub fn suite(&self, name: &str) -> Option<&Suite> {
        self.suites.iter().find(|s| s.name == name)
    }

    pub fn suite_count(&self) -> usize {
        self.suites.len()
    }

    /// Total number of tests across all suites
    pub fn test_count(&self) -> usize {
        self.suites.iter().map(Suite::test_count).sum()
    }
}

impl FromIterator<Suite> for Registry {
    fn from_iter<I: IntoIterator<Item = Suite>>(iter: I) -> Self {
        let mut registry = Registry::new();
        for suite in iter {
            registry.add_suite(suite);
        }
        registry
    }
}
