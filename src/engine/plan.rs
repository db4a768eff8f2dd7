// Declarative run plans - a registry plus the outcome of every test

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::state::{Registry, Suite, Test};

fn default_true() -> bool {
    true
}

/// One assertion failure a planned test reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedFailure {
    pub condition: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTest {
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Number of assertions that pass
    #[serde(default)]
    pub assertions: u32,
    #[serde(default)]
    pub failures: Vec<PlannedFailure>,
}

impl PlannedTest {
    pub fn passing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            assertions: 1,
            failures: Vec::new(),
        }
    }

    pub fn failing(name: impl Into<String>, failures: Vec<PlannedFailure>) -> Self {
        Self {
            failures,
            ..Self::passing(name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSuite {
    pub name: String,
    #[serde(default)]
    pub setup: bool,
    #[serde(default)]
    pub teardown: bool,
    #[serde(default)]
    pub setup_fails: bool,
    #[serde(default)]
    pub teardown_fails: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub tests: Vec<PlannedTest>,
}

impl PlannedSuite {
    pub fn new(name: impl Into<String>, tests: Vec<PlannedTest>) -> Self {
        Self {
            name: name.into(),
            setup: false,
            teardown: false,
            setup_fails: false,
            teardown_fails: false,
            active: true,
            tests,
        }
    }

    /// Registry view of the suite; a failing fixture implies it exists
    pub fn to_suite(&self) -> Suite {
        Suite {
            name: self.name.clone(),
            tests: self
                .tests
                .iter()
                .map(|t| Test {
                    name: t.name.clone(),
                    active: t.active,
                })
                .collect(),
            has_setup: self.setup || self.setup_fails,
            has_teardown: self.teardown || self.teardown_fails,
            active: self.active,
        }
    }
}

/// A full run plan, usually loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub suites: Vec<PlannedSuite>,
}

impl Plan {
    /// Load a plan from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse plan file: {}", path.display()))
    }

    /// Parse a plan from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let plan: Plan = toml::from_str(content).context("Invalid plan TOML")?;
        Ok(plan)
    }

    pub fn registry(&self) -> Registry {
        self.suites.iter().map(PlannedSuite::to_suite).collect()
    }

    /// Planned suite by name; the last definition wins like in the registry
    pub fn suite(&self, name: &str) -> Option<&PlannedSuite> {
        self.suites.iter().rev().find(|s| s.name == name)
    }
}
