// Aggregate run counters

use serde::Serialize;

/// Counters for one completed run, produced by the execution engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub suites_run: u32,
    pub suites_failed: u32,
    pub suites_inactive: u32,
    pub tests_run: u32,
    pub tests_failed: u32,
    pub tests_inactive: u32,
    pub asserts: u32,
    pub asserts_failed: u32,
    pub failure_records: u32,
    pub elapsed_ms: u64,
}

impl RunSummary {
    pub fn tests_succeeded(&self) -> u32 {
        self.tests_run.saturating_sub(self.tests_failed)
    }

    pub fn asserts_succeeded(&self) -> u32 {
        self.asserts.saturating_sub(self.asserts_failed)
    }

    /// Check if nothing failed
    pub fn all_passed(&self) -> bool {
        self.failure_records == 0 && self.suites_failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_succeeded_saturates() {
        let summary = RunSummary {
            tests_run: 1,
            tests_failed: 3,
            asserts: 10,
            asserts_failed: 4,
            ..Default::default()
        };
        assert_eq!(summary.tests_succeeded(), 0);
        assert_eq!(summary.asserts_succeeded(), 6);
    }

    #[test]
    fn test_default_all_passed() {
        assert!(RunSummary::default().all_passed());
    }
}
