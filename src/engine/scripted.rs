// Scripted engine - replays a plan as a real run would report it

use std::time::Instant;

use tracing::{debug, info};

use super::ExecutionEngine;
use super::plan::Plan;
use crate::report::RunListener;
use crate::state::{FailureKind, FailureRecord, Registry, RunSummary};

/// Deterministic engine driven by a [`Plan`]
pub struct ScriptedEngine {
    plan: Plan,
    registry: Registry,
    failures: Vec<FailureRecord>,
}

impl ScriptedEngine {
    pub fn new(plan: Plan) -> Self {
        let registry = plan.registry();
        Self {
            plan,
            registry,
            failures: Vec::new(),
        }
    }

    /// Failure records of the most recent run
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }
}

/// Counter value for a collection length, clamped to `u32::MAX`
fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl ExecutionEngine for ScriptedEngine {
    fn registry(&self) -> Option<&Registry> {
        Some(&self.registry)
    }

    fn run_all(&mut self, listener: &mut dyn RunListener) -> RunSummary {
        let started = Instant::now();
        let mut summary = RunSummary::default();
        let mut records: Vec<FailureRecord> = Vec::new();

        for suite in self.registry.suites() {
            let Some(planned) = self.plan.suite(&suite.name) else {
                continue;
            };

            if !suite.active {
                debug!("Skipping inactive suite '{}'", suite.name);
                summary.suites_inactive = summary.suites_inactive.saturating_add(1);
                continue;
            }

            summary.suites_run = summary.suites_run.saturating_add(1);
            let suite_first = records.len();

            if planned.setup_fails {
                debug!("Setup of suite '{}' failed", suite.name);
                summary.suites_failed = summary.suites_failed.saturating_add(1);
                records.push(FailureRecord::suite_level(
                    FailureKind::SuiteInitFailed,
                    &suite.name,
                ));
                listener.on_suite_init_failure(suite);
                listener.on_suite_complete(suite, &records[suite_first..]);
                continue;
            }

            for (test, planned_test) in suite.tests.iter().zip(&planned.tests) {
                listener.on_test_start(test, suite);
                let test_first = records.len();

                if !test.active {
                    summary.tests_inactive = summary.tests_inactive.saturating_add(1);
                    records.push(FailureRecord::inactive(&suite.name, &test.name));
                } else {
                    let failed = count(planned_test.failures.len());
                    summary.tests_run = summary.tests_run.saturating_add(1);
                    summary.asserts = summary
                        .asserts
                        .saturating_add(planned_test.assertions)
                        .saturating_add(failed);
                    summary.asserts_failed = summary.asserts_failed.saturating_add(failed);
                    if failed > 0 {
                        summary.tests_failed = summary.tests_failed.saturating_add(1);
                    }
                    records.extend(planned_test.failures.iter().map(|f| {
                        FailureRecord::assertion(
                            &suite.name,
                            &test.name,
                            &f.condition,
                            &f.file,
                            f.line,
                        )
                    }));
                }

                listener.on_test_complete(test, suite, &records[test_first..]);
            }

            if planned.teardown_fails {
                debug!("Teardown of suite '{}' failed", suite.name);
                summary.suites_failed = summary.suites_failed.saturating_add(1);
                records.push(FailureRecord::suite_level(
                    FailureKind::SuiteCleanupFailed,
                    &suite.name,
                ));
                listener.on_suite_cleanup_failure(suite);
            }

            listener.on_suite_complete(suite, &records[suite_first..]);
        }

        summary.failure_records = count(records.len());
        summary.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        listener.on_all_tests_complete(&self.registry, &summary, &records);

        info!(
            "Run finished: {} suites, {} tests run, {} failed",
            summary.suites_run, summary.tests_run, summary.tests_failed
        );
        self.failures = records;
        summary
    }
}
