// Execution engine boundary
//
// The real engine discovers and runs tests; the report layer only needs it to
// expose its registry and drive lifecycle events into a listener.

pub mod plan;
pub mod scripted;

pub use plan::{Plan, PlannedFailure, PlannedSuite, PlannedTest};
pub use scripted::ScriptedEngine;

use crate::report::RunListener;
use crate::state::{Registry, RunSummary};

/// What the run orchestrator needs from a test execution engine
pub trait ExecutionEngine {
    /// Registry of suites to run, if one has been set up
    fn registry(&self) -> Option<&Registry>;

    /// Run every registered suite, calling `listener` synchronously at each
    /// lifecycle point, and return the run counters.
    ///
    /// Failure records passed to the listener must be grouped by suite and,
    /// within a suite, follow the suite's test order.
    fn run_all(&mut self, listener: &mut dyn RunListener) -> RunSummary;
}
