// Report module - pluggable report formats driven by run lifecycle events

pub mod cunit;
pub mod filenames;
pub mod junit;
pub mod sanitize;
pub mod session;

use crate::error::ReportError;
use crate::state::{FailureRecord, Registry, RunSummary, Suite, Test};
pub use cunit::CunitFormat;
pub use filenames::OutputFiles;
pub use junit::JunitFormat;
pub use sanitize::Sanitizer;

/// Lifecycle events emitted by the execution engine.
///
/// Every handler defaults to a no-op; a format overrides the ones it cares
/// about and declares them in [`ReportFormat::capabilities`].
pub trait RunListener {
    /// Called before a test body runs
    fn on_test_start(&mut self, _test: &Test, _suite: &Suite) {}

    /// Called after a test; `failures` holds the records this test produced
    fn on_test_complete(&mut self, _test: &Test, _suite: &Suite, _failures: &[FailureRecord]) {}

    /// Called once after every suite has been processed
    fn on_all_tests_complete(
        &mut self,
        _registry: &Registry,
        _summary: &RunSummary,
        _failures: &[FailureRecord],
    ) {
    }

    /// Called when a suite's setup fails; none of its tests run
    fn on_suite_init_failure(&mut self, _suite: &Suite) {}

    /// Called when a suite's teardown fails
    fn on_suite_cleanup_failure(&mut self, _suite: &Suite) {}

    /// Called after a suite finished; `failures` holds every record of the suite
    fn on_suite_complete(&mut self, _suite: &Suite, _failures: &[FailureRecord]) {}
}

/// Which handlers a format actually implements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub test_start: bool,
    pub test_complete: bool,
    pub all_tests_complete: bool,
    pub suite_init_failure: bool,
    pub suite_cleanup_failure: bool,
    pub suite_complete: bool,
    pub list_all_tests: bool,
}

/// Result of a registry listing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    Written,
    /// The format has no listing document; this is not an error
    NotSupported,
}

/// Settings shared by every format for one run
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Namespace prefix for generated identifiers
    pub package_name: String,
}

/// A concrete report document format
pub trait ReportFormat: RunListener + Send {
    /// Short identifier (`cunit`, `junit`)
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities;

    /// Derive output file names from `root`; no I/O happens here
    fn set_output_filename(&mut self, root: Option<&str>);

    /// Whether output file names have been derived yet
    fn has_output_filename(&self) -> bool;

    /// Open the report file(s) and write static headers
    fn open_report(&mut self, options: &ReportOptions) -> Result<(), ReportError>;

    /// Write trailers, flush and close; terminal call of a run
    fn close_report(&mut self) -> Result<(), ReportError>;

    /// Write a standalone listing of the registry
    fn list_all_tests(&mut self, _registry: &Registry) -> Result<ListOutcome, ReportError> {
        Ok(ListOutcome::NotSupported)
    }
}

/// The subset of a format's handlers that get wired into a run
pub struct InstalledHandlers<'a> {
    format: &'a mut dyn ReportFormat,
    caps: Capabilities,
}

impl<'a> InstalledHandlers<'a> {
    pub fn new(format: &'a mut dyn ReportFormat) -> Self {
        let caps = format.capabilities();
        Self { format, caps }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }
}

impl RunListener for InstalledHandlers<'_> {
    fn on_test_start(&mut self, test: &Test, suite: &Suite) {
        if self.caps.test_start {
            self.format.on_test_start(test, suite);
        }
    }

    fn on_test_complete(&mut self, test: &Test, suite: &Suite, failures: &[FailureRecord]) {
        if self.caps.test_complete {
            self.format.on_test_complete(test, suite, failures);
        }
    }

    fn on_all_tests_complete(
        &mut self,
        registry: &Registry,
        summary: &RunSummary,
        failures: &[FailureRecord],
    ) {
        if self.caps.all_tests_complete {
            self.format.on_all_tests_complete(registry, summary, failures);
        }
    }

    fn on_suite_init_failure(&mut self, suite: &Suite) {
        if self.caps.suite_init_failure {
            self.format.on_suite_init_failure(suite);
        }
    }

    fn on_suite_cleanup_failure(&mut self, suite: &Suite) {
        if self.caps.suite_cleanup_failure {
            self.format.on_suite_cleanup_failure(suite);
        }
    }

    fn on_suite_complete(&mut self, suite: &Suite, failures: &[FailureRecord]) {
        if self.caps.suite_complete {
            self.format.on_suite_complete(suite, failures);
        }
    }
}

/// Look up a built-in format by name
pub fn format_by_name(name: &str) -> Option<Box<dyn ReportFormat>> {
    match name.to_ascii_lowercase().as_str() {
        "cunit" | "xml" => Some(Box::new(CunitFormat::new())),
        "junit" => Some(Box::new(JunitFormat::new())),
        _ => None,
    }
}
