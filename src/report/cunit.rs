// CUnit reporter - streaming CUnit-Run / CUnit-List XML documents
//
// The engine never announces "suite started", so suite containers are opened
// when a test from a different suite starts and closed on the next suite
// transition, suite failure or end of run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use super::filenames::OutputFiles;
use super::session::{XmlSink, create_report_file};
use super::{Capabilities, ListOutcome, ReportFormat, ReportOptions, RunListener};
use crate::error::ReportError;
use crate::state::{FailureRecord, Registry, RunSummary, Suite, Test};
use crate::time::ctime_now;

const GENERATOR: &str = concat!("File Generated By testreport v", env!("CARGO_PKG_VERSION"));

/// Which suite container, if any, is open in the results document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuiteState {
    NoSuiteOpen,
    SuiteOpen(String),
}

/// Per-run state of the CUnit results document
pub struct CunitSession<W: Write> {
    sink: XmlSink<W>,
    state: SuiteState,
    listing_open: bool,
}

impl<W: Write> CunitSession<W> {
    /// Start a results document on `out`, writing the static header
    pub fn begin(out: W, path: impl AsRef<Path>) -> Self {
        let mut sink = XmlSink::new(out, path.as_ref());
        writeln!(sink, "<?xml version=\"1.0\" ?>");
        writeln!(sink, "<?xml-stylesheet type=\"text/xsl\" href=\"CUnit-Run.xsl\" ?>");
        writeln!(sink, "<!DOCTYPE CUNIT_TEST_RUN_REPORT SYSTEM \"CUnit-Run.dtd\">");
        writeln!(sink, "<CUNIT_TEST_RUN_REPORT>");
        writeln!(sink, "  <CUNIT_HEADER/>");
        writeln!(sink, "  <CUNIT_RESULT_LISTING>");

        Self {
            sink,
            state: SuiteState::NoSuiteOpen,
            listing_open: true,
        }
    }

    pub fn state(&self) -> &SuiteState {
        &self.state
    }

    fn close_suite(&mut self) {
        if let SuiteState::SuiteOpen(_) = self.state {
            writeln!(self.sink, "      </CUNIT_RUN_SUITE_SUCCESS>");
            writeln!(self.sink, "    </CUNIT_RUN_SUITE>");
            self.state = SuiteState::NoSuiteOpen;
        }
    }

    /// Open a container for `suite` unless it is the one already open
    fn enter_suite(&mut self, suite: &Suite) {
        if matches!(&self.state, SuiteState::SuiteOpen(open) if *open == suite.name) {
            return;
        }
        self.close_suite();

        writeln!(self.sink, "    <CUNIT_RUN_SUITE>");
        writeln!(self.sink, "      <CUNIT_RUN_SUITE_SUCCESS>");
        self.sink.element(8, "SUITE_NAME", &suite.name);
        self.state = SuiteState::SuiteOpen(suite.name.clone());
    }

    pub fn test_start(&mut self, suite: &Suite) {
        self.enter_suite(suite);
    }

    /// Write the outcome of `test`.
    ///
    /// Only the leading records that belong to `test` are written; the walk
    /// stops at the first record of another test.
    pub fn test_complete(&mut self, test: &Test, suite: &Suite, failures: &[FailureRecord]) {
        // a completion without a start still has to land inside a container
        self.enter_suite(suite);

        let mut own = failures
            .iter()
            .take_while(|f| f.is_for_test(&test.name))
            .peekable();

        if own.peek().is_none() {
            writeln!(self.sink, "        <CUNIT_RUN_TEST_RECORD>");
            writeln!(self.sink, "          <CUNIT_RUN_TEST_SUCCESS>");
            self.sink.element(12, "TEST_NAME", &test.name);
            writeln!(self.sink, "          </CUNIT_RUN_TEST_SUCCESS>");
            writeln!(self.sink, "        </CUNIT_RUN_TEST_RECORD>");
            return;
        }

        for failure in own {
            writeln!(self.sink, "        <CUNIT_RUN_TEST_RECORD>");
            writeln!(self.sink, "          <CUNIT_RUN_TEST_FAILURE>");
            self.sink.element(12, "TEST_NAME", &test.name);
            self.sink.element(12, "FILE_NAME", &failure.file);
            writeln!(self.sink, "            <LINE_NUMBER> {} </LINE_NUMBER>", failure.line);
            self.sink.element(12, "CONDITION", &failure.condition);
            writeln!(self.sink, "          </CUNIT_RUN_TEST_FAILURE>");
            writeln!(self.sink, "        </CUNIT_RUN_TEST_RECORD>");
        }
    }

    /// Write a suite-level failure block (setup or teardown)
    pub fn suite_failure(&mut self, suite: &Suite, reason: &str) {
        self.close_suite();

        writeln!(self.sink, "    <CUNIT_RUN_SUITE>");
        writeln!(self.sink, "      <CUNIT_RUN_SUITE_FAILURE>");
        self.sink.element(8, "SUITE_NAME", &suite.name);
        self.sink.element(8, "FAILURE_REASON", reason);
        writeln!(self.sink, "      </CUNIT_RUN_SUITE_FAILURE>");
        writeln!(self.sink, "    </CUNIT_RUN_SUITE>");
    }

    /// Close the results listing and write the run summary
    pub fn all_complete(&mut self, registry: &Registry, summary: &RunSummary) {
        if !self.listing_open {
            warn!("Run summary already written, ignoring repeated completion event");
            return;
        }
        self.close_suite();
        writeln!(self.sink, "  </CUNIT_RESULT_LISTING>");
        self.listing_open = false;

        writeln!(self.sink, "  <CUNIT_RUN_SUMMARY>");
        self.summary_record(
            "Suites",
            registry.suite_count(),
            summary.suites_run,
            None,
            summary.suites_failed,
            Some(summary.suites_inactive),
        );
        self.summary_record(
            "Test Cases",
            registry.test_count(),
            summary.tests_run,
            Some(summary.tests_succeeded()),
            summary.tests_failed,
            Some(summary.tests_inactive),
        );
        self.summary_record(
            "Assertions",
            summary.asserts as usize,
            summary.asserts,
            Some(summary.asserts_succeeded()),
            summary.asserts_failed,
            None,
        );
        writeln!(self.sink, "  </CUNIT_RUN_SUMMARY>");
    }

    fn summary_record(
        &mut self,
        kind: &str,
        total: usize,
        run: u32,
        succeeded: Option<u32>,
        failed: u32,
        inactive: Option<u32>,
    ) {
        let succeeded = succeeded.map_or_else(|| "- NA -".to_string(), |n| n.to_string());
        let inactive = inactive.map_or_else(|| "n/a".to_string(), |n| n.to_string());

        writeln!(self.sink, "    <CUNIT_RUN_SUMMARY_RECORD>");
        self.sink.element(6, "TYPE", kind);
        writeln!(self.sink, "      <TOTAL> {} </TOTAL>", total);
        writeln!(self.sink, "      <RUN> {} </RUN>", run);
        self.sink.element(6, "SUCCEEDED", &succeeded);
        writeln!(self.sink, "      <FAILED> {} </FAILED>", failed);
        self.sink.element(6, "INACTIVE", &inactive);
        writeln!(self.sink, "    </CUNIT_RUN_SUMMARY_RECORD>");
    }

    /// Close whatever is still open, write the footer and flush
    pub fn finish(mut self, generated_at: &str) -> Result<W, ReportError> {
        if self.listing_open {
            debug!("Run ended without a summary, closing result listing");
            self.close_suite();
            writeln!(self.sink, "  </CUNIT_RESULT_LISTING>");
        }
        write_footer(&mut self.sink, generated_at);
        writeln!(self.sink, "</CUNIT_TEST_RUN_REPORT>");
        self.sink.finish()
    }
}

fn write_footer<W: Write>(sink: &mut XmlSink<W>, generated_at: &str) {
    let footer = format!("{} - {}", GENERATOR, generated_at);
    sink.element(2, "CUNIT_FOOTER", &footer);
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Write the static CUnit-List document for `registry`
pub fn write_listing<W: Write>(
    out: W,
    path: impl AsRef<Path>,
    registry: &Registry,
    generated_at: &str,
) -> Result<W, ReportError> {
    let mut sink = XmlSink::new(out, path.as_ref());

    writeln!(sink, "<?xml version=\"1.0\" ?>");
    writeln!(sink, "<?xml-stylesheet type=\"text/xsl\" href=\"CUnit-List.xsl\" ?>");
    writeln!(sink, "<!DOCTYPE CUNIT_TEST_LIST_REPORT SYSTEM \"CUnit-List.dtd\">");
    writeln!(sink, "<CUNIT_TEST_LIST_REPORT>");
    writeln!(sink, "  <CUNIT_HEADER/>");
    writeln!(sink, "  <CUNIT_LIST_TOTAL_SUMMARY>");
    for (text, value) in [
        ("Total Number of Suites", registry.suite_count()),
        ("Total Number of Test Cases", registry.test_count()),
    ] {
        writeln!(sink, "    <CUNIT_LIST_TOTAL_SUMMARY_RECORD>");
        sink.element(6, "CUNIT_LIST_TOTAL_SUMMARY_RECORD_TEXT", text);
        writeln!(
            sink,
            "      <CUNIT_LIST_TOTAL_SUMMARY_RECORD_VALUE> {} </CUNIT_LIST_TOTAL_SUMMARY_RECORD_VALUE>",
            value
        );
        writeln!(sink, "    </CUNIT_LIST_TOTAL_SUMMARY_RECORD>");
    }
    writeln!(sink, "  </CUNIT_LIST_TOTAL_SUMMARY>");

    writeln!(sink, "  <CUNIT_ALL_TEST_LISTING>");
    for suite in registry.suites() {
        writeln!(sink, "    <CUNIT_ALL_TEST_LISTING_SUITE>");
        writeln!(sink, "      <CUNIT_ALL_TEST_LISTING_SUITE_DEFINITION>");
        sink.element(8, "SUITE_NAME", &suite.name);
        sink.element(8, "INITIALIZE_VALUE", yes_no(suite.has_setup));
        sink.element(8, "CLEANUP_VALUE", yes_no(suite.has_teardown));
        sink.element(8, "ACTIVE_VALUE", yes_no(suite.active));
        writeln!(sink, "        <TEST_COUNT_VALUE> {} </TEST_COUNT_VALUE>", suite.test_count());
        writeln!(sink, "      </CUNIT_ALL_TEST_LISTING_SUITE_DEFINITION>");

        writeln!(sink, "      <CUNIT_ALL_TEST_LISTING_SUITE_TESTS>");
        for test in &suite.tests {
            writeln!(sink, "        <TEST_CASE_DEFINITION>");
            sink.element(10, "TEST_CASE_NAME", &test.name);
            sink.element(10, "TEST_ACTIVE_VALUE", yes_no(test.active));
            writeln!(sink, "        </TEST_CASE_DEFINITION>");
        }
        writeln!(sink, "      </CUNIT_ALL_TEST_LISTING_SUITE_TESTS>");
        writeln!(sink, "    </CUNIT_ALL_TEST_LISTING_SUITE>");
    }
    writeln!(sink, "  </CUNIT_ALL_TEST_LISTING>");

    write_footer(&mut sink, generated_at);
    writeln!(sink, "</CUNIT_TEST_LIST_REPORT>");
    sink.finish()
}

/// CUnit report format: per-test results document plus registry listing
#[derive(Default)]
pub struct CunitFormat {
    files: Option<OutputFiles>,
    session: Option<CunitSession<BufWriter<File>>>,
}

impl CunitFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derived file names, once set
    pub fn output_files(&self) -> Option<&OutputFiles> {
        self.files.as_ref()
    }

    fn session(&mut self) -> &mut CunitSession<BufWriter<File>> {
        match self.session.as_mut() {
            Some(session) => session,
            None => panic!("CUnit report handler called before open_report"),
        }
    }
}

impl RunListener for CunitFormat {
    fn on_test_start(&mut self, _test: &Test, suite: &Suite) {
        self.session().test_start(suite);
    }

    fn on_test_complete(&mut self, test: &Test, suite: &Suite, failures: &[FailureRecord]) {
        self.session().test_complete(test, suite, failures);
    }

    fn on_all_tests_complete(
        &mut self,
        registry: &Registry,
        summary: &RunSummary,
        _failures: &[FailureRecord],
    ) {
        self.session().all_complete(registry, summary);
    }

    fn on_suite_init_failure(&mut self, suite: &Suite) {
        self.session().suite_failure(suite, "Suite Initialization Failed");
    }

    fn on_suite_cleanup_failure(&mut self, suite: &Suite) {
        self.session().suite_failure(suite, "Suite Cleanup Failed");
    }
}

impl ReportFormat for CunitFormat {
    fn name(&self) -> &'static str {
        "cunit"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            test_start: true,
            test_complete: true,
            all_tests_complete: true,
            suite_init_failure: true,
            suite_cleanup_failure: true,
            suite_complete: false,
            list_all_tests: true,
        }
    }

    fn set_output_filename(&mut self, root: Option<&str>) {
        self.files = Some(OutputFiles::derive(root));
    }

    fn has_output_filename(&self) -> bool {
        self.files.is_some()
    }

    fn open_report(&mut self, _options: &ReportOptions) -> Result<(), ReportError> {
        let files = self.files.get_or_insert_with(OutputFiles::default);
        if self.session.take().is_some() {
            warn!("Discarding unfinished CUnit report session");
        }

        let writer = create_report_file(files.results())?;
        self.session = Some(CunitSession::begin(writer, files.results()));
        Ok(())
    }

    fn close_report(&mut self) -> Result<(), ReportError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => panic!("CUnit close_report called without an open report"),
        };
        session.finish(&ctime_now()).map(|_| ())
    }

    fn list_all_tests(&mut self, registry: &Registry) -> Result<ListOutcome, ReportError> {
        let files = self.files.get_or_insert_with(OutputFiles::default);
        let writer = create_report_file(files.listing())?;
        write_listing(writer, files.listing(), registry, &ctime_now())?;
        Ok(ListOutcome::Written)
    }
}
