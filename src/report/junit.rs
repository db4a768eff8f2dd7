// JUnit reporter - outputs one <testsuite> per completed suite

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::warn;

use super::filenames::OutputFiles;
use super::session::{XmlSink, create_report_file};
use super::{Capabilities, ReportFormat, ReportOptions, RunListener};
use crate::error::ReportError;
use crate::state::{FailureKind, FailureRecord, Registry, RunSummary, Suite, Test};

/// Failure records of one suite, grouped by what they refer to.
///
/// Grouping by test name means a record is attributed to its own test even
/// when the engine emits records out of test order.
#[derive(Debug, Default)]
struct SuiteFailures<'a> {
    init: Option<&'a FailureRecord>,
    cleanup: Option<&'a FailureRecord>,
    by_test: HashMap<&'a str, Vec<&'a FailureRecord>>,
}

impl<'a> SuiteFailures<'a> {
    fn collect(suite: &Suite, failures: &'a [FailureRecord]) -> Self {
        let mut grouped = Self::default();

        for failure in failures {
            if failure.suite != suite.name {
                warn!(
                    "Ignoring failure record for suite '{}' while reporting suite '{}'",
                    failure.suite, suite.name
                );
                continue;
            }
            match (failure.kind, failure.test.as_deref()) {
                (FailureKind::SuiteInitFailed, _) => {
                    grouped.init.get_or_insert(failure);
                }
                (FailureKind::SuiteCleanupFailed, _) => {
                    grouped.cleanup.get_or_insert(failure);
                }
                (_, Some(test)) if suite.test(test).is_some() => {
                    grouped.by_test.entry(test).or_default().push(failure);
                }
                (_, test) => warn!(
                    "Ignoring failure record for unknown test {:?} in suite '{}'",
                    test, suite.name
                ),
            }
        }

        grouped
    }
}

/// Per-run state of the JUnit results document
pub struct JunitSession<W: Write> {
    sink: XmlSink<W>,
    package: String,
    root_open: bool,
}

impl<W: Write> JunitSession<W> {
    /// Start a results document on `out` and open the `testsuites` root
    pub fn begin(out: W, path: impl AsRef<Path>, package: &str) -> Self {
        let mut sink = XmlSink::new(out, path.as_ref());
        let name = sink.escaped(package);
        writeln!(sink, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
        writeln!(sink, "<testsuites name=\"{}\">", name);

        Self {
            sink,
            package: package.to_string(),
            root_open: true,
        }
    }

    fn classname(&mut self, suite: &Suite) -> String {
        if self.package.is_empty() {
            self.sink.escaped(&suite.name)
        } else {
            let qualified = format!("{}.{}", self.package, suite.name);
            self.sink.escaped(&qualified)
        }
    }

    /// Write the opening `testcase` tag; self-closing when there is no detail
    fn testcase_tag(&mut self, classname: &str, name: &str, has_detail: bool) {
        let name = self.sink.escaped(name);
        writeln!(
            self.sink,
            "    <testcase classname=\"{}\" name=\"{}\" time=\"0\"{}>",
            classname,
            name,
            if has_detail { "" } else { "/" }
        );
    }

    fn failure_details(&mut self, failure: &FailureRecord) {
        let condition = self.sink.escaped(&failure.condition);
        let file = self.sink.escaped(&failure.file);
        writeln!(self.sink, "        Condition: {}", condition);
        writeln!(self.sink, "        File     : {}", file);
        writeln!(self.sink, "        Line     : {}", failure.line);
    }

    fn dummy_test(&mut self, classname: &str, suite: &Suite, failure: &FailureRecord) {
        let (suffix, message) = match failure.kind {
            FailureKind::SuiteInitFailed => ("Initialization", "Suite Initialization failed"),
            _ => ("Cleanup", "Suite Cleanup failed"),
        };
        let name = format!("{} - {}", suite.name, suffix);

        self.testcase_tag(classname, &name, true);
        writeln!(self.sink, "      <failure message=\"{}\" type=\"Failure\">", message);
        self.failure_details(failure);
        writeln!(self.sink, "      </failure>");
        writeln!(self.sink, "    </testcase>");
    }

    fn errored_test(&mut self, classname: &str, test: &Test) {
        self.testcase_tag(classname, &test.name, true);
        writeln!(self.sink, "      <error message=\"Suite initialization failed\"/>");
        writeln!(self.sink, "    </testcase>");
    }

    fn skipped_test(&mut self, classname: &str, test: &Test) {
        self.testcase_tag(classname, &test.name, true);
        writeln!(self.sink, "      <skipped/>");
        writeln!(self.sink, "    </testcase>");
    }

    fn failed_test(&mut self, classname: &str, test: &Test, failures: &[&FailureRecord]) {
        let message = failures
            .first()
            .map(|f| self.sink.escaped(&f.condition))
            .unwrap_or_default();

        self.testcase_tag(classname, &test.name, true);
        writeln!(self.sink, "      <failure message=\"{}\" type=\"Failure\">", message);
        for failure in failures {
            self.failure_details(failure);
        }
        writeln!(self.sink, "      </failure>");
        writeln!(self.sink, "    </testcase>");
    }

    /// Write the `testsuite` element for one completed suite
    pub fn suite_complete(&mut self, suite: &Suite, failures: &[FailureRecord]) {
        if !self.root_open {
            warn!(
                "Suite '{}' completed after the run ended, ignoring it",
                suite.name
            );
            return;
        }
        let classname = self.classname(suite);
        let suite_name = self.sink.escaped(&suite.name);
        writeln!(
            self.sink,
            "  <testsuite tests=\"{}\" name=\"{}\">",
            suite.test_count(),
            suite_name
        );

        if failures.is_empty() {
            for test in &suite.tests {
                self.testcase_tag(&classname, &test.name, false);
            }
        } else {
            let grouped = SuiteFailures::collect(suite, failures);

            if let Some(init) = grouped.init {
                self.dummy_test(&classname, suite, init);
                for test in &suite.tests {
                    self.errored_test(&classname, test);
                }
            } else {
                for test in &suite.tests {
                    match grouped.by_test.get(test.name.as_str()) {
                        None => self.testcase_tag(&classname, &test.name, false),
                        Some(records) if records[0].kind == FailureKind::TestInactive => {
                            self.skipped_test(&classname, test)
                        }
                        Some(records) => self.failed_test(&classname, test, records),
                    }
                }

                if let Some(cleanup) = grouped.cleanup {
                    self.dummy_test(&classname, suite, cleanup);
                }
            }
        }

        writeln!(self.sink, "  </testsuite>");
    }

    /// Close the `testsuites` root element
    pub fn end_run(&mut self) {
        if self.root_open {
            writeln!(self.sink, "</testsuites>");
            self.root_open = false;
        }
    }

    pub fn finish(mut self) -> Result<W, ReportError> {
        self.end_run();
        self.sink.finish()
    }
}

/// JUnit report format: a single results document
#[derive(Default)]
pub struct JunitFormat {
    files: Option<OutputFiles>,
    session: Option<JunitSession<BufWriter<File>>>,
}

impl JunitFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derived file names, once set
    pub fn output_files(&self) -> Option<&OutputFiles> {
        self.files.as_ref()
    }

    fn session(&mut self) -> &mut JunitSession<BufWriter<File>> {
        match self.session.as_mut() {
            Some(session) => session,
            None => panic!("JUnit report handler called before open_report"),
        }
    }
}

impl RunListener for JunitFormat {
    fn on_suite_complete(&mut self, suite: &Suite, failures: &[FailureRecord]) {
        self.session().suite_complete(suite, failures);
    }

    fn on_all_tests_complete(
        &mut self,
        _registry: &Registry,
        _summary: &RunSummary,
        _failures: &[FailureRecord],
    ) {
        self.session().end_run();
    }
}

impl ReportFormat for JunitFormat {
    fn name(&self) -> &'static str {
        "junit"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            all_tests_complete: true,
            suite_complete: true,
            ..Default::default()
        }
    }

    fn set_output_filename(&mut self, root: Option<&str>) {
        self.files = Some(OutputFiles::derive(root));
    }

    fn has_output_filename(&self) -> bool {
        self.files.is_some()
    }

    fn open_report(&mut self, options: &ReportOptions) -> Result<(), ReportError> {
        let files = self.files.get_or_insert_with(OutputFiles::default);
        if self.session.take().is_some() {
            warn!("Discarding unfinished JUnit report session");
        }

        let writer = create_report_file(files.results())?;
        self.session = Some(JunitSession::begin(
            writer,
            files.results(),
            &options.package_name,
        ));
        Ok(())
    }

    fn close_report(&mut self) -> Result<(), ReportError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => panic!("JUnit close_report called without an open report"),
        };
        session.finish().map(|_| ())
    }
}
