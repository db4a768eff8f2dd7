// Automated run orchestration - binds the active report format to a run

use tracing::{debug, error, info};

use crate::engine::ExecutionEngine;
use crate::error::ReportError;
use crate::report::{InstalledHandlers, ListOutcome, ReportFormat, ReportOptions};
use crate::state::{Registry, RunSummary};

/// Longest package name kept, in characters
pub const MAX_PACKAGE_NAME_LEN: usize = 49;

/// Holds the single active report format and the run-level settings.
///
/// `run` borrows the orchestrator mutably for the whole run, so the active
/// format cannot be replaced while a run is in progress.
#[derive(Default)]
pub struct Automated {
    format: Option<Box<dyn ReportFormat>>,
    output_root: Option<String>,
    options: ReportOptions,
}

impl Automated {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an orchestrator with `format` already active
    pub fn with_format(format: Box<dyn ReportFormat>) -> Self {
        let mut automated = Self::new();
        automated.set_report_format(format);
        automated
    }

    /// Replace the active format outright, returning the previous one.
    ///
    /// A previously configured output root is applied to the new format.
    pub fn set_report_format(
        &mut self,
        mut format: Box<dyn ReportFormat>,
    ) -> Option<Box<dyn ReportFormat>> {
        if let Some(root) = self.output_root.as_deref() {
            format.set_output_filename(Some(root));
        }
        debug!("Active report format: {}", format.name());
        self.format.replace(format)
    }

    pub fn report_format(&self) -> Option<&dyn ReportFormat> {
        self.format.as_deref()
    }

    fn active_format(&mut self) -> &mut Box<dyn ReportFormat> {
        match self.format.as_mut() {
            Some(format) => format,
            None => panic!("no active report format set"),
        }
    }

    /// Set the root used to derive report file names.
    ///
    /// # Panics
    ///
    /// Panics if no report format is active.
    pub fn set_output_filename(&mut self, root: Option<&str>) {
        self.active_format().set_output_filename(root);
        self.output_root = root.map(str::to_string);
    }

    /// Set the package name used to prefix generated identifiers
    pub fn set_package_name(&mut self, name: Option<&str>) {
        self.options.package_name = name
            .map(|n| n.chars().take(MAX_PACKAGE_NAME_LEN).collect())
            .unwrap_or_default();
    }

    pub fn package_name(&self) -> &str {
        &self.options.package_name
    }

    /// Open the report, run every test through `engine` and close the report.
    ///
    /// If the report cannot be opened no tests are run.
    ///
    /// # Panics
    ///
    /// Panics if no report format is active or the engine has no registry.
    pub fn run(&mut self, engine: &mut dyn ExecutionEngine) -> Result<RunSummary, ReportError> {
        assert!(
            engine.registry().is_some(),
            "execution engine has no test registry"
        );

        let output_root = self.output_root.clone();
        let format = match self.format.as_mut() {
            Some(format) => format,
            None => panic!("no active report format set"),
        };

        if !format.has_output_filename() {
            format.set_output_filename(output_root.as_deref());
        }

        if let Err(e) = format.open_report(&self.options) {
            error!("Failed to open {} report: {}", format.name(), e);
            eprintln!("\nERROR - Failed to create/initialize the result file.");
            return Err(e);
        }

        let summary = {
            let mut handlers = InstalledHandlers::new(&mut **format);
            debug!("Installed handlers: {:?}", handlers.capabilities());
            engine.run_all(&mut handlers)
        };

        if let Err(e) = format.close_report() {
            error!("Failed to close {} report: {}", format.name(), e);
            eprintln!("\nERROR - Failed to close/uninitialize the result files.");
            return Err(e);
        }

        info!(
            "Wrote {} report ({} tests run, {} failed)",
            format.name(),
            summary.tests_run,
            summary.tests_failed
        );
        Ok(summary)
    }

    /// Write the active format's standalone registry listing.
    ///
    /// Formats without a listing document return [`ListOutcome::NotSupported`].
    pub fn list_tests_to_file(
        &mut self,
        registry: Option<&Registry>,
    ) -> Result<ListOutcome, ReportError> {
        let output_root = self.output_root.clone();
        let format = self.active_format();
        let registry = registry.ok_or(ReportError::NoRegistry)?;

        if !format.has_output_filename() {
            format.set_output_filename(output_root.as_deref());
        }
        let outcome = format.list_all_tests(registry)?;
        if outcome == ListOutcome::NotSupported {
            debug!("{} format has no listing document", format.name());
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CunitFormat, JunitFormat};

    #[test]
    fn test_package_name_truncated() {
        let mut automated = Automated::new();
        assert_eq!(automated.package_name(), "");

        automated.set_package_name(Some(&"p".repeat(80)));
        assert_eq!(automated.package_name().chars().count(), MAX_PACKAGE_NAME_LEN);

        automated.set_package_name(Some("com.example"));
        assert_eq!(automated.package_name(), "com.example");

        automated.set_package_name(None);
        assert_eq!(automated.package_name(), "");
    }

    #[test]
    fn test_set_report_format_replaces_previous() {
        let mut automated = Automated::with_format(Box::new(CunitFormat::new()));
        let previous = automated.set_report_format(Box::new(JunitFormat::new()));

        assert_eq!(previous.map(|f| f.name()), Some("cunit"));
        assert_eq!(automated.report_format().map(|f| f.name()), Some("junit"));
    }

    #[test]
    fn test_output_root_carried_to_new_format() {
        let mut automated = Automated::with_format(Box::new(CunitFormat::new()));
        automated.set_output_filename(Some("Foo"));
        automated.set_report_format(Box::new(JunitFormat::new()));

        let format = automated.report_format().expect("active format");
        assert!(format.has_output_filename());
    }

    #[test]
    #[should_panic(expected = "no active report format")]
    fn test_set_output_filename_without_format_panics() {
        Automated::new().set_output_filename(Some("Foo"));
    }

    #[test]
    fn test_list_without_registry() {
        let mut automated = Automated::with_format(Box::new(CunitFormat::new()));
        let err = automated.list_tests_to_file(None).err().expect("error expected");
        assert!(matches!(err, ReportError::NoRegistry));
    }
}
