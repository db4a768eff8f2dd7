// Formatter session plumbing - owned output handle with sticky write errors
//
// Event handlers cannot return errors, so the first failed write is kept here
// and surfaced when the report is closed. Later writes are skipped.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::sanitize::Sanitizer;
use crate::error::ReportError;

/// Buffered XML output owned by one formatter session
pub struct XmlSink<W: Write> {
    out: W,
    path: PathBuf,
    error: Option<io::Error>,
    sanitizer: Sanitizer,
}

/// Create (truncate) a report file for buffered writing
pub fn create_report_file(path: &Path) -> Result<BufWriter<File>, ReportError> {
    let file = File::create(path).map_err(|source| ReportError::OpenFailed {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Opened report file {}", path.display());
    Ok(BufWriter::new(file))
}

impl<W: Write> XmlSink<W> {
    pub fn new(out: W, path: impl Into<PathBuf>) -> Self {
        Self {
            out,
            path: path.into(),
            error: None,
            sanitizer: Sanitizer::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write formatted markup; used through `write!`/`writeln!`
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }
        let result = self.out.write_fmt(args);
        record(&mut self.error, &self.path, result);
    }

    /// Write `<tag> text </tag>` on its own line with `raw` escaped
    pub fn element(&mut self, indent: usize, tag: &str, raw: &str) {
        if self.error.is_some() {
            return;
        }
        let text = self.sanitizer.sanitize(raw);
        let result = writeln!(self.out, "{:indent$}<{tag}> {text} </{tag}>", "");
        record(&mut self.error, &self.path, result);
    }

    /// Escape `raw` for use inside an attribute or text node
    pub fn escaped(&mut self, raw: &str) -> String {
        self.sanitizer.sanitize(raw).to_owned()
    }

    pub fn has_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Flush the output and hand back the writer.
    ///
    /// The first write error seen during the session wins over a flush error.
    pub fn finish(mut self) -> Result<W, ReportError> {
        let flushed = self.out.flush();
        if let Some(source) = self.error.take() {
            return Err(ReportError::WriteFailed {
                path: self.path,
                source,
            });
        }
        match flushed {
            Ok(()) => Ok(self.out),
            Err(source) => Err(ReportError::CloseFailed {
                path: self.path,
                source,
            }),
        }
    }
}

fn record(slot: &mut Option<io::Error>, path: &Path, result: io::Result<()>) {
    if let Err(e) = result {
        warn!("Write to report file {} failed: {}", path.display(), e);
        *slot = Some(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_element_escapes_text() {
        let mut sink = XmlSink::new(Vec::new(), "mem.xml");
        sink.element(2, "NAME", "a<b");
        let out = sink.finish().expect("finish");
        assert_eq!(String::from_utf8(out).unwrap(), "  <NAME> a&lt;b </NAME>\n");
    }

    #[test]
    fn test_first_write_error_is_reported_on_finish() {
        let mut sink = XmlSink::new(FailingWriter, "broken.xml");
        write!(sink, "<root>");
        assert!(sink.has_failed());
        sink.element(0, "X", "y");

        let err = sink.finish().err().expect("write error expected");
        assert!(matches!(err, ReportError::WriteFailed { .. }));
        assert!(err.to_string().contains("broken.xml"));
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("no/such/dir/report.xml");
        let err = create_report_file(&path).err().expect("open error expected");
        assert!(matches!(err, ReportError::OpenFailed { .. }));
    }
}
