// Error types for report generation

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Discrete error codes returned across the configuration surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    Success = 0,
    NoRegistry = 10,
    FileOpenFailed = 40,
    FileCloseFailed = 41,
    WriteFailed = 43,
}

impl ErrorCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Recoverable report I/O failures
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no test registry available")]
    NoRegistry,

    #[error("failed to create report file {}: {source}", .path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to close report file {}: {source}", .path.display())]
    CloseFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write report file {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ReportError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NoRegistry => ErrorCode::NoRegistry,
            Self::OpenFailed { .. } => ErrorCode::FileOpenFailed,
            Self::CloseFailed { .. } => ErrorCode::FileCloseFailed,
            Self::WriteFailed { .. } => ErrorCode::WriteFailed,
        }
    }
}

/// Map any report result onto its error code
pub fn error_code<T>(result: &Result<T, ReportError>) -> ErrorCode {
    match result {
        Ok(_) => ErrorCode::Success,
        Err(e) => e.code(),
    }
}
