pub mod automated;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod report;
pub mod state;
pub mod time;

pub use automated::Automated;
pub use error::{ErrorCode, ReportError};
pub use report::{CunitFormat, JunitFormat, ReportFormat, RunListener};
