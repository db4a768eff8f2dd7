pub mod args;

pub use args::{Cli, Commands, ListArgs, RunArgs, SummaryFormat};
