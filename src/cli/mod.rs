//! Command-line interface module.

mod args;
pub mod extract;
pub mod report;

pub use args::Cli;
