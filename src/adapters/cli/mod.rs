//! CLI Adapter
//!
//! Command-line interface for the crypto heatmap fetcher.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{
    execute, resolve_config, summary_lines, CliApp, Command, FetchCmd, SummaryCmd,
};

/// Initialize the CLI application
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}
