//! CLI module
//!
//! Command-line interface over the urlscan client.
//!
//! # Commands
//!
//! - `search` - Search scans, one JSON result per line
//! - `scan` - Submit URLs, optionally waiting for their results
//! - `result` - Fetch a scan result
//! - `screenshot` - Download a scan screenshot
//! - `dom` - Print a scan DOM snapshot
//! - `quotas` - Show remaining quotas
//! - `hostname` - Hostname history (Pro)

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, API_KEY_ENV};
pub use runner::Runner;

#[cfg(test)]
mod tests;
