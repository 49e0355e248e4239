//! CLI commands and argument parsing

use crate::config::RetryMode;
use crate::types::{SearchDataSource, Visibility};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable the API key is read from
pub const API_KEY_ENV: &str = "URLSCAN_API_KEY";

/// Command-line client for urlscan.io
#[derive(Parser, Debug)]
#[command(name = "urlscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API key (overrides the config file)
    #[arg(short = 'k', long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Client configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Rate limit handling (overrides the config file)
    #[arg(long, global = true)]
    pub retry: Option<RetryMode>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search scans and other datasources, one result per line
    Search {
        /// Search query, e.g. `page.domain:example.com`
        query: String,

        /// Results per request
        #[arg(long, default_value = "100")]
        size: u32,

        /// Stop after this many results
        #[arg(long)]
        limit: Option<u64>,

        /// Continue from the sort token of an earlier result
        #[arg(long)]
        search_after: Option<String>,

        #[arg(long)]
        datasource: Option<SearchDataSource>,

        /// Field to collapse results on
        #[arg(long)]
        collapse: Option<String>,
    },

    /// Submit URLs for scanning
    Scan {
        /// URLs to scan
        #[arg(required = true)]
        urls: Vec<String>,

        #[arg(long, default_value = "public")]
        visibility: Visibility,

        /// Tags to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// ISO-3166-1 country code to scan from
        #[arg(long)]
        country: Option<String>,

        /// User agent for the scanner
        #[arg(long)]
        customagent: Option<String>,

        #[arg(long)]
        referer: Option<String>,

        /// Wait for each scan to finish and print its result
        #[arg(short, long)]
        wait: bool,

        /// Seconds to keep polling when waiting
        #[arg(long, default_value = "60")]
        timeout: u64,
    },

    /// Fetch the result of a scan
    Result {
        uuid: String,
    },

    /// Download the screenshot of a scan
    Screenshot {
        uuid: String,

        /// Output file (defaults to the name the service returns)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the DOM snapshot of a scan
    Dom {
        uuid: String,
    },

    /// Show the remaining quotas of the API key
    Quotas,

    /// Historical observations of a hostname (Pro)
    Hostname {
        hostname: String,

        /// Results per request
        #[arg(long, default_value = "1000")]
        size: u32,

        /// Stop after this many results
        #[arg(long)]
        limit: Option<u64>,

        /// Continue from a page state returned earlier
        #[arg(long)]
        page_state: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
