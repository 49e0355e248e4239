// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # urlscan-rs
//!
//! An async client for the [urlscan.io](https://urlscan.io) API that keeps
//! track of the service's rate limits.
//!
//! ## Features
//!
//! - **Rate limit memo**: Every response updates a per-category quota memo;
//!   requests for an exhausted category are refused before they are sent
//! - **Automatic retry**: Optionally sleep through 429 responses instead
//! - **Lazy pagination**: Search and hostname results are pulled page by
//!   page through cursors that honour a result limit
//! - **Typed errors**: Service errors, rate limits and transport failures
//!   are distinct variants of one [`Error`]
//! - **Pro API**: Incidents, subscriptions, live scans and more
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use urlscan::{Client, ScanOptions, SearchOptions, WaitOptions, Visibility};
//!
//! #[tokio::main]
//! async fn main() -> urlscan::Result<()> {
//!     let client = Client::new("<api key>")?;
//!
//!     // Submit a scan and wait for its result
//!     let result = client
//!         .scan_and_get_result(
//!             "https://example.com",
//!             &ScanOptions::new(Visibility::Unlisted),
//!             &WaitOptions::default(),
//!         )
//!         .await?;
//!
//!     // Page through search results
//!     let mut cursor = client.search(SearchOptions::new("page.domain:example.com").limit(500));
//!     while let Some(item) = cursor.next().await? {
//!         println!("{}", item["_id"]);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────────┐
//! │            Client            │               Pro                │
//! │  scan / result / search      │  hostname / incidents / livescan │
//! └──────────────┬───────────────┴────────────────┬─────────────────┘
//!                │                                │
//! ┌──────────────┴──────────────┐  ┌──────────────┴──────────────┐
//! │        ResultCursor         │  │         HttpClient          │
//! │  search_after / pageState   │──│  rate limit memo, retries   │
//! └─────────────────────────────┘  └─────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// HTTP dispatcher with rate limit tracking
pub mod http;

/// Result cursors and pagination strategies
pub mod pagination;

/// Public API endpoints
pub mod client;

/// Pro API endpoints
pub mod pro;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::{Client, ScanOptions, Screenshot, SearchOptions, WaitOptions};
pub use config::{ClientConfig, RetryMode};
pub use pagination::{HostnameCursor, ResultCursor, SearchCursor};
pub use pro::{HostnameOptions, Pro, StructureSearchOptions};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
