//! HTTP dispatch module
//!
//! Sends requests to the service with rate limit awareness and maps
//! failed responses to typed errors.
//!
//! # Features
//!
//! - **Pre-flight throttling**: per-category quota memo fed by response headers
//! - **Automatic retry**: optional wait-and-resend on 429 with a reset delay
//! - **Error mapping**: problem payloads become [`crate::Error::Api`] or
//!   [`crate::Error::RateLimited`]

mod client;
mod problem;
mod rate_limit;
mod request;

pub use client::{ensure_success, HttpClient, API_KEY_HEADER};
pub use problem::error_from_response;
pub use rate_limit::{
    parse_rate_limit_headers, parse_reset_after, RateLimitMemo, RateLimitState, HEADER_ACTION,
    HEADER_REMAINING, HEADER_RESET, HEADER_RESET_AFTER,
};
pub use request::{classify, ApiRequest, RESULT_PATH_PREFIX, SCAN_PATH, SEARCH_PATH};
