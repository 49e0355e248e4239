//! Error types for the urlscan client
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Service failures come in three shapes: a generic [`ApiError`], a
//! [`RateLimitError`] for HTTP 429, and [`Error::RateLimitRemaining`],
//! which is raised locally when the memoized quota for a category is
//! already known to be zero and no request was sent.

use crate::types::ActionCategory;
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A single field or sub-error reported inside an API error payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    pub title: String,
    pub status: u16,
    pub code: Option<String>,
    pub description: Option<String>,
    pub detail: Option<String>,
}

/// A non-2xx, non-429 response from the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    pub description: Option<String>,
    /// Machine readable code, e.g. `validationerror`
    pub code: Option<String>,
    /// Machine readable error type, e.g. `body`
    pub kind: Option<String>,
    pub errors: Option<Vec<ItemError>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (HTTP {})", self.message, self.status)?;
        if let Some(description) = &self.description {
            write!(f, ": {description}")?;
        }
        Ok(())
    }
}

/// A 429 response from the service
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitError {
    pub message: String,
    pub status: u16,
    pub description: Option<String>,
    /// Seconds until the quota resets, from `X-Rate-Limit-Reset-After`
    pub reset_after: f64,
}

impl RateLimitError {
    /// Time to wait before the quota resets
    pub fn reset_after_duration(&self) -> Duration {
        seconds_to_duration(self.reset_after)
    }
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (HTTP {}), reset after {}s",
            self.message, self.status, self.reset_after
        )
    }
}

/// The main error type for the urlscan client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Service Errors
    // ============================================================================
    #[error("API error: {0}")]
    Api(ApiError),

    #[error("Rate limited: {0}")]
    RateLimited(RateLimitError),

    #[error("{category} is rate limited until {reset_at}")]
    RateLimitRemaining {
        category: ActionCategory,
        reset_at: DateTime<Utc>,
    },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Timed out after {timeout:?} waiting for result {uuid}")]
    WaitTimeout { uuid: String, timeout: Duration },

    // ============================================================================
    // Data Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Configuration & I/O Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Whether waiting for the quota to reset may let the call succeed
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::RateLimited(_) | Error::RateLimitRemaining { .. })
    }

    /// HTTP status reported by the service, if this error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(e) => Some(e.status),
            Error::RateLimited(e) => Some(e.status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// How long to wait before retrying a rate limited call
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimited(e) => Some(e.reset_after_duration()),
            Error::RateLimitRemaining { reset_at, .. } => {
                Some((*reset_at - Utc::now()).to_std().unwrap_or_default())
            }
            _ => None,
        }
    }
}

/// Convert a possibly fractional, possibly bogus seconds value into a duration
pub(crate) fn seconds_to_duration(seconds: f64) -> Duration {
    if seconds > 0.0 {
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

/// Result type alias for the urlscan client
pub type Result<T> = std::result::Result<T, Error>;
