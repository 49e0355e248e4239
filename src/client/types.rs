//! Request options and response shapes for the public API

use crate::types::{JsonValue, SearchDataSource, Visibility};
use bytes::Bytes;
use serde::Serialize;
use std::time::Duration;

/// Default page size for search requests
pub const DEFAULT_SEARCH_SIZE: u32 = 100;

// ============================================================================
// Search
// ============================================================================

/// Options for [`super::Client::search`]
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Search query, e.g. `page.domain:example.com`
    pub q: String,
    /// Results per request
    pub size: u32,
    /// Maximum number of results the cursor yields
    pub limit: Option<u64>,
    /// Continue after this sort key instead of starting at the top
    pub search_after: Option<String>,
    pub datasource: Option<SearchDataSource>,
    /// Field to collapse results on; applies per page only
    pub collapse: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            q: String::new(),
            size: DEFAULT_SEARCH_SIZE,
            limit: None,
            search_after: None,
            datasource: None,
            collapse: None,
        }
    }
}

impl SearchOptions {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn search_after(mut self, token: impl Into<String>) -> Self {
        self.search_after = Some(token.into());
        self
    }

    #[must_use]
    pub fn datasource(mut self, datasource: SearchDataSource) -> Self {
        self.datasource = Some(datasource);
        self
    }

    #[must_use]
    pub fn collapse(mut self, field: impl Into<String>) -> Self {
        self.collapse = Some(field.into());
        self
    }
}

// ============================================================================
// Scan
// ============================================================================

/// Options for a scan submission
///
/// Unset fields are left out of the request body.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOptions {
    pub visibility: Visibility,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Custom user agent for the scanner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customagent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,

    /// Any value disables reclassification of URLs that may contain PII
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_safety: Option<JsonValue>,

    /// ISO-3166-1 alpha-2 country to scan from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ScanOptions {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn customagent(mut self, agent: impl Into<String>) -> Self {
        self.customagent = Some(agent.into());
        self
    }

    #[must_use]
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    #[must_use]
    pub fn override_safety(mut self, value: JsonValue) -> Self {
        self.override_safety = Some(value);
        self
    }

    #[must_use]
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// Scan submission body
#[derive(Debug, Serialize)]
pub(crate) struct ScanRequest<'a> {
    pub url: &'a str,
    #[serde(flatten)]
    pub options: &'a ScanOptions,
}

// ============================================================================
// Waiting
// ============================================================================

/// Polling settings for [`super::Client::wait_for_result`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Give up after polling for this long
    pub timeout: Duration,
    /// Pause between polls
    pub interval: Duration,
    /// Minimum time between submission and the first poll
    ///
    /// Only applies to scans submitted through the same client.
    pub initial_wait: Option<Duration>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            interval: Duration::from_secs(1),
            initial_wait: Some(Duration::from_secs(10)),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// A downloaded scan screenshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    /// File name taken from the final URL, e.g. `<uuid>.png`
    pub name: String,
    /// PNG bytes
    pub data: Bytes,
}
