//! urlscan Pro API
//!
//! [`Pro`] exposes the subscriber-only endpoints. Every sub-API borrows
//! the same [`HttpClient`], so they all share one connection pool and one
//! rate limit memo.

mod brand;
mod channel;
mod datadump;
mod incident;
mod livescan;
mod saved_search;
mod subscription;
mod visibility;

pub use brand::Brand;
pub use channel::{Channel, ChannelRequest};
pub use datadump::DataDump;
pub use incident::{Incident, IncidentRequest};
pub use livescan::{LiveScan, LiveScanOptions, LiveScanResource};
pub use saved_search::{SavedSearch, SavedSearchRequest};
pub use subscription::{Subscription, SubscriptionRequest};
pub use visibility::ResultVisibility;

use crate::client::{Client, DEFAULT_SEARCH_SIZE};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{ApiRequest, HttpClient};
use crate::pagination::{
    HostnameCursor, PageStatePaginator, ResultCursor, SearchAfterPaginator, SearchCursor,
};
use crate::types::{JsonObject, JsonValue};
use serde::Serialize;
use tokio::io::AsyncWrite;

/// Default page size for hostname history
pub const DEFAULT_HOSTNAME_SIZE: u32 = 1_000;

/// Options for [`Pro::structure_search`]
#[derive(Debug, Clone)]
pub struct StructureSearchOptions {
    /// Extra query filter
    pub q: Option<String>,
    pub size: u32,
    pub search_after: Option<String>,
    pub limit: Option<u64>,
}

impl Default for StructureSearchOptions {
    fn default() -> Self {
        Self {
            q: None,
            size: DEFAULT_SEARCH_SIZE,
            search_after: None,
            limit: None,
        }
    }
}

/// Options for [`Pro::hostname`]
#[derive(Debug, Clone)]
pub struct HostnameOptions {
    pub size: u32,
    pub limit: Option<u64>,
    /// Resume from a page state returned by an earlier request
    pub page_state: Option<String>,
}

impl Default for HostnameOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_HOSTNAME_SIZE,
            limit: None,
            page_state: None,
        }
    }
}

/// Client for the urlscan Pro API
#[derive(Debug, Clone)]
pub struct Pro {
    http: HttpClient,
}

impl Pro {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_http(HttpClient::new(config)?))
    }

    pub fn from_http(http: HttpClient) -> Self {
        Self { http }
    }

    /// Get the underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// A public API client sharing this client's session and rate limit memo
    pub fn client(&self) -> Client {
        Client::from_http(self.http.clone())
    }

    // ========================================================================
    // Sub-APIs
    // ========================================================================

    pub fn brand(&self) -> Brand<'_> {
        Brand::new(&self.http)
    }

    pub fn channel(&self) -> Channel<'_> {
        Channel::new(&self.http)
    }

    pub fn datadump(&self) -> DataDump<'_> {
        DataDump::new(&self.http)
    }

    pub fn incident(&self) -> Incident<'_> {
        Incident::new(&self.http)
    }

    pub fn livescan(&self) -> LiveScan<'_> {
        LiveScan::new(&self.http)
    }

    pub fn saved_search(&self) -> SavedSearch<'_> {
        SavedSearch::new(&self.http)
    }

    pub fn subscription(&self) -> Subscription<'_> {
        Subscription::new(&self.http)
    }

    pub fn visibility(&self) -> ResultVisibility<'_> {
        ResultVisibility::new(&self.http)
    }

    // ========================================================================
    // Endpoints
    // ========================================================================

    /// Results structurally similar to a given scan
    pub fn structure_search(&self, scan_id: &str, options: StructureSearchOptions) -> SearchCursor {
        let paginator = SearchAfterPaginator::new(options.q, options.size);
        ResultCursor::new(
            self.http.clone(),
            format!("/api/v1/pro/result/{scan_id}/similar/"),
            paginator,
        )
        .limit(options.limit)
        .resume_from(options.search_after)
    }

    /// Historical observations of a hostname
    pub fn hostname(&self, hostname: &str, options: HostnameOptions) -> HostnameCursor {
        ResultCursor::new(
            self.http.clone(),
            format!("/api/v1/hostname/{hostname}"),
            PageStatePaginator::new(options.size),
        )
        .limit(options.limit)
        .resume_from(options.page_state)
    }

    /// Download a file by hash as a password protected ZIP archive
    ///
    /// The service defaults the password to `urlscan!` and the file name to
    /// `<hash>.zip`.
    pub async fn download_file<W>(
        &self,
        file_hash: &str,
        writer: &mut W,
        password: Option<&str>,
        filename: Option<&str>,
    ) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let request = ApiRequest::get(format!("/downloads/{file_hash}"))
            .query_opt("password", password)
            .query_opt("filename", filename);
        self.http.download(&request, writer).await
    }

    /// The user or API key making the request
    pub async fn get_user(&self) -> Result<JsonValue> {
        self.http.get_json("/api/v1/pro/username").await
    }
}

/// Wrap a request body under a single key, e.g. `{"channel": {...}}`
pub(crate) fn envelope<T: Serialize>(key: &str, value: &T) -> Result<JsonValue> {
    let mut map = JsonObject::new();
    map.insert(key.to_string(), serde_json::to_value(value)?);
    Ok(JsonValue::Object(map))
}
