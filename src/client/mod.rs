//! urlscan.io API client
//!
//! [`Client`] wraps the rate limit aware [`HttpClient`] with the public
//! endpoints: scan submission, result retrieval, search, screenshots and
//! DOM snapshots. Scans submitted through a client are remembered so that
//! [`Client::wait_for_result`] can skip polling while the scanner is
//! certainly still busy.

mod types;

pub use types::{
    ScanOptions, Screenshot, SearchOptions, WaitOptions, DEFAULT_SEARCH_SIZE,
};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{ApiRequest, HttpClient, RESULT_PATH_PREFIX, SCAN_PATH, SEARCH_PATH};
use crate::pagination::{ResultCursor, SearchAfterPaginator, SearchCursor};
use crate::types::JsonValue;
use bytes::Bytes;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};
use types::ScanRequest;

/// Client for the urlscan.io API
///
/// Cheap to clone; clones share the connection pool, the rate limit memo
/// and the record of submitted scans.
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
    scans: Arc<RwLock<HashMap<String, Instant>>>,
}

impl Client {
    /// Create a client for the public service with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Create a client from a config
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_http(HttpClient::new(config)?))
    }

    /// Wrap an existing HTTP client, sharing its rate limit memo
    pub fn from_http(http: HttpClient) -> Self {
        Self {
            http,
            scans: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Get the result of a finished scan
    pub async fn get_result(&self, uuid: &str) -> Result<JsonValue> {
        self.http.get_json(&result_path(uuid)).await
    }

    /// Get the PNG screenshot of a scan
    pub async fn get_screenshot(&self, uuid: &str) -> Result<Screenshot> {
        let request = ApiRequest::get(format!("/screenshots/{uuid}.png"));
        let response = self.http.send_ok(&request).await?;

        let name = response
            .url()
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_string();
        let data = response.bytes().await?;

        Ok(Screenshot { name, data })
    }

    /// Get the DOM snapshot of a scan
    pub async fn get_dom(&self, uuid: &str) -> Result<String> {
        self.get_text(&format!("/dom/{uuid}/")).await
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Search scans and other datasources
    ///
    /// Nothing is requested until the returned cursor is first pulled.
    pub fn search(&self, options: SearchOptions) -> SearchCursor {
        let paginator = SearchAfterPaginator::new(Some(options.q), options.size)
            .datasource(options.datasource)
            .collapse(options.collapse);

        ResultCursor::new(self.http.clone(), SEARCH_PATH, paginator)
            .limit(options.limit)
            .resume_from(options.search_after)
    }

    // ========================================================================
    // Scanning
    // ========================================================================

    /// Submit a URL for scanning
    pub async fn scan(&self, url: &str, options: &ScanOptions) -> Result<JsonValue> {
        let body = serde_json::to_value(ScanRequest { url, options })?;
        let request = ApiRequest::post(SCAN_PATH).json(body);
        let response: JsonValue = self.http.request_json(&request).await?;

        if let Some(enforced) = response.get("visibility").and_then(JsonValue::as_str) {
            if enforced != options.visibility.as_str() {
                warn!("Visibility of scan for {} is enforced to {}", url, enforced);
            }
        }

        if let Some(uuid) = response.get("uuid").and_then(JsonValue::as_str) {
            debug!("Submitted scan {} for {}", uuid, url);
            self.scans
                .write()
                .await
                .insert(uuid.to_string(), Instant::now());
        }

        Ok(response)
    }

    /// Submit several URLs one after another
    ///
    /// A failed submission does not stop the others; each URL is paired
    /// with its own outcome.
    pub async fn bulk_scan<I, S>(
        &self,
        urls: I,
        options: &ScanOptions,
    ) -> Vec<(String, Result<JsonValue>)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut outcomes = Vec::new();
        for url in urls {
            let url = url.into();
            let outcome = self.scan(&url, options).await;
            outcomes.push((url, outcome));
        }
        outcomes
    }

    /// Poll until the result of a scan is available
    ///
    /// For scans submitted through this client, the first poll is held
    /// back until `initial_wait` has passed since submission. That head
    /// start is granted once per scan.
    pub async fn wait_for_result(&self, uuid: &str, options: &WaitOptions) -> Result<()> {
        let submitted_at = self.scans.write().await.remove(uuid);
        if let (Some(submitted_at), Some(initial_wait)) = (submitted_at, options.initial_wait) {
            let elapsed = submitted_at.elapsed();
            if elapsed < initial_wait {
                let pause = initial_wait - elapsed;
                debug!("Waiting {:?} before polling scan {}", pause, uuid);
                tokio::time::sleep(pause).await;
            }
        }

        let request = ApiRequest::head(result_path(uuid));
        let started = Instant::now();
        loop {
            let response = self.http.send(&request).await?;
            if response.status() == StatusCode::OK {
                return Ok(());
            }

            if started.elapsed() > options.timeout {
                return Err(Error::WaitTimeout {
                    uuid: uuid.to_string(),
                    timeout: options.timeout,
                });
            }
            tokio::time::sleep(options.interval).await;
        }
    }

    /// Submit a URL, wait for the scan to finish and fetch its result
    pub async fn scan_and_get_result(
        &self,
        url: &str,
        options: &ScanOptions,
        wait: &WaitOptions,
    ) -> Result<JsonValue> {
        let submission = self.scan(url, options).await?;
        self.fetch_when_ready(&submission, wait).await
    }

    /// Bulk variant of [`Self::scan_and_get_result`]
    ///
    /// All URLs are submitted first, then each result is awaited in turn.
    pub async fn bulk_scan_and_get_results<I, S>(
        &self,
        urls: I,
        options: &ScanOptions,
        wait: &WaitOptions,
    ) -> Vec<(String, Result<JsonValue>)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let submissions = self.bulk_scan(urls, options).await;

        let mut outcomes = Vec::with_capacity(submissions.len());
        for (url, submission) in submissions {
            let outcome = match submission {
                Ok(submission) => self.fetch_when_ready(&submission, wait).await,
                Err(e) => Err(e),
            };
            outcomes.push((url, outcome));
        }
        outcomes
    }

    /// Whether a scan submitted through this client has not been awaited yet
    pub async fn pending_scan(&self, uuid: &str) -> bool {
        self.scans.read().await.contains_key(uuid)
    }

    async fn fetch_when_ready(&self, submission: &JsonValue, wait: &WaitOptions) -> Result<JsonValue> {
        let uuid = scan_uuid(submission)?;
        self.wait_for_result(uuid, wait).await?;
        self.get_result(uuid).await
    }

    // ========================================================================
    // Account & Metadata
    // ========================================================================

    /// Countries scans can be performed from
    pub async fn get_available_countries(&self) -> Result<JsonValue> {
        self.http.get_json("/api/v1/availableCountries").await
    }

    /// Grouped user agents accepted by the scan endpoint
    pub async fn get_user_agents(&self) -> Result<JsonValue> {
        self.http.get_json("/api/v1/userAgents").await
    }

    /// Available and used API quotas
    pub async fn get_quotas(&self) -> Result<JsonValue> {
        self.http.get_json("/api/v1/quotas").await
    }

    // ========================================================================
    // Raw Access
    // ========================================================================

    /// GET any endpoint and parse the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.http.get_json(path).await
    }

    /// GET any endpoint and return the body as text
    pub async fn get_text(&self, path: &str) -> Result<String> {
        self.http.request_text(&ApiRequest::get(path)).await
    }

    /// GET any endpoint and return the raw body
    pub async fn get_bytes(&self, path: &str) -> Result<Bytes> {
        self.http.request_bytes(&ApiRequest::get(path)).await
    }

    /// GET any endpoint and stream the body into `writer`
    pub async fn download<W>(&self, request: &ApiRequest, writer: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        self.http.download(request, writer).await
    }
}

fn result_path(uuid: &str) -> String {
    format!("{RESULT_PATH_PREFIX}{uuid}/")
}

fn scan_uuid(submission: &JsonValue) -> Result<&str> {
    submission
        .get("uuid")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| Error::decode("Scan response is missing 'uuid'"))
}
