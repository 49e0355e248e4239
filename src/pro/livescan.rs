//! Live scanning on a chosen scanner
//!
//! Live scans run on a specific scanner (e.g. `de01`) and stay on that
//! scanner until they are stored or purged.

use crate::error::Result;
use crate::http::{ApiRequest, HttpClient};
use crate::types::{JsonValue, LiveScanResourceType, Visibility};
use bytes::Bytes;
use serde::Serialize;
use std::collections::BTreeMap;

/// Scanner settings for a live scan
///
/// Times are in milliseconds.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveScanOptions {
    #[serde(skip)]
    pub visibility: Option<Visibility>,

    /// Budget for the whole scan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_timeout: Option<u64>,

    /// Delay between page load and capture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_delay: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_features: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_features: Option<Vec<String>>,
}

#[derive(Serialize)]
struct LiveScanTask<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    visibility: Option<Visibility>,
}

#[derive(Serialize)]
struct LiveScanBody<'a> {
    task: LiveScanTask<'a>,
    scanner: &'a LiveScanOptions,
}

/// A resource fetched from a live scanner
#[derive(Debug, Clone, PartialEq)]
pub enum LiveScanResource {
    /// `result`
    Json(JsonValue),
    /// `dom`
    Text(String),
    /// `screenshot`, `response` and `download`
    Binary(Bytes),
}

/// Live scan API
#[derive(Debug, Clone, Copy)]
pub struct LiveScan<'a> {
    http: &'a HttpClient,
}

impl<'a> LiveScan<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Available scanners with their metadata
    pub async fn get_scanners(&self) -> Result<JsonValue> {
        self.http.get_json("/api/v1/livescan/scanners/").await
    }

    /// Start a live scan and return its UUID immediately
    ///
    /// Poll [`Self::get_resource`] for the `result` until it is available.
    pub async fn task(
        &self,
        scanner_id: &str,
        url: &str,
        options: &LiveScanOptions,
    ) -> Result<JsonValue> {
        self.submit(&format!("/api/v1/livescan/{scanner_id}/task/"), url, options)
            .await
    }

    /// Run a live scan and wait for it to finish
    pub async fn scan(
        &self,
        scanner_id: &str,
        url: &str,
        options: &LiveScanOptions,
    ) -> Result<JsonValue> {
        self.submit(&format!("/api/v1/livescan/{scanner_id}/scan/"), url, options)
            .await
    }

    /// Fetch a resource of a live scan
    ///
    /// `resource_id` is the scan UUID for `result`, `screenshot` and `dom`,
    /// and the SHA256 of the resource for `response` and `download`.
    pub async fn get_resource(
        &self,
        scanner_id: &str,
        resource_type: LiveScanResourceType,
        resource_id: &str,
    ) -> Result<LiveScanResource> {
        let request = ApiRequest::get(format!(
            "/api/v1/livescan/{scanner_id}/{}/{resource_id}",
            resource_type.as_str()
        ));

        match resource_type {
            LiveScanResourceType::Result => {
                Ok(LiveScanResource::Json(self.http.request_json(&request).await?))
            }
            LiveScanResourceType::Dom => {
                Ok(LiveScanResource::Text(self.http.request_text(&request).await?))
            }
            LiveScanResourceType::Screenshot
            | LiveScanResourceType::Response
            | LiveScanResourceType::Download => {
                Ok(LiveScanResource::Binary(self.http.request_bytes(&request).await?))
            }
        }
    }

    /// Keep a live scan as a regular scan result
    pub async fn store(
        &self,
        scanner_id: &str,
        scan_id: &str,
        visibility: Visibility,
    ) -> Result<JsonValue> {
        let body = serde_json::json!({ "task": { "visibility": visibility } });
        let request = ApiRequest::put(format!("/api/v1/livescan/{scanner_id}/{scan_id}/")).json(body);
        self.http.request_json(&request).await
    }

    /// Discard a live scan from its scanner
    pub async fn purge(&self, scanner_id: &str, scan_id: &str) -> Result<JsonValue> {
        let request = ApiRequest::delete(format!("/api/v1/livescan/{scanner_id}/{scan_id}/"));
        self.http.request_json(&request).await
    }

    async fn submit(&self, path: &str, url: &str, options: &LiveScanOptions) -> Result<JsonValue> {
        let body = LiveScanBody {
            task: LiveScanTask {
                url,
                visibility: options.visibility,
            },
            scanner: options,
        };
        let request = ApiRequest::post(path).json(serde_json::to_value(&body)?);
        self.http.request_json(&request).await
    }
}
