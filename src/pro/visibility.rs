//! Changing the visibility of existing scan results

use crate::error::Result;
use crate::http::{ApiRequest, HttpClient};
use crate::types::{JsonValue, UpdateVisibility};
use serde_json::json;

/// Result visibility API
#[derive(Debug, Clone, Copy)]
pub struct ResultVisibility<'a> {
    http: &'a HttpClient,
}

impl<'a> ResultVisibility<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Set the visibility of a scan; `Deleted` hides it from everyone
    pub async fn update(&self, uuid: &str, visibility: UpdateVisibility) -> Result<JsonValue> {
        let request = ApiRequest::put(visibility_path(uuid)).json(json!({ "visibility": visibility }));
        self.http.request_json(&request).await
    }

    /// Restore the visibility the scan was submitted with
    pub async fn reset(&self, uuid: &str) -> Result<JsonValue> {
        self.http
            .request_json(&ApiRequest::delete(visibility_path(uuid)))
            .await
    }
}

fn visibility_path(uuid: &str) -> String {
    format!("/api/v1/result/{uuid}/visibility/")
}
