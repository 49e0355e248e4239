//! Saved searches

use super::envelope;
use crate::error::Result;
use crate::http::{ApiRequest, HttpClient};
use crate::types::{JsonValue, Permission, SavedSearchDataSource, Tlp};
use serde::Serialize;

const SEARCHES_PATH: &str = "/api/v1/user/searches/";

/// Saved search definition for create and update
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearchRequest {
    pub datasource: SavedSearchDataSource,
    /// Search API query string
    pub query: String,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tlp: Option<Tlp>,

    /// Tags applied to matches; the prefix (`pro.`, `public.`, `private.`,
    /// `team.`) sets who can see them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
}

impl SavedSearchRequest {
    pub fn new(
        datasource: SavedSearchDataSource,
        query: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            datasource,
            query: query.into(),
            name: name.into(),
            description: None,
            long_description: None,
            tlp: None,
            user_tags: None,
            permissions: None,
        }
    }
}

/// Saved search API
#[derive(Debug, Clone, Copy)]
pub struct SavedSearch<'a> {
    http: &'a HttpClient,
}

impl<'a> SavedSearch<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn get_list(&self) -> Result<JsonValue> {
        self.http.get_json(SEARCHES_PATH).await
    }

    pub async fn create(&self, search: &SavedSearchRequest) -> Result<JsonValue> {
        let request = ApiRequest::post(SEARCHES_PATH).json(envelope("search", search)?);
        self.http.request_json(&request).await
    }

    pub async fn update(&self, search_id: &str, search: &SavedSearchRequest) -> Result<JsonValue> {
        let request = ApiRequest::put(format!("{SEARCHES_PATH}{search_id}/"))
            .json(envelope("search", search)?);
        self.http.request_json(&request).await
    }

    pub async fn remove(&self, search_id: &str) -> Result<JsonValue> {
        let request = ApiRequest::delete(format!("{SEARCHES_PATH}{search_id}/"));
        self.http.request_json(&request).await
    }

    /// Items currently matching a saved search
    pub async fn get_results(&self, search_id: &str) -> Result<JsonValue> {
        self.http
            .get_json(&format!("{SEARCHES_PATH}{search_id}/results/"))
            .await
    }
}
