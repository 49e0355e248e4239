//! Brand detection statistics

use crate::error::Result;
use crate::http::HttpClient;
use crate::types::JsonValue;

/// Brand API
#[derive(Debug, Clone, Copy)]
pub struct Brand<'a> {
    http: &'a HttpClient,
}

impl<'a> Brand<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Brands the platform can detect
    pub async fn get_available_brands(&self) -> Result<JsonValue> {
        self.http.get_json("/api/v1/pro/availableBrands").await
    }

    /// Brands with detection statistics; slower than [`Self::get_available_brands`]
    pub async fn get_brands(&self) -> Result<JsonValue> {
        self.http.get_json("/api/v1/pro/brands").await
    }
}
