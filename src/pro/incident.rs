//! Incidents: continuous monitoring of an observable

use super::envelope;
use crate::error::Result;
use crate::http::{ApiRequest, HttpClient};
use crate::types::{IncidentVisibility, JsonValue, ScanIntervalMode, WatchedAttribute};
use serde::Serialize;
use serde_json::json;

const INCIDENTS_PATH: &str = "/api/v1/user/incidents";

/// Incident definition for create and update
///
/// Durations are in seconds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRequest {
    /// Hostname, domain, IP or URL to observe
    pub observable: String,
    pub visibility: IncidentVisibility,
    /// Channels notified about this incident
    pub channels: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_interval: Option<u64>,

    /// `Manual` disables the after-suspended and after-malicious intervals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_interval_mode: Option<ScanIntervalMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub watched_attributes: Option<Vec<WatchedAttribute>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agents: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agents_per_interval: Option<u32>,

    /// ISO-3166-1 country codes to scan from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries_per_interval: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_delay_suspended: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_delay_inactive: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_delay_malicious: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_interval_after_suspended: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_interval_after_malicious: Option<u64>,

    /// Incident profile ID to create the incident from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_profile: Option<String>,

    /// Close the incident automatically after this long
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_after: Option<u64>,
}

impl IncidentRequest {
    pub fn new(
        observable: impl Into<String>,
        visibility: IncidentVisibility,
        channels: Vec<String>,
    ) -> Self {
        Self {
            observable: observable.into(),
            visibility,
            channels,
            scan_interval: None,
            scan_interval_mode: None,
            watched_attributes: None,
            user_agents: None,
            user_agents_per_interval: None,
            countries: None,
            countries_per_interval: None,
            stop_delay_suspended: None,
            stop_delay_inactive: None,
            stop_delay_malicious: None,
            scan_interval_after_suspended: None,
            scan_interval_after_malicious: None,
            incident_profile: None,
            expire_after: None,
        }
    }
}

/// Incident API
#[derive(Debug, Clone, Copy)]
pub struct Incident<'a> {
    http: &'a HttpClient,
}

impl<'a> Incident<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn create(&self, incident: &IncidentRequest) -> Result<JsonValue> {
        let request = ApiRequest::post(INCIDENTS_PATH).json(envelope("incident", incident)?);
        self.http.request_json(&request).await
    }

    pub async fn get(&self, incident_id: &str) -> Result<JsonValue> {
        self.http
            .get_json(&format!("{INCIDENTS_PATH}/{incident_id}"))
            .await
    }

    pub async fn update(&self, incident_id: &str, incident: &IncidentRequest) -> Result<JsonValue> {
        let request = ApiRequest::put(format!("{INCIDENTS_PATH}/{incident_id}"))
            .json(envelope("incident", incident)?);
        self.http.request_json(&request).await
    }

    pub async fn close(&self, incident_id: &str) -> Result<JsonValue> {
        let request =
            ApiRequest::put(format!("{INCIDENTS_PATH}/{incident_id}/close")).json(json!({}));
        self.http.request_json(&request).await
    }

    /// Restart a closed incident with fresh state and a new expiry
    pub async fn restart(&self, incident_id: &str) -> Result<JsonValue> {
        let request =
            ApiRequest::put(format!("{INCIDENTS_PATH}/{incident_id}/restart")).json(json!({}));
        self.http.request_json(&request).await
    }

    pub async fn copy(&self, incident_id: &str) -> Result<JsonValue> {
        let request =
            ApiRequest::post(format!("{INCIDENTS_PATH}/{incident_id}/copy")).json(json!({}));
        self.http.request_json(&request).await
    }

    /// Copy an incident together with its history
    pub async fn fork(&self, incident_id: &str) -> Result<JsonValue> {
        let request =
            ApiRequest::post(format!("{INCIDENTS_PATH}/{incident_id}/fork")).json(json!({}));
        self.http.request_json(&request).await
    }

    pub async fn get_watchable_attributes(&self) -> Result<JsonValue> {
        self.http.get_json("/api/v1/user/watchableAttributes").await
    }

    pub async fn get_states(&self, incident_id: &str) -> Result<JsonValue> {
        self.http
            .get_json(&format!("/api/v1/user/incidentstates/{incident_id}/"))
            .await
    }
}
