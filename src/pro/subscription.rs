//! Subscriptions: notifications for saved search matches

use super::envelope;
use crate::error::Result;
use crate::http::{ApiRequest, HttpClient};
use crate::types::{
    Frequency, IncidentCreationMode, IncidentVisibility, IncidentWatchKey, JsonValue,
    TeamPermission, WeekDay,
};
use serde::Serialize;

const SUBSCRIPTIONS_PATH: &str = "/api/v1/user/subscriptions/";

/// Subscription definition for create and update
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    /// Saved searches this subscription follows
    pub search_ids: Vec<String>,
    pub frequency: Frequency,
    pub email_addresses: Vec<String>,
    pub name: String,
    pub is_active: bool,
    pub ignore_time: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_days: Option<Vec<WeekDay>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<TeamPermission>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_ids: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_channel_ids: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_profile_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_visibility: Option<IncidentVisibility>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_creation_mode: Option<IncidentCreationMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_watch_keys: Option<IncidentWatchKey>,
}

impl SubscriptionRequest {
    pub fn new(
        name: impl Into<String>,
        search_ids: Vec<String>,
        frequency: Frequency,
        email_addresses: Vec<String>,
    ) -> Self {
        Self {
            search_ids,
            frequency,
            email_addresses,
            name: name.into(),
            is_active: true,
            ignore_time: false,
            description: None,
            week_days: None,
            permissions: None,
            channel_ids: None,
            incident_channel_ids: None,
            incident_profile_id: None,
            incident_visibility: None,
            incident_creation_mode: None,
            incident_watch_keys: None,
        }
    }
}

/// Subscription API
#[derive(Debug, Clone, Copy)]
pub struct Subscription<'a> {
    http: &'a HttpClient,
}

impl<'a> Subscription<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn get_subscriptions(&self) -> Result<JsonValue> {
        self.http.get_json(SUBSCRIPTIONS_PATH).await
    }

    pub async fn create(&self, subscription: &SubscriptionRequest) -> Result<JsonValue> {
        let request =
            ApiRequest::post(SUBSCRIPTIONS_PATH).json(envelope("subscription", subscription)?);
        self.http.request_json(&request).await
    }

    pub async fn update(
        &self,
        subscription_id: &str,
        subscription: &SubscriptionRequest,
    ) -> Result<JsonValue> {
        let request = ApiRequest::put(format!("{SUBSCRIPTIONS_PATH}{subscription_id}/"))
            .json(envelope("subscription", subscription)?);
        self.http.request_json(&request).await
    }

    pub async fn delete_subscription(&self, subscription_id: &str) -> Result<JsonValue> {
        let request = ApiRequest::delete(format!("{SUBSCRIPTIONS_PATH}{subscription_id}/"));
        self.http.request_json(&request).await
    }

    /// Matches delivered for a subscription, e.g. for the `scans` datasource
    pub async fn get_results(&self, subscription_id: &str, datasource: &str) -> Result<JsonValue> {
        self.http
            .get_json(&format!(
                "{SUBSCRIPTIONS_PATH}{subscription_id}/results/{datasource}/"
            ))
            .await
    }
}
