//! Notification channels

use super::envelope;
use crate::error::Result;
use crate::http::{ApiRequest, HttpClient};
use crate::types::{ChannelType, Frequency, JsonValue, TeamPermission, WeekDay};
use serde::Serialize;

const CHANNELS_PATH: &str = "/api/v1/user/channels/";

/// Channel definition for create and update
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRequest {
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub name: String,

    /// Required for webhook channels
    #[serde(rename = "webhookURL", skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,

    /// Required for email channels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_addresses: Option<Vec<String>>,

    /// 24 hour UTC time daily emails are sent at, e.g. `09:00`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_time: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_days: Option<Vec<WeekDay>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<TeamPermission>>,
}

impl ChannelRequest {
    pub fn new(channel_type: ChannelType, name: impl Into<String>) -> Self {
        Self {
            channel_type,
            name: name.into(),
            webhook_url: None,
            frequency: None,
            email_addresses: None,
            utc_time: None,
            is_active: None,
            is_default: None,
            ignore_time: None,
            week_days: None,
            permissions: None,
        }
    }

    /// A webhook channel posting to `url`
    pub fn webhook(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            webhook_url: Some(url.into()),
            ..Self::new(ChannelType::Webhook, name)
        }
    }

    /// An email channel notifying `addresses`
    pub fn email(name: impl Into<String>, addresses: Vec<String>) -> Self {
        Self {
            email_addresses: Some(addresses),
            ..Self::new(ChannelType::Email, name)
        }
    }
}

/// Channel API
#[derive(Debug, Clone, Copy)]
pub struct Channel<'a> {
    http: &'a HttpClient,
}

impl<'a> Channel<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn get_channels(&self) -> Result<JsonValue> {
        self.http.get_json(CHANNELS_PATH).await
    }

    pub async fn create(&self, channel: &ChannelRequest) -> Result<JsonValue> {
        let request = ApiRequest::post(CHANNELS_PATH).json(envelope("channel", channel)?);
        self.http.request_json(&request).await
    }

    pub async fn get(&self, channel_id: &str) -> Result<JsonValue> {
        self.http.get_json(&format!("{CHANNELS_PATH}{channel_id}/")).await
    }

    pub async fn update(&self, channel_id: &str, channel: &ChannelRequest) -> Result<JsonValue> {
        let request = ApiRequest::put(format!("{CHANNELS_PATH}{channel_id}/"))
            .json(envelope("channel", channel)?);
        self.http.request_json(&request).await
    }
}
