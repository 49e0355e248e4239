//! Common types used throughout the client
//!
//! Shared enums for the service's fixed vocabularies (visibility,
//! datasources, rate limit categories) plus a few type aliases.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Query parameters in insertion order
pub type QueryParams = Vec<(String, String)>;

// ============================================================================
// Scan Visibility
// ============================================================================

/// Visibility of a submitted scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Unlisted,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Unlisted => "unlisted",
        }
    }

    /// Parse a visibility from its wire value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            "unlisted" => Some(Self::Unlisted),
            _ => None,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility values accepted when changing an existing scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateVisibility {
    Public,
    Private,
    Unlisted,
    Deleted,
}

// ============================================================================
// Rate Limit Categories
// ============================================================================

/// Bucket the service uses for rate limit quotas
///
/// Reported back in the `X-Rate-Limit-Action` response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Public,
    Private,
    Unlisted,
    Retrieve,
    Search,
}

impl ActionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Unlisted => "unlisted",
            Self::Retrieve => "retrieve",
            Self::Search => "search",
        }
    }

    /// Parse a category from the `X-Rate-Limit-Action` header value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            "unlisted" => Some(Self::Unlisted),
            "retrieve" => Some(Self::Retrieve),
            "search" => Some(Self::Search),
            _ => None,
        }
    }
}

impl From<Visibility> for ActionCategory {
    fn from(visibility: Visibility) -> Self {
        match visibility {
            Visibility::Public => Self::Public,
            Visibility::Private => Self::Private,
            Visibility::Unlisted => Self::Unlisted,
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Search
// ============================================================================

/// Datasources accepted by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchDataSource {
    Scans,
    Hostnames,
    Incidents,
    Notifications,
    Certificates,
}

impl SearchDataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scans => "scans",
            Self::Hostnames => "hostnames",
            Self::Incidents => "incidents",
            Self::Notifications => "notifications",
            Self::Certificates => "certificates",
        }
    }
}

/// Datasources a saved search can operate on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavedSearchDataSource {
    Hostnames,
    Scans,
}

// ============================================================================
// Pro Vocabularies
// ============================================================================

/// Traffic Light Protocol marking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tlp {
    #[serde(rename = "red")]
    Red,
    #[serde(rename = "amber+strict")]
    AmberStrict,
    #[serde(rename = "amber")]
    Amber,
    #[serde(rename = "green")]
    Green,
    #[serde(rename = "clear")]
    Clear,
}

/// Sharing permission for saved searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "public:read")]
    PublicRead,
    #[serde(rename = "team:read")]
    TeamRead,
    #[serde(rename = "team:write")]
    TeamWrite,
}

/// Sharing permission for subscriptions and channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamPermission {
    #[serde(rename = "team:read")]
    TeamRead,
    #[serde(rename = "team:write")]
    TeamWrite,
}

/// Notification frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Live,
    Hourly,
    Daily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Notification channel transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Webhook,
    Email,
}

/// Visibility of scans triggered by an incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentVisibility {
    Unlisted,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncidentCreationMode {
    None,
    Default,
    Always,
    IgnoreIfExists,
}

/// Source/key pair an incident watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncidentWatchKey {
    #[serde(rename = "scans/page.url")]
    ScansPageUrl,
    #[serde(rename = "scans/page.domain")]
    ScansPageDomain,
    #[serde(rename = "scans/page.ip")]
    ScansPageIp,
    #[serde(rename = "scans/page.apexDomain")]
    ScansPageApexDomain,
    #[serde(rename = "hostnames/hostname")]
    HostnamesHostname,
    #[serde(rename = "hostnames/ip")]
    HostnamesIp,
    #[serde(rename = "hostnames/domain")]
    HostnamesDomain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanIntervalMode {
    Automatic,
    Manual,
}

/// Attributes an incident monitors for changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchedAttribute {
    Detections,
    Tls,
    Dns,
    Labels,
    Page,
    Meta,
    Ip,
}

/// Resource kinds served by a live scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveScanResourceType {
    Result,
    Screenshot,
    Dom,
    Response,
    Download,
}

impl LiveScanResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Result => "result",
            Self::Screenshot => "screenshot",
            Self::Dom => "dom",
            Self::Response => "response",
            Self::Download => "download",
        }
    }
}
