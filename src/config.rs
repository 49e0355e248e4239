//! Client configuration
//!
//! Settings for the HTTP session shared by every endpoint: credentials,
//! base URL, transport options and the rate limit policy. Configs can be
//! assembled with the builder or loaded from YAML.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default service endpoint
pub const DEFAULT_BASE_URL: &str = "https://urlscan.io";

/// How the dispatcher reacts to rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RetryMode {
    /// Refuse locally when the memoized quota is exhausted; surface 429s as errors
    #[default]
    Local,
    /// Sleep for `X-Rate-Limit-Reset-After` seconds and resend on every 429
    Automatic,
}

/// Configuration for the API client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key sent in the `API-Key` header
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Proxy URL all traffic is routed through
    #[serde(default)]
    pub proxy: Option<String>,

    /// Verify TLS certificates
    #[serde(default = "default_true")]
    pub verify_tls: bool,

    #[serde(default = "default_true")]
    pub follow_redirects: bool,

    /// Honour proxy settings from the environment
    #[serde(default)]
    pub trust_env: bool,

    #[serde(default)]
    pub retry: RetryMode,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("urlscan-rs/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
            proxy: None,
            verify_tls: true,
            follow_redirects: true,
            trust_env: false,
            retry: RetryMode::Local,
        }
    }
}

impl ClientConfig {
    /// Create a config with the given API key and defaults for everything else
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("Invalid base_url '{}': {e}", self.base_url)))?;

        if let Some(proxy) = &self.proxy {
            url::Url::parse(proxy)
                .map_err(|e| Error::config(format!("Invalid proxy '{proxy}': {e}")))?;
        }

        if self.timeout_seconds == 0 {
            return Err(Error::config("timeout_seconds must be greater than zero"));
        }

        Ok(())
    }
}

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_seconds = timeout.as_secs().max(1);
        self
    }

    /// Route all traffic through a proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    /// Enable or disable TLS certificate verification
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.config.verify_tls = verify;
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.config.follow_redirects = follow;
        self
    }

    pub fn trust_env(mut self, trust: bool) -> Self {
        self.config.trust_env = trust;
        self
    }

    /// Set the rate limit policy
    pub fn retry(mut self, mode: RetryMode) -> Self {
        self.config.retry = mode;
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://urlscan.io");
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(config.api_key.is_none());
        assert!(config.verify_tls);
        assert!(config.follow_redirects);
        assert!(!config.trust_env);
        assert_eq!(config.retry, RetryMode::Local);
        assert!(config.user_agent.starts_with("urlscan-rs/"));
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::builder()
            .api_key("secret")
            .base_url("http://localhost:8080")
            .timeout(Duration::from_secs(5))
            .proxy("http://proxy.local:3128")
            .verify_tls(false)
            .follow_redirects(false)
            .retry(RetryMode::Automatic)
            .user_agent("test-agent/1.0")
            .build();

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.proxy.as_deref(), Some("http://proxy.local:3128"));
        assert!(!config.verify_tls);
        assert!(!config.follow_redirects);
        assert_eq!(config.retry, RetryMode::Automatic);
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r"
api_key: abc123
timeout_seconds: 15
retry: automatic
";
        let config = ClientConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.timeout_seconds, 15);
        assert_eq!(config.retry, RetryMode::Automatic);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.verify_tls);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let err = ClientConfig::from_yaml_str("base_url: not a url").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = ClientConfig::from_yaml_str("timeout_seconds: 0").unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));

        let err = ClientConfig::from_yaml_str("retry: sometimes").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key: from-file\nverify_tls: false").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert!(!config.verify_tls);

        let missing = ClientConfig::from_file("/definitely/not/here.yaml");
        assert!(matches!(missing, Err(Error::Config { .. })));
    }
}
