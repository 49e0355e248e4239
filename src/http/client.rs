//! Rate limit aware dispatcher
//!
//! Sends one [`ApiRequest`] under the configured [`RetryMode`]:
//! - `Local`: refuse before sending when the memoized quota for the
//!   request's category is exhausted, and record the quota reported by
//!   every response
//! - `Automatic`: sleep and resend on every 429 that says how long to wait
//!
//! Failed responses are turned into typed errors in both modes.

use super::problem::error_from_response;
use super::rate_limit::{parse_reset_after, RateLimitMemo, RateLimitState};
use super::request::ApiRequest;
use crate::config::{ClientConfig, RetryMode};
use crate::error::{seconds_to_duration, Error, Result};
use crate::types::ActionCategory;
use bytes::Bytes;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, Proxy, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "api-key";

/// HTTP session with rate limit bookkeeping
///
/// Clones share the same connection pool and rate limit memo.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
    rate_limits: Arc<RwLock<RateLimitMemo>>,
    retries: Arc<AtomicU64>,
}

impl HttpClient {
    /// Create a client from a config
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = build_reqwest_client(&config)?;

        Ok(Self {
            client,
            config,
            rate_limits: Arc::new(RwLock::new(RateLimitMemo::new())),
            retries: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Get the client config
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Send a request under the configured rate limit policy
    ///
    /// The response is returned whatever its status; see [`Self::send_ok`].
    pub async fn send(&self, request: &ApiRequest) -> Result<Response> {
        match self.config.retry {
            RetryMode::Automatic => self.send_with_retry(request).await,
            RetryMode::Local => self.send_checked(request).await,
        }
    }

    /// Send a request and turn a failed response into a typed error
    pub async fn send_ok(&self, request: &ApiRequest) -> Result<Response> {
        let response = self.send(request).await?;
        ensure_success(response).await
    }

    /// Send a request and parse the JSON response
    pub async fn request_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let response = self.send_ok(request).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send a request and return the body as text
    pub async fn request_text(&self, request: &ApiRequest) -> Result<String> {
        let response = self.send_ok(request).await?;
        Ok(response.text().await?)
    }

    /// Send a request and return the raw body
    pub async fn request_bytes(&self, request: &ApiRequest) -> Result<Bytes> {
        let response = self.send_ok(request).await?;
        Ok(response.bytes().await?)
    }

    /// Make a GET request and parse JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request_json(&ApiRequest::get(path)).await
    }

    /// Stream a response body into `writer`, returning the number of bytes written
    pub async fn download<W>(&self, request: &ApiRequest, writer: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut response = self.send_ok(request).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;
        debug!("Downloaded {} bytes from {}", written, request.path());
        Ok(written)
    }

    /// Last observed quota for a category
    pub async fn rate_limit(&self, category: ActionCategory) -> Option<RateLimitState> {
        self.rate_limits.read().await.get(category).copied()
    }

    /// Number of 429 responses that were waited out and resent
    pub fn rate_limit_retries(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }

    /// Pre-flight check, send, then record the reported quota
    async fn send_checked(&self, request: &ApiRequest) -> Result<Response> {
        if let Some(category) = request.action_category() {
            let memo = self.rate_limits.read().await;
            if let Err(e) = memo.check(category, Utc::now()) {
                debug!("Refusing {} {}: {}", request.method(), request.path(), e);
                return Err(e);
            }
        }

        let response = self.execute(request).await?;

        // The category named by the service wins over the one we inferred
        let mut memo = self.rate_limits.write().await;
        if let Some(category) = memo.observe(response.headers()) {
            if let Some(state) = memo.get(category) {
                debug!(
                    "Rate limit for {}: {} remaining until {}",
                    category, state.remaining, state.reset_at
                );
            }
        }
        drop(memo);

        Ok(response)
    }

    /// Resend on 429 for as long as the service supplies a reset delay
    async fn send_with_retry(&self, request: &ApiRequest) -> Result<Response> {
        let mut attempt: u64 = 0;
        loop {
            let response = self.execute(request).await?;
            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            let Some(reset_after) = parse_reset_after(response.headers()) else {
                return Ok(response);
            };
            drop(response);

            attempt += 1;
            self.retries.fetch_add(1, Ordering::Relaxed);
            info!(
                "Rate limited on {} {}, waiting {}s before retry #{}",
                request.method(),
                request.path(),
                reset_after,
                attempt
            );
            tokio::time::sleep(seconds_to_duration(reset_after)).await;
        }
    }

    /// Put one request on the wire
    async fn execute(&self, request: &ApiRequest) -> Result<Response> {
        let url = self.build_url(request.path())?;
        let mut req = self.client.request(request.method().clone(), url);

        if !request.query_params().is_empty() {
            req = req.query(request.query_params());
        }

        if let Some(body) = request.body() {
            req = req.json(body);
        }

        let response = req.send().await?;
        debug!(
            "{} {} -> {}",
            request.method(),
            request.path(),
            response.status().as_u16()
        );
        Ok(response)
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> Result<url::Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(url::Url::parse(path)?);
        }

        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(url::Url::parse(&format!("{base}/{path}"))?)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("retry", &self.config.retry)
            .field("has_api_key", &self.config.api_key.is_some())
            .finish_non_exhaustive()
    }
}

/// Pass a 2xx response through, map anything else to a typed error
pub async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let headers = response.headers().clone();
    let body = response.bytes().await?;
    Err(error_from_response(status, &headers, &body))
}

fn build_reqwest_client(config: &ClientConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    if let Some(key) = &config.api_key {
        let mut value = HeaderValue::from_str(key)
            .map_err(|_| Error::config("API key contains characters not allowed in a header"))?;
        value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, value);
    }

    let redirect = if config.follow_redirects {
        Policy::default()
    } else {
        Policy::none()
    };

    let mut builder = Client::builder()
        .timeout(config.timeout())
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .redirect(redirect)
        .danger_accept_invalid_certs(!config.verify_tls);

    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(Proxy::all(proxy)?);
    } else if !config.trust_env {
        builder = builder.no_proxy();
    }

    Ok(builder.build()?)
}
