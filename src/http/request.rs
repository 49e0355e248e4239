//! Outbound request description
//!
//! An [`ApiRequest`] is built once per call and can be replayed any
//! number of times by the dispatcher. Its rate limit category is decided
//! when the request is constructed so the dispatcher never has to look
//! inside the body again.

use crate::types::{ActionCategory, QueryParams, Visibility};
use reqwest::Method;
use serde_json::Value;

/// Search endpoint
pub const SEARCH_PATH: &str = "/api/v1/search/";
/// Prefix of the per-result endpoint
pub const RESULT_PATH_PREFIX: &str = "/api/v1/result/";
/// Scan submission endpoint
pub const SCAN_PATH: &str = "/api/v1/scan/";

/// A request against the API, relative to the configured base URL
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: QueryParams,
    body: Option<Value>,
    category: Option<ActionCategory>,
}

impl ApiRequest {
    /// Create a request and classify it from its method and path
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let category = classify(&method, &path, None);
        Self {
            method,
            path,
            query: Vec::new(),
            body: None,
            category,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn head(path: impl Into<String>) -> Self {
        Self::new(Method::HEAD, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a query parameter when the value is present
    #[must_use]
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Set JSON body and reclassify
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.category = classify(&self.method, &self.path, Some(&body));
        self.body = Some(body);
        self
    }

    /// Override the inferred rate limit category
    #[must_use]
    pub fn category(mut self, category: Option<ActionCategory>) -> Self {
        self.category = category;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Rate limit category this request is counted against, if known
    pub fn action_category(&self) -> Option<ActionCategory> {
        self.category
    }
}

/// Map a request shape to the quota bucket the service charges it to
///
/// | method | path                 | category               |
/// |--------|----------------------|------------------------|
/// | GET    | `/api/v1/search/`    | `search`               |
/// | GET    | `/api/v1/result/...` | `retrieve`             |
/// | POST   | `/api/v1/scan/`      | body `visibility` field |
pub fn classify(method: &Method, path: &str, body: Option<&Value>) -> Option<ActionCategory> {
    if *method == Method::GET {
        if path == SEARCH_PATH {
            return Some(ActionCategory::Search);
        }
        if path.starts_with(RESULT_PATH_PREFIX) {
            return Some(ActionCategory::Retrieve);
        }
        return None;
    }

    if *method == Method::POST && path == SCAN_PATH {
        return body
            .and_then(|b| b.get("visibility"))
            .and_then(Value::as_str)
            .and_then(Visibility::parse)
            .map(ActionCategory::from);
    }

    None
}
