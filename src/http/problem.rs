//! Error payload decoding
//!
//! Failed responses carry a JSON problem document:
//!
//! ```json
//! {
//!   "message": "DNS Error - Could not resolve domain",
//!   "description": "...",
//!   "status": 400,
//!   "errors": [{"title": "...", "detail": "...", "status": 400}]
//! }
//! ```

use super::rate_limit::parse_reset_after;
use crate::error::{ApiError, Error, ItemError, RateLimitError};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Problem {
    message: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    errors: Option<Vec<ProblemItem>>,
}

#[derive(Debug, Deserialize)]
struct ProblemItem {
    title: String,
    status: u16,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl From<ProblemItem> for ItemError {
    fn from(item: ProblemItem) -> Self {
        Self {
            title: item.title,
            status: item.status,
            code: item.code,
            description: item.description,
            detail: item.detail,
        }
    }
}

/// Build the typed error for a failed response
///
/// A body that is not a problem document is reported as [`Error::Decode`].
pub fn error_from_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Error {
    let problem: Problem = match serde_json::from_slice(body) {
        Ok(problem) => problem,
        Err(e) => {
            return Error::decode(format!(
                "HTTP {} with unexpected error payload: {e}",
                status.as_u16()
            ))
        }
    };

    // The payload status wins; fall back to the HTTP status when missing
    let status = match problem.status {
        Some(s) if s != 0 => s,
        _ => status.as_u16(),
    };

    if status == StatusCode::TOO_MANY_REQUESTS.as_u16() {
        return Error::RateLimited(RateLimitError {
            message: problem.message,
            status,
            description: problem.description,
            reset_after: parse_reset_after(headers).unwrap_or(0.0),
        });
    }

    Error::Api(ApiError {
        message: problem.message,
        status,
        description: problem.description,
        code: problem.code,
        kind: problem.kind,
        errors: problem
            .errors
            .map(|items| items.into_iter().map(ItemError::from).collect()),
    })
}

#[cfg(test)]
mod problem_tests {
    use super::*;
    use crate::http::rate_limit::HEADER_RESET_AFTER;
    use pretty_assertions::assert_eq;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_api_error_with_items() {
        let payload = body(json!({
            "message": "DNS Error - Could not resolve domain",
            "description": "The domain foo.bar could not be resolved",
            "status": 400,
            "errors": [{
                "title": "DNS Error - Could not resolve domain",
                "detail": "The domain foo.bar could not be resolved",
                "status": 400
            }]
        }));

        let err = error_from_response(StatusCode::BAD_REQUEST, &HeaderMap::new(), &payload);
        let Error::Api(api) = err else {
            panic!("Expected Api error");
        };
        assert_eq!(api.status, 400);
        assert_eq!(
            api.description.as_deref(),
            Some("The domain foo.bar could not be resolved")
        );
        assert_eq!(
            api.errors,
            Some(vec![ItemError {
                title: "DNS Error - Could not resolve domain".to_string(),
                status: 400,
                code: None,
                description: None,
                detail: Some("The domain foo.bar could not be resolved".to_string()),
            }])
        );
    }

    #[test]
    fn test_validation_error_code_and_type() {
        let payload = body(json!({
            "code": "validationerror",
            "type": "body",
            "message": "ValidationError: \"url\" is required",
            "errors": [{
                "code": "validationerror",
                "title": "Field Validation Error",
                "description": "ValidationError: \"url\" is required",
                "status": 400
            }]
        }));

        let err = error_from_response(StatusCode::BAD_REQUEST, &HeaderMap::new(), &payload);
        let Error::Api(api) = err else {
            panic!("Expected Api error");
        };
        // No status in payload: falls back to HTTP status
        assert_eq!(api.status, 400);
        assert_eq!(api.code.as_deref(), Some("validationerror"));
        assert_eq!(api.kind.as_deref(), Some("body"));
        let items = api.errors.unwrap();
        assert_eq!(items[0].code.as_deref(), Some("validationerror"));
        assert_eq!(items[0].title, "Field Validation Error");
    }

    #[test]
    fn test_rate_limit_error_reads_reset_after() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_RESET_AFTER, HeaderValue::from_static("17"));
        let payload = body(json!({"message": "Rate limit exceeded", "status": 429}));

        let err = error_from_response(StatusCode::TOO_MANY_REQUESTS, &headers, &payload);
        let Error::RateLimited(rl) = err else {
            panic!("Expected RateLimited");
        };
        assert_eq!(rl.message, "Rate limit exceeded");
        assert_eq!(rl.status, 429);
        assert!((rl.reset_after - 17.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rate_limit_error_defaults_reset_after_to_zero() {
        let payload = body(json!({"message": "Rate limit exceeded"}));
        let err = error_from_response(StatusCode::TOO_MANY_REQUESTS, &HeaderMap::new(), &payload);
        let Error::RateLimited(rl) = err else {
            panic!("Expected RateLimited");
        };
        assert!(rl.reset_after.abs() < f64::EPSILON);
    }

    #[test]
    fn test_unparseable_payload_is_decode_error() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, &HeaderMap::new(), b"<html>");
        assert!(matches!(err, Error::Decode { .. }));

        // "message" is required
        let payload = body(json!({"status": 400, "description": "no message"}));
        let err = error_from_response(StatusCode::BAD_REQUEST, &HeaderMap::new(), &payload);
        assert!(matches!(err, Error::Decode { .. }));
    }
}
