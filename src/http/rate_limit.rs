//! Rate limit bookkeeping
//!
//! The service reports per-category quotas in response headers. The
//! dispatcher remembers the last observation for each category and uses
//! it to refuse calls locally while a quota is known to be exhausted.

use crate::error::{Error, Result};
use crate::types::ActionCategory;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use std::collections::HashMap;
use tracing::warn;

/// Category the quota in this response belongs to
pub const HEADER_ACTION: &str = "x-rate-limit-action";
/// Calls left in the current window
pub const HEADER_REMAINING: &str = "x-rate-limit-remaining";
/// Absolute reset time (ISO-8601, UTC)
pub const HEADER_RESET: &str = "x-rate-limit-reset";
/// Seconds until reset, sent with 429 responses
pub const HEADER_RESET_AFTER: &str = "x-rate-limit-reset-after";

/// Last observed quota for one action category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitState {
    pub remaining: u64,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitState {
    /// Whether this state forbids a call at `now`
    pub fn is_exhausted_at(&self, now: DateTime<Utc>) -> bool {
        self.remaining == 0 && self.reset_at > now
    }
}

/// Per-category rate limit memo
///
/// Entries are overwritten on every observation, so an out-of-order
/// response can replace a newer, more permissive state.
#[derive(Debug, Clone, Default)]
pub struct RateLimitMemo {
    states: HashMap<ActionCategory, RateLimitState>,
}

impl RateLimitMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: ActionCategory) -> Option<&RateLimitState> {
        self.states.get(&category)
    }

    /// Record an observation, replacing any previous state for the category
    pub fn record(&mut self, category: ActionCategory, state: RateLimitState) {
        self.states.insert(category, state);
    }

    /// Pre-flight check for a call in `category` at `now`
    pub fn check(&self, category: ActionCategory, now: DateTime<Utc>) -> Result<()> {
        match self.states.get(&category) {
            Some(state) if state.is_exhausted_at(now) => Err(Error::RateLimitRemaining {
                category,
                reset_at: state.reset_at,
            }),
            _ => Ok(()),
        }
    }

    /// Update from response headers; returns the category that was written
    pub fn observe(&mut self, headers: &HeaderMap) -> Option<ActionCategory> {
        let (category, state) = parse_rate_limit_headers(headers)?;
        self.record(category, state);
        Some(category)
    }
}

/// Extract `(category, state)` from the rate limit headers, if all are present
pub fn parse_rate_limit_headers(headers: &HeaderMap) -> Option<(ActionCategory, RateLimitState)> {
    let action = header_str(headers, HEADER_ACTION)?;
    let remaining = header_str(headers, HEADER_REMAINING)?;
    let reset = header_str(headers, HEADER_RESET)?;

    let Some(category) = ActionCategory::parse(action) else {
        warn!("Ignoring rate limit headers for unknown action '{action}'");
        return None;
    };

    let remaining = match remaining.trim().parse::<u64>() {
        Ok(n) => n,
        Err(e) => {
            warn!("Ignoring unparseable {HEADER_REMAINING} '{remaining}': {e}");
            return None;
        }
    };

    let reset_at = match parse_reset(reset) {
        Some(t) => t,
        None => {
            warn!("Ignoring unparseable {HEADER_RESET} '{reset}'");
            return None;
        }
    };

    Some((category, RateLimitState { remaining, reset_at }))
}

/// Seconds until reset from a 429 response, if the header is present
pub fn parse_reset_after(headers: &HeaderMap) -> Option<f64> {
    header_str(headers, HEADER_RESET_AFTER)?
        .trim()
        .parse::<f64>()
        .ok()
}

/// Parse the reset timestamp, e.g. `2020-01-02T00:00:00.000Z`
fn parse_reset(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
