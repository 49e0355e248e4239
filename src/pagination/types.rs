//! Pagination types and traits
//!
//! Defines the state shared by every cursor and the trait each
//! pagination contract implements.

use crate::error::{Error, Result};
use crate::types::QueryParams;
use serde_json::Value;

/// Deepest position the search endpoint reports a total for
///
/// A first page reporting exactly this total may have more results
/// behind it than the count says.
pub const MAX_TOTAL: u64 = 10_000;

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Continuation token for the next request
    pub cursor: Option<String>,
    /// Items handed to the caller so far
    pub emitted: u64,
    /// Total reported by the first page, never updated afterwards
    pub total: Option<u64>,
    /// Whether the last page indicated more results
    pub has_more: bool,
    /// Sticky end-of-sequence flag
    pub done: bool,
    /// Pages fetched so far; a page that fails to process is not counted
    pub requests: u64,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state resuming from a continuation token
    pub fn with_cursor(cursor: Option<String>) -> Self {
        Self {
            cursor,
            ..Default::default()
        }
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Set cursor
    pub fn set_cursor(&mut self, cursor: String) {
        self.cursor = Some(cursor);
    }

    /// Record the first total seen; later totals are ignored
    pub fn observe_total(&mut self, total: u64) -> u64 {
        *self.total.get_or_insert(total)
    }

    /// Whether another page should be requested once the buffer is empty
    pub fn should_fetch(&self) -> bool {
        !self.done && (self.requests == 0 || self.has_more)
    }
}

/// Core trait for pagination contracts
pub trait Paginator: Send + Sync {
    /// Query parameters for the next request
    fn query_params(&self, state: &PaginationState) -> QueryParams;

    /// Extract one page of items from a response body and advance `state`
    ///
    /// Called with an empty buffer, so `state.emitted` counts every item
    /// taken before this page.
    fn process_page(&self, body: Value, state: &mut PaginationState) -> Result<Vec<Value>>;
}

/// Pull the `results` array out of a page body
pub(crate) fn take_results(body: &mut Value) -> Result<Vec<Value>> {
    match body.get_mut("results").map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(Error::decode(format!(
            "Expected 'results' to be an array, got {other}"
        ))),
        None => Err(Error::decode("Response is missing 'results'")),
    }
}

/// Build the continuation token from an item's `sort` key
///
/// Components are joined with `,`; strings are used verbatim and numbers
/// in their decimal form.
pub fn sort_token(item: &Value) -> Result<String> {
    let sort = item
        .get("sort")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::decode("Search result is missing its 'sort' key"))?;

    let parts: Vec<String> = sort
        .iter()
        .map(|component| match component {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();

    Ok(parts.join(","))
}
