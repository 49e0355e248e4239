//! Pagination strategy implementations
//!
//! Each strategy handles one of the service's pagination contracts.

use super::types::{sort_token, take_results, PaginationState, Paginator, MAX_TOTAL};
use crate::error::{Error, Result};
use crate::types::{QueryParams, SearchDataSource};
use serde_json::Value;

// ============================================================================
// Search After Pagination
// ============================================================================

/// Sort-key pagination used by the search endpoints
///
/// Sends `q`, `size`, `search_after`, `datasource` and `collapse`. The
/// next `search_after` is the last item's `sort` array joined with `,`.
#[derive(Debug, Clone)]
pub struct SearchAfterPaginator {
    pub q: Option<String>,
    pub size: u32,
    pub datasource: Option<SearchDataSource>,
    pub collapse: Option<String>,
}

impl SearchAfterPaginator {
    /// Create a new search paginator
    pub fn new(q: Option<String>, size: u32) -> Self {
        Self {
            q,
            size,
            datasource: None,
            collapse: None,
        }
    }

    /// Restrict the search to one datasource
    #[must_use]
    pub fn datasource(mut self, datasource: Option<SearchDataSource>) -> Self {
        self.datasource = datasource;
        self
    }

    /// Collapse results on a field
    #[must_use]
    pub fn collapse(mut self, collapse: Option<String>) -> Self {
        self.collapse = collapse;
        self
    }

    fn page_is_full(&self, page_len: usize) -> bool {
        page_len >= self.size as usize
    }
}

impl Paginator for SearchAfterPaginator {
    fn query_params(&self, state: &PaginationState) -> QueryParams {
        let mut params = Vec::new();
        if let Some(q) = &self.q {
            params.push(("q".to_string(), q.clone()));
        }
        params.push(("size".to_string(), self.size.to_string()));
        if let Some(cursor) = &state.cursor {
            params.push(("search_after".to_string(), cursor.clone()));
        }
        if let Some(datasource) = self.datasource {
            params.push(("datasource".to_string(), datasource.as_str().to_string()));
        }
        if let Some(collapse) = &self.collapse {
            params.push(("collapse".to_string(), collapse.clone()));
        }
        params
    }

    fn process_page(&self, mut body: Value, state: &mut PaginationState) -> Result<Vec<Value>> {
        let page = take_results(&mut body)?;
        let page_len = page.len();

        // A page that cannot be continued leaves the state untouched
        let token = page.last().map(sort_token).transpose()?;

        state.has_more = match body.get("total").and_then(Value::as_u64) {
            Some(total) => {
                let total = state.observe_total(total);
                if total == MAX_TOTAL {
                    self.page_is_full(page_len)
                } else {
                    total > state.emitted + page_len as u64
                }
            }
            None => match body.get("has_more").and_then(Value::as_bool) {
                Some(has_more) => has_more,
                None => self.page_is_full(page_len),
            },
        };

        if let Some(token) = token {
            state.set_cursor(token);
        }

        Ok(page)
    }
}

// ============================================================================
// Page State Pagination
// ============================================================================

/// Opaque page-state pagination used by hostname history
///
/// Sends `limit` and `pageState`; more pages remain for as long as the
/// response carries a non-null `pageState`.
#[derive(Debug, Clone)]
pub struct PageStatePaginator {
    pub limit: u32,
}

impl PageStatePaginator {
    /// Create a new page state paginator
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }
}

impl Paginator for PageStatePaginator {
    fn query_params(&self, state: &PaginationState) -> QueryParams {
        let mut params = vec![("limit".to_string(), self.limit.to_string())];
        if let Some(page_state) = &state.cursor {
            params.push(("pageState".to_string(), page_state.clone()));
        }
        params
    }

    fn process_page(&self, mut body: Value, state: &mut PaginationState) -> Result<Vec<Value>> {
        let page = take_results(&mut body)?;

        match body.get("pageState") {
            None | Some(Value::Null) => {
                state.cursor = None;
                state.has_more = false;
            }
            Some(Value::String(token)) => {
                state.set_cursor(token.clone());
                state.has_more = true;
            }
            Some(other) => {
                return Err(Error::decode(format!(
                    "Expected 'pageState' to be a string, got {other}"
                )))
            }
        }

        Ok(page)
    }
}
