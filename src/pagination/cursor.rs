//! Lazy, pull-based cursor over a paginated endpoint

use super::strategies::{PageStatePaginator, SearchAfterPaginator};
use super::types::{PaginationState, Paginator};
use crate::error::Result;
use crate::http::{ApiRequest, HttpClient};
use futures::stream::{self, Stream};
use serde_json::Value;
use std::collections::VecDeque;
use tracing::debug;

/// Cursor over the search endpoints
pub type SearchCursor = ResultCursor<SearchAfterPaginator>;

/// Cursor over hostname history
pub type HostnameCursor = ResultCursor<PageStatePaginator>;

/// Forward-only sequence of result items
///
/// Pages are requested only when the local buffer runs dry. Items come
/// out in the order the service returned them. Once the sequence has
/// ended, further pulls return `Ok(None)` without touching the network.
#[derive(Debug)]
pub struct ResultCursor<P> {
    http: HttpClient,
    path: String,
    paginator: P,
    limit: Option<u64>,
    state: PaginationState,
    buffer: VecDeque<Value>,
}

impl<P: Paginator> ResultCursor<P> {
    /// Create a cursor; nothing is requested until the first pull
    pub fn new(http: HttpClient, path: impl Into<String>, paginator: P) -> Self {
        Self {
            http,
            path: path.into(),
            paginator,
            limit: None,
            state: PaginationState::new(),
            buffer: VecDeque::new(),
        }
    }

    /// Stop after `limit` items
    #[must_use]
    pub fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Start from a continuation token instead of the first page
    #[must_use]
    pub fn resume_from(mut self, cursor: Option<String>) -> Self {
        self.state.cursor = cursor;
        self
    }

    /// Pull the next item
    pub async fn next(&mut self) -> Result<Option<Value>> {
        if self.cap_reached() {
            return Ok(None);
        }

        if self.buffer.is_empty() && self.state.should_fetch() {
            self.fetch_page().await?;
        }

        match self.buffer.pop_front() {
            Some(item) => {
                self.state.emitted += 1;
                Ok(Some(item))
            }
            None => {
                self.state.mark_done();
                Ok(None)
            }
        }
    }

    /// Drain the cursor into a vector
    pub async fn collect_all(mut self) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Turn the cursor into a stream of items
    pub fn into_stream(self) -> impl Stream<Item = Result<Value>> {
        stream::try_unfold(self, |mut cursor| async move {
            Ok(cursor.next().await?.map(|item| (item, cursor)))
        })
    }

    /// Number of pages fetched so far
    pub fn requests(&self) -> u64 {
        self.state.requests
    }

    /// Number of items handed out so far
    pub fn emitted(&self) -> u64 {
        self.state.emitted
    }

    /// Total reported by the first page, if the endpoint reports one
    pub fn total(&self) -> Option<u64> {
        self.state.total
    }

    /// Continuation token for the page after the buffered one
    pub fn cursor(&self) -> Option<&str> {
        self.state.cursor.as_deref()
    }

    fn cap_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.state.emitted >= limit)
    }

    async fn fetch_page(&mut self) -> Result<()> {
        let mut request = ApiRequest::get(self.path.as_str());
        for (key, value) in self.paginator.query_params(&self.state) {
            request = request.query(key, value);
        }

        let body: Value = self.http.request_json(&request).await?;
        let page = self.paginator.process_page(body, &mut self.state)?;
        self.state.requests += 1;

        debug!(
            "Page {} of {}: {} items, has_more={}",
            self.state.requests,
            self.path,
            page.len(),
            self.state.has_more
        );

        if page.is_empty() {
            self.state.mark_done();
        }
        self.buffer.extend(page);
        Ok(())
    }
}
