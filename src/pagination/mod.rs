//! Pagination module
//!
//! Supports: search-after sort keys (search) and opaque page state
//! (hostname history)
//!
//! # Overview
//!
//! A [`ResultCursor`] presents a paginated endpoint as a single lazy
//! sequence of items. The [`Paginator`] strategy decides which query
//! parameters go on each request and whether another page exists; the
//! cursor owns buffering, the optional item cap and termination.

mod cursor;
mod strategies;
mod types;

pub use cursor::{HostnameCursor, ResultCursor, SearchCursor};
pub use strategies::{PageStatePaginator, SearchAfterPaginator};
pub use types::{sort_token, PaginationState, Paginator, MAX_TOTAL};
