//! Paginator module
//!
//! Turns a [`Pagination`](crate::pagination::Pagination) and a backend into
//! one concrete page of items plus a total item count.
//!
//! # Overview
//!
//! Backends implement [`QuerySource`]; the generic [`Paginator`] drives it
//! through three memoized phases:
//!
//! 1. count: base query + common and filter criteria, counted by rows or,
//!    when joins are flagged, by distinct primary key
//! 2. fetch: base query + common, filter and get-items criteria, select and
//!    page window applied
//! 3. transform: optional per-row mapping, in fetch order
//!
//! Each phase rebuilds its query from the base so criteria side effects
//! never leak between counting and fetching.

mod pipeline;
mod types;

pub use pipeline::Paginator;
pub use types::{CountExpression, Page, PageQuery, QuerySource};
