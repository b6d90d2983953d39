//! Resolver module
//!
//! Strategies that produce the [`Pagination`](crate::pagination::Pagination)
//! for a unit of work.
//!
//! # Overview
//!
//! - [`DefaultPaginationResolver`] - configured defaults only
//! - [`RequestPaginationResolver`] - page and per-page read from an inbound
//!   request, defaults as fallback
//! - any `Fn() -> Pagination` closure

mod resolvers;
mod types;

pub use resolvers::{DefaultPaginationResolver, RequestPaginationResolver};
pub use types::{PaginationResolver, RequestContext};
