//! Pagination module
//!
//! Describes one requested page and generates navigation URLs for it.
//!
//! # Overview
//!
//! A [`Pagination`] is an immutable page request (page number, page size,
//! query attribute names, base URL). Windowing and URL generation clamp
//! page numbers below 1 to the first page instead of failing.

mod links;
mod types;

pub use links::default_url;
pub use types::{total_pages, PageWindow, Pagination, UrlResolver, DEFAULT_URL};
