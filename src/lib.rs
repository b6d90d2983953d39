// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # pagewise
//!
//! Bounded pages of results from any ordered data source, with per-page
//! metadata (page number, page size, navigation URLs) independent of how
//! the data is stored or queried.
//!
//! ## Features
//!
//! - **Page descriptors**: immutable [`Pagination`] with pluggable URL generation
//! - **Lazy resolution**: a per-request [`PaginationProvider`] resolving defaults
//!   or request parameters once
//! - **Generic paginator**: count, fetch and transform over any [`QuerySource`]
//! - **Join-aware counting**: distinct primary keys instead of duplicated rows
//! - **Backends**: DuckDB (and anything DuckDB attaches) and in-memory slices
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewise::{DuckDbSource, PaginationConfig, PaginationProvider, Paginator, RequestContext};
//!
//! let mut provider = PaginationProvider::with_default_resolver(PaginationConfig::default());
//! provider.bind_request(RequestContext::from_uri("/items?page=2&sort=title")?);
//! let pagination = provider.get_pagination()?;
//!
//! let source = DuckDbSource::new(&conn, "items").with_alias("i");
//! let paginator = Paginator::new(&pagination, &source)
//!     .with_filter_criteria(|query| {
//!         query.and_where("i.title LIKE ?").bind("a%".to_string());
//!     });
//!
//! let items = paginator.get_items()?;
//! let next = paginator.next_page_url()?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  PaginationResolver ──▶ PaginationProvider ──▶ Pagination     │
//! │  (defaults, request)    (lazy, per request)    (page, urls)   │
//! └───────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────┴───────────────────────────────┐
//! │  Paginator: count ──▶ fetch ──▶ transform  (each memoized)    │
//! └───────────────────────────────┬───────────────────────────────┘
//!                                 │ QuerySource
//!               ┌─────────────────┴─────────────────┐
//!               │  DuckDbSource  │  CollectionSource │
//!               └───────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Pagination defaults
pub mod config;

/// Page descriptor, window and URL generation
pub mod pagination;

/// Strategies producing the active pagination
pub mod resolver;

/// Per-request pagination cache
pub mod provider;

/// Generic paginator pipeline and backend capability
pub mod paginator;

/// DuckDB query source
pub mod database;

/// In-memory query source
pub mod collection;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

pub use collection::{CollectionQuery, CollectionSource};
pub use config::PaginationConfig;
pub use database::{DuckDbSource, Record, SqlQuery};
pub use pagination::{PageWindow, Pagination, UrlResolver};
pub use paginator::{CountExpression, Page, PageQuery, Paginator, QuerySource};
pub use provider::PaginationProvider;
pub use resolver::{
    DefaultPaginationResolver, PaginationResolver, RequestContext, RequestPaginationResolver,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
