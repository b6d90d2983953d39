//! Paginator types and traits
//!
//! Defines the backend capability the pipeline depends on.

use crate::error::Result;
use crate::pagination::PageWindow;
use serde::Serialize;
use std::fmt;

/// What a count query counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountExpression {
    /// Every row of the filtered query
    Rows,
    /// Distinct values of one (qualified) column, used when joins may
    /// repeat parent rows
    Distinct(String),
}

impl fmt::Display for CountExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rows => write!(f, "COUNT(*)"),
            Self::Distinct(column) => write!(f, "COUNT(DISTINCT {column})"),
        }
    }
}

/// Query manipulations the pipeline applies itself
pub trait PageQuery {
    /// Replace the selected columns
    fn set_select(&mut self, select: &str);

    /// Restrict the query to a page window
    fn set_window(&mut self, window: PageWindow);
}

/// Minimal backend capability needed to paginate
///
/// Implementations borrow their connection; the paginator never opens or
/// closes one. Execution errors are returned unchanged to the caller.
pub trait QuerySource {
    /// Backend query under construction
    type Query: PageQuery;
    /// Raw row or entity produced by the backend
    type Row;

    /// Table, entity or collection name being paginated
    fn table(&self) -> &str;

    /// Alias the base query gives to [`table`](Self::table), if any
    fn alias(&self) -> Option<&str>;

    /// Build a fresh query scoped to the source, alias applied
    fn create_base_query(&self) -> Self::Query;

    /// Execute a fully built query and return its rows
    fn execute_for_rows(&self, query: Self::Query) -> Result<Vec<Self::Row>>;

    /// Execute `query` shaped as a count and return the single integer
    fn execute_for_count(&self, query: Self::Query, expression: &CountExpression) -> Result<u64>;

    /// Primary key columns of `table`, in key order
    fn primary_key_columns(&self, table: &str) -> Result<Vec<String>>;
}

/// Serializable snapshot of one computed page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page, transformed
    pub items: Vec<T>,
    /// Current page (never below 1)
    pub page: i64,
    /// Requested page size
    pub per_page: i64,
    /// Items across all pages
    pub total_items: u64,
    /// Number of pages
    pub total_pages: u64,
    /// Link to the next page, if there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_url: Option<String>,
    /// Link to the previous page, if there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page_url: Option<String>,
}
