//! Pagination types
//!
//! Defines the page descriptor and the window derived from it.

use super::links::default_url;
use crate::config::{PaginationConfig, DEFAULT_PAGE_ATTRIBUTE, DEFAULT_PER_PAGE_ATTRIBUTE};
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// Default URL pagination links are generated against
pub const DEFAULT_URL: &str = "/";

/// Custom URL generation: `(base_url, pagination, target_page) -> url`
pub type UrlResolver = Arc<dyn Fn(&str, &Pagination, i64) -> Result<String> + Send + Sync>;

// ============================================================================
// PageWindow
// ============================================================================

/// Offset/limit pair used to slice a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageWindow {
    /// Rows to skip
    pub offset: u64,
    /// Rows to take
    pub limit: u64,
}

impl PageWindow {
    /// Derive the window for a page
    ///
    /// Pages below 1 are treated as page 1. A page size below 1 yields an
    /// empty window.
    pub fn new(page: i64, per_page: i64) -> Self {
        if per_page <= 0 {
            return Self::default();
        }

        let page = page.max(1) as u64;
        let limit = per_page as u64;

        Self {
            offset: (page - 1).saturating_mul(limit),
            limit,
        }
    }

    /// Check if the window can never contain a row
    pub fn is_empty(&self) -> bool {
        self.limit == 0
    }
}

/// Number of pages needed to show `total_items`; 0 when `per_page < 1`
pub fn total_pages(total_items: u64, per_page: i64) -> u64 {
    if per_page <= 0 {
        return 0;
    }

    total_items.div_ceil(per_page as u64)
}

// ============================================================================
// Pagination
// ============================================================================

/// Immutable description of a requested page
///
/// Nothing is validated at construction; out of range values are only
/// normalized where they are consumed. The URL resolver is the one piece
/// that can be swapped after construction.
#[derive(Clone)]
pub struct Pagination {
    page: i64,
    per_page: i64,
    page_attribute: String,
    per_page_attribute: String,
    url: String,
    url_resolver: Option<UrlResolver>,
}

impl Pagination {
    /// Create a pagination with the default attribute names and URL
    pub fn new(page: i64, per_page: i64) -> Self {
        Self::create(page, per_page, None, None, None)
    }

    /// Create a pagination, falling back to defaults for omitted values
    pub fn create(
        page: i64,
        per_page: i64,
        page_attribute: Option<&str>,
        per_page_attribute: Option<&str>,
        url: Option<&str>,
    ) -> Self {
        Self {
            page,
            per_page,
            page_attribute: page_attribute.unwrap_or(DEFAULT_PAGE_ATTRIBUTE).to_string(),
            per_page_attribute: per_page_attribute
                .unwrap_or(DEFAULT_PER_PAGE_ATTRIBUTE)
                .to_string(),
            url: url.unwrap_or(DEFAULT_URL).to_string(),
            url_resolver: None,
        }
    }

    /// Create the default page described by a config
    pub fn from_config(config: &PaginationConfig) -> Self {
        Self::create(
            config.page_default,
            config.per_page_default,
            Some(&config.page_attribute),
            Some(&config.per_page_attribute),
            None,
        )
    }

    /// Replace the base URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    /// Page number as used for windowing and URLs (never below 1)
    pub fn normalized_page(&self) -> i64 {
        self.page.max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn page_attribute(&self) -> &str {
        &self.page_attribute
    }

    pub fn per_page_attribute(&self) -> &str {
        &self.per_page_attribute
    }

    /// Base URL navigation links are generated against
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Window covering this page
    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.page, self.per_page)
    }

    /// Generate the URL for `page` using the custom resolver if one is set
    pub fn get_url(&self, page: i64) -> Result<String> {
        match &self.url_resolver {
            Some(resolver) => resolver(&self.url, self, page),
            None => default_url(&self.url, self, page),
        }
    }

    /// Replace or clear the URL resolver; `None` restores the default
    pub fn set_url_resolver(&mut self, resolver: Option<UrlResolver>) -> &mut Self {
        self.url_resolver = resolver;
        self
    }

    /// Check if a custom URL resolver is installed
    pub fn has_url_resolver(&self) -> bool {
        self.url_resolver.is_some()
    }
}

impl fmt::Debug for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pagination")
            .field("page", &self.page)
            .field("per_page", &self.per_page)
            .field("page_attribute", &self.page_attribute)
            .field("per_page_attribute", &self.per_page_attribute)
            .field("url", &self.url)
            .field("url_resolver", &self.url_resolver.as_ref().map(|_| "custom"))
            .finish()
    }
}
