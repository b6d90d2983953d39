//! Resolver implementations

use super::types::{PaginationResolver, RequestContext};
use crate::config::PaginationConfig;
use crate::pagination::Pagination;
use std::sync::Arc;
use url::form_urlencoded;

// ============================================================================
// Default Resolver
// ============================================================================

/// Resolves to the configured default page and page size
#[derive(Debug, Clone)]
pub struct DefaultPaginationResolver {
    config: Arc<PaginationConfig>,
}

impl DefaultPaginationResolver {
    /// Create a resolver over shared defaults
    pub fn new(config: Arc<PaginationConfig>) -> Self {
        Self { config }
    }
}

impl PaginationResolver for DefaultPaginationResolver {
    fn resolve(&self) -> Pagination {
        Pagination::from_config(&self.config)
    }
}

// ============================================================================
// Request Resolver
// ============================================================================

/// Resolves page and page size from an inbound request
///
/// Missing or non-numeric values fall back to the configured defaults. The
/// base URL is the request path plus its query string minus the two
/// pagination attributes, so generated links never repeat them.
#[derive(Debug, Clone)]
pub struct RequestPaginationResolver {
    config: Arc<PaginationConfig>,
    request: RequestContext,
}

impl RequestPaginationResolver {
    /// Create a resolver bound to one request
    pub fn new(config: Arc<PaginationConfig>, request: RequestContext) -> Self {
        Self { config, request }
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    fn read_int(&self, attribute: &str, default: i64) -> i64 {
        let Some(value) = self.request.query_value(attribute) else {
            return default;
        };

        match value.trim().parse::<i64>() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(
                    attribute,
                    value,
                    default,
                    "Ignoring non-numeric pagination parameter"
                );
                default
            }
        }
    }

    fn base_url(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut has_pairs = false;

        for (key, value) in self.request.query() {
            if key == &self.config.page_attribute || key == &self.config.per_page_attribute {
                continue;
            }
            serializer.append_pair(key, value);
            has_pairs = true;
        }

        let path = if self.request.path().is_empty() {
            "/"
        } else {
            self.request.path()
        };

        if has_pairs {
            format!("{path}?{}", serializer.finish())
        } else {
            path.to_string()
        }
    }
}

impl PaginationResolver for RequestPaginationResolver {
    fn resolve(&self) -> Pagination {
        let page = self.read_int(&self.config.page_attribute, self.config.page_default);
        let per_page = self.read_int(&self.config.per_page_attribute, self.config.per_page_default);

        tracing::trace!(
            path = self.request.path(),
            page,
            per_page,
            "Resolved pagination from request"
        );

        Pagination::create(
            page,
            per_page,
            Some(&self.config.page_attribute),
            Some(&self.config.per_page_attribute),
            Some(&self.base_url()),
        )
    }
}
