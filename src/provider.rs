//! Pagination provider
//!
//! Holds the active resolver for one unit of work (typically one request)
//! and the pagination it produced. Resolution is lazy and happens at most
//! once per installed resolver.
//!
//! A provider is never shared between concurrent units of work: build one
//! per request, or call [`PaginationProvider::reset`] at the boundary.

use crate::config::PaginationConfig;
use crate::error::{Error, Result};
use crate::pagination::Pagination;
use crate::resolver::{
    DefaultPaginationResolver, PaginationResolver, RequestContext, RequestPaginationResolver,
};
use std::fmt;
use std::sync::Arc;

/// Lazy, overridable single-slot pagination cache
pub struct PaginationProvider {
    config: Arc<PaginationConfig>,
    resolver: Option<Box<dyn PaginationResolver>>,
    pagination: Option<Arc<Pagination>>,
}

impl PaginationProvider {
    /// Create an empty provider; [`get_pagination`](Self::get_pagination)
    /// fails until a resolver is installed
    pub fn new(config: impl Into<Arc<PaginationConfig>>) -> Self {
        Self {
            config: config.into(),
            resolver: None,
            pagination: None,
        }
    }

    /// Create a provider that resolves to the configured defaults
    pub fn with_default_resolver(config: impl Into<Arc<PaginationConfig>>) -> Self {
        let mut provider = Self::new(config);
        let resolver = DefaultPaginationResolver::new(Arc::clone(&provider.config));
        provider.set_resolver(resolver);
        provider
    }

    /// Return the cached pagination, resolving it first if needed
    pub fn get_pagination(&mut self) -> Result<Arc<Pagination>> {
        if let Some(pagination) = &self.pagination {
            return Ok(Arc::clone(pagination));
        }

        let resolver = self.resolver.as_ref().ok_or(Error::NoResolverSet)?;
        let pagination = Arc::new(resolver.resolve());

        tracing::debug!(
            page = pagination.page(),
            per_page = pagination.per_page(),
            url = pagination.url(),
            "Resolved pagination"
        );

        self.pagination = Some(Arc::clone(&pagination));
        Ok(pagination)
    }

    /// Install a resolver and drop the cached pagination
    pub fn set_resolver(&mut self, resolver: impl PaginationResolver + 'static) -> &mut Self {
        tracing::trace!("Installing pagination resolver");
        self.resolver = Some(Box::new(resolver));
        self.pagination = None;
        self
    }

    /// Supersede the active resolver with one reading from `request`
    ///
    /// Must run before anything in the same request calls
    /// [`get_pagination`](Self::get_pagination).
    pub fn bind_request(&mut self, request: RequestContext) -> &mut Self {
        tracing::debug!(path = request.path(), "Binding pagination to request");
        let resolver = RequestPaginationResolver::new(Arc::clone(&self.config), request);
        self.set_resolver(resolver)
    }

    /// Shared defaults, for building resolvers consistent with this provider
    pub fn pagination_config(&self) -> &Arc<PaginationConfig> {
        &self.config
    }

    /// Check if a resolver has been installed
    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    /// Forget resolver and cached pagination at the end of a unit of work
    pub fn reset(&mut self) {
        self.resolver = None;
        self.pagination = None;
    }
}

impl fmt::Debug for PaginationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationProvider")
            .field("config", &self.config)
            .field("has_resolver", &self.resolver.is_some())
            .field("pagination", &self.pagination)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_no_resolver_set() {
        let mut provider = PaginationProvider::new(PaginationConfig::default());
        assert!(!provider.has_resolver());

        let err = provider.get_pagination().unwrap_err();
        assert!(matches!(err, Error::NoResolverSet));
    }

    #[test]
    fn test_resolves_once_and_caches_same_instance() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut provider = PaginationProvider::new(PaginationConfig::default());
        provider.set_resolver(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Pagination::new(2, 10)
        });

        let first = provider.get_pagination().unwrap();
        let second = provider.get_pagination().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.page(), 2);
    }

    #[test]
    fn test_set_resolver_invalidates_cache() {
        let mut provider = PaginationProvider::with_default_resolver(PaginationConfig::default());
        let first = provider.get_pagination().unwrap();
        assert_eq!(first.page(), 1);
        assert_eq!(first.per_page(), 15);

        provider.set_resolver(|| Pagination::new(3, 5));
        let second = provider.get_pagination().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.page(), 3);
        assert_eq!(second.per_page(), 5);
    }

    #[test]
    fn test_bind_request_supersedes_default() {
        let config = PaginationConfig::new(1, 20);
        let mut provider = PaginationProvider::with_default_resolver(config);

        let request = RequestContext::from_uri("/items?page=4&sort=name").unwrap();
        provider.bind_request(request);

        let pagination = provider.get_pagination().unwrap();
        assert_eq!(pagination.page(), 4);
        assert_eq!(pagination.per_page(), 20);
        assert_eq!(pagination.url(), "/items?sort=name");
    }

    #[test]
    fn test_pagination_config_is_shared() {
        let config = Arc::new(PaginationConfig::new(1, 42));
        let provider = PaginationProvider::new(Arc::clone(&config));
        assert!(Arc::ptr_eq(provider.pagination_config(), &config));

        let pagination = DefaultPaginationResolver::new(Arc::clone(provider.pagination_config()))
            .resolve();
        assert_eq!(pagination.per_page(), 42);
    }

    #[test]
    fn test_reset() {
        let mut provider = PaginationProvider::with_default_resolver(PaginationConfig::default());
        provider.get_pagination().unwrap();

        provider.reset();
        assert!(!provider.has_resolver());
        assert!(matches!(
            provider.get_pagination(),
            Err(Error::NoResolverSet)
        ));
    }
}
