//! Resolver types and traits

use crate::error::Result;
use crate::pagination::Pagination;
use url::Url;

/// Produces the pagination for the current unit of work
pub trait PaginationResolver: Send {
    /// Build a pagination from whatever context the resolver holds
    fn resolve(&self) -> Pagination;
}

impl<F> PaginationResolver for F
where
    F: Fn() -> Pagination + Send,
{
    fn resolve(&self) -> Pagination {
        self()
    }
}

/// Origin used to parse request targets such as `/items?page=2`
const PLACEHOLDER_ORIGIN: &str = "http://localhost/";

/// The parts of an inbound request pagination cares about
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestContext {
    path: String,
    query: Vec<(String, String)>,
}

impl RequestContext {
    /// Create a request view from a path and decoded query pairs
    pub fn new(path: impl Into<String>, query: Vec<(String, String)>) -> Self {
        Self {
            path: path.into(),
            query,
        }
    }

    /// Parse an absolute URL or a request target (`/path?query`)
    pub fn from_uri(uri: &str) -> Result<Self> {
        let url = match Url::parse(uri) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse(PLACEHOLDER_ORIGIN)?.join(uri)?
            }
            Err(e) => return Err(e.into()),
        };

        let query = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        Ok(Self::new(url.path(), query))
    }

    /// Request path without query string
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Decoded query pairs in request order
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Last value given for `key`, matching how repeated parameters override
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
