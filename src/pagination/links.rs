//! Navigation URL generation
//!
//! Sets the page and per-page query parameters on a base URL while keeping
//! every other parameter as it was.

use super::types::Pagination;
use crate::error::Result;
use url::{Position, Url};

/// Origin used to resolve relative base URLs such as `/items?sort=name`
const PLACEHOLDER_ORIGIN: &str = "http://localhost/";

/// How much of the base URL was left out
enum Relative {
    No,
    /// `//host/path`: keeps the host, inherits the scheme
    Scheme,
    /// `/path` or `path`
    Path,
}

/// Default URL resolver
///
/// Existing values for the two pagination attributes are overwritten in
/// place (duplicates dropped), missing ones are appended. Target pages
/// below 1 become 1. Relative and scheme-relative base URLs keep their form.
pub fn default_url(base_url: &str, pagination: &Pagination, page: i64) -> Result<String> {
    let (mut url, relative) = match Url::parse(base_url) {
        Ok(url) => (url, Relative::No),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let relative = if base_url.starts_with("//") {
                Relative::Scheme
            } else {
                Relative::Path
            };
            (Url::parse(PLACEHOLDER_ORIGIN)?.join(base_url)?, relative)
        }
        Err(e) => return Err(e.into()),
    };

    let page_attribute = pagination.page_attribute();
    let per_page_attribute = pagination.per_page_attribute();
    let page_value = page.max(1).to_string();
    let per_page_value = pagination.per_page().to_string();

    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut page_written = false;
    let mut per_page_written = false;

    for (key, value) in url.query_pairs() {
        if key == page_attribute {
            if !page_written {
                pairs.push((key.into_owned(), page_value.clone()));
                page_written = true;
            }
        } else if key == per_page_attribute {
            if !per_page_written {
                pairs.push((key.into_owned(), per_page_value.clone()));
                per_page_written = true;
            }
        } else {
            pairs.push((key.into_owned(), value.into_owned()));
        }
    }

    if !page_written {
        pairs.push((page_attribute.to_string(), page_value));
    }
    if !per_page_written {
        pairs.push((per_page_attribute.to_string(), per_page_value));
    }

    url.query_pairs_mut().clear().extend_pairs(pairs);

    Ok(match relative {
        Relative::No => url.into(),
        Relative::Scheme => format!("//{}", &url[Position::BeforeUsername..]),
        Relative::Path => url[Position::BeforePath..].to_string(),
    })
}
