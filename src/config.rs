//! Pagination defaults
//!
//! The configuration read by resolvers (never by the paginator itself).
//! Loaded from YAML or JSON, or built in code.

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// Defaults
// ============================================================================

/// Query parameter carrying the page number
pub const DEFAULT_PAGE_ATTRIBUTE: &str = "page";

/// Query parameter carrying the page size
pub const DEFAULT_PER_PAGE_ATTRIBUTE: &str = "perPage";

/// Page used when nothing else is known
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when nothing else is known
pub const DEFAULT_PER_PAGE: i64 = 15;

fn default_page_attribute() -> String {
    DEFAULT_PAGE_ATTRIBUTE.to_string()
}

fn default_per_page_attribute() -> String {
    DEFAULT_PER_PAGE_ATTRIBUTE.to_string()
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

// ============================================================================
// PaginationConfig
// ============================================================================

/// Defaults shared by every resolver built for a unit of work
///
/// ```yaml
/// page_attribute: page
/// page_default: 1
/// per_page_attribute: perPage
/// per_page_default: 15
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Query parameter name for the page number
    #[serde(default = "default_page_attribute", alias = "pageAttribute")]
    pub page_attribute: String,

    /// Page number used when the request carries none
    #[serde(default = "default_page", alias = "pageDefault")]
    pub page_default: i64,

    /// Query parameter name for the page size
    #[serde(default = "default_per_page_attribute", alias = "perPageAttribute")]
    pub per_page_attribute: String,

    /// Page size used when the request carries none
    #[serde(default = "default_per_page", alias = "perPageDefault")]
    pub per_page_default: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_attribute: default_page_attribute(),
            page_default: DEFAULT_PAGE,
            per_page_attribute: default_per_page_attribute(),
            per_page_default: DEFAULT_PER_PAGE,
        }
    }
}

impl PaginationConfig {
    /// Create a config with custom defaults and the standard attribute names
    pub fn new(page_default: i64, per_page_default: i64) -> Self {
        Self {
            page_default,
            per_page_default,
            ..Default::default()
        }
    }

    /// Override the query parameter names
    #[must_use]
    pub fn with_attributes(
        mut self,
        page_attribute: impl Into<String>,
        per_page_attribute: impl Into<String>,
    ) -> Self {
        self.page_attribute = page_attribute.into();
        self.per_page_attribute = per_page_attribute.into();
        self
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` is parsed as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read pagination config '{}'", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        tracing::debug!(path = %path.display(), is_json, "Loading pagination config");

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Reject attribute names that would make generated URLs ambiguous
    pub fn validate(&self) -> Result<()> {
        if self.page_attribute.trim().is_empty() {
            return Err(Error::config("page_attribute cannot be empty"));
        }

        if self.per_page_attribute.trim().is_empty() {
            return Err(Error::config("per_page_attribute cannot be empty"));
        }

        if self.page_attribute == self.per_page_attribute {
            return Err(Error::config(format!(
                "page_attribute and per_page_attribute must differ, both are '{}'",
                self.page_attribute
            )));
        }

        Ok(())
    }
}
