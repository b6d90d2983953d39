//! Error types for pagewise
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Backend failures (DuckDB, or any adapter reporting through `anyhow`) are
//! carried transparently: the paginator never wraps or retries them.

use thiserror::Error;

/// The main error type for pagewise
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Resolution Errors
    // ============================================================================
    #[error("No pagination resolver set on provider. Use PaginationProvider::set_resolver().")]
    NoResolverSet,

    // ============================================================================
    // Counting Errors
    // ============================================================================
    #[error("{}", describe_primary_key(.table, .columns))]
    InvalidPrimaryKey { table: String, columns: Vec<String> },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Backend Errors
    // ============================================================================
    #[error(transparent)]
    Database(#[from] duckdb::Error),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

fn describe_primary_key(table: &str, columns: &[String]) -> String {
    if columns.is_empty() {
        format!("No primary key identified for table \"{table}\"")
    } else {
        format!(
            "Only primary keys with 1 column are supported, {} given for table \"{table}\". [\"{}\"]",
            columns.len(),
            columns.join("\", \"")
        )
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid primary key error
    pub fn invalid_primary_key(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self::InvalidPrimaryKey {
            table: table.into(),
            columns,
        }
    }

    /// Whether the caller has to fix wiring or schema before trying again
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Error::NoResolverSet
                | Error::InvalidPrimaryKey { .. }
                | Error::Config { .. }
                | Error::YamlParse(_)
                | Error::JsonParse(_)
        )
    }

    /// Check if this error came from the storage layer
    pub fn is_backend_error(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Backend(_))
    }
}

/// Result type alias for pagewise
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
