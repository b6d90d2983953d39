//! DuckDB query source
//!
//! A [`QuerySource`](crate::paginator::QuerySource) backed by a borrowed
//! DuckDB connection. DuckDB can attach PostgreSQL, MySQL and SQLite
//! databases, so the same adapter paginates tables living there too.

mod engine;
mod query;

pub use engine::{DuckDbSource, Record};
pub use query::SqlQuery;
