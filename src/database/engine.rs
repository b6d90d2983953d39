//! DuckDB-backed query source
//!
//! Rows come back as JSON objects keyed by column name, with DuckDB values
//! converted to their closest JSON representation.

use super::query::SqlQuery;
use crate::error::Result;
use crate::paginator::{CountExpression, QuerySource};
use duckdb::{Connection, Statement};
use serde_json::{Map, Value};

/// One result row, keyed by column name
pub type Record = Map<String, Value>;

/// Paginates one table of a borrowed DuckDB connection
///
/// The connection is never opened, pooled or closed here.
pub struct DuckDbSource<'c> {
    conn: &'c Connection,
    table: String,
    alias: Option<String>,
}

impl<'c> DuckDbSource<'c> {
    /// Create a source for `table`
    pub fn new(conn: &'c Connection, table: impl Into<String>) -> Self {
        Self {
            conn,
            table: table.into(),
            alias: None,
        }
    }

    /// Alias the table in every generated query
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn connection(&self) -> &Connection {
        self.conn
    }
}

impl QuerySource for DuckDbSource<'_> {
    type Query = SqlQuery;
    type Row = Record;

    fn table(&self) -> &str {
        &self.table
    }

    fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    fn create_base_query(&self) -> SqlQuery {
        SqlQuery::new(self.table.as_str(), self.alias.as_deref())
    }

    fn execute_for_rows(&self, query: SqlQuery) -> Result<Vec<Record>> {
        let sql = query.to_sql();

        tracing::debug!("Executing query: {}", sql);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(duckdb::params_from_iter(query.params()))?;
        let columns = rows
            .as_ref()
            .map(Statement::column_names)
            .unwrap_or_default();

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Record::with_capacity(columns.len());
            for (index, column) in columns.iter().enumerate() {
                let value: duckdb::types::Value = row.get(index)?;
                record.insert(column.clone(), duckdb_value_to_json(value));
            }
            records.push(record);
        }

        Ok(records)
    }

    fn execute_for_count(&self, query: SqlQuery, expression: &CountExpression) -> Result<u64> {
        let sql = query.to_count_sql(expression);

        tracing::debug!("Executing count query: {}", sql);

        let total: i64 = self
            .conn
            .query_row(&sql, duckdb::params_from_iter(query.params()), |row| {
                row.get(0)
            })?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    fn primary_key_columns(&self, table: &str) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT name FROM pragma_table_info('{}') WHERE pk ORDER BY cid",
            table.replace('\'', "''")
        );

        tracing::trace!("Reading primary key: {}", sql);

        let mut stmt = self.conn.prepare(&sql)?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(columns)
    }
}

/// Convert a DuckDB value to JSON
///
/// Temporal values become ISO-8601 strings, blobs base64, and integers too
/// wide for JSON numbers become strings.
fn duckdb_value_to_json(value: duckdb::types::Value) -> Value {
    use duckdb::types::Value as Db;

    match value {
        Db::Null => Value::Null,
        Db::Boolean(b) => Value::Bool(b),
        Db::TinyInt(i) => Value::Number(i.into()),
        Db::SmallInt(i) => Value::Number(i.into()),
        Db::Int(i) => Value::Number(i.into()),
        Db::BigInt(i) => Value::Number(i.into()),
        Db::HugeInt(i) => Value::String(i.to_string()),
        Db::UTinyInt(i) => Value::Number(i.into()),
        Db::USmallInt(i) => Value::Number(i.into()),
        Db::UInt(i) => Value::Number(i.into()),
        Db::UBigInt(i) => Value::Number(i.into()),
        Db::Float(f) => {
            serde_json::Number::from_f64(f64::from(f)).map_or(Value::Null, Value::Number)
        }
        Db::Double(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        Db::Text(s) => Value::String(s),
        Db::Blob(b) => Value::String(base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            b,
        )),
        // Microseconds since the epoch
        Db::Timestamp(_, micros) => {
            let secs = micros.div_euclid(1_000_000);
            let nanos = (micros.rem_euclid(1_000_000) * 1000) as u32;
            chrono::DateTime::from_timestamp(secs, nanos)
                .map_or(Value::Number(micros.into()), |dt| {
                    Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string())
                })
        }
        // Days since 1970-01-01, which is day 719163 counted from 1 CE
        Db::Date32(days) => chrono::NaiveDate::from_num_days_from_ce_opt(days + 719_163)
            .map_or(Value::Number(days.into()), |date| {
                Value::String(date.format("%Y-%m-%d").to_string())
            }),
        // Microseconds since midnight
        Db::Time64(_, micros) => {
            let secs = micros / 1_000_000;
            Value::String(format!(
                "{:02}:{:02}:{:02}.{:06}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60,
                micros % 1_000_000
            ))
        }
        other => Value::String(format!("{other:?}")),
    }
}
