//! SQL query builder
//!
//! Just enough structure for pagination: the paginator has to swap the
//! select list, attach a window, and turn the same filtered query into a
//! count.

use crate::paginator::{CountExpression, PageQuery};
use crate::pagination::PageWindow;
use duckdb::types::Value;

/// SELECT query under construction
#[derive(Debug, Clone, Default)]
pub struct SqlQuery {
    select: Option<String>,
    extra_select: Vec<String>,
    from: String,
    alias: Option<String>,
    joins: Vec<String>,
    conditions: Vec<String>,
    params: Vec<Value>,
    order_by: Vec<String>,
    window: Option<PageWindow>,
}

impl SqlQuery {
    /// Start a query over `table`
    pub fn new(table: impl Into<String>, alias: Option<&str>) -> Self {
        Self {
            from: table.into(),
            alias: alias.map(String::from),
            ..Default::default()
        }
    }

    /// Add an `INNER JOIN table alias ON condition`
    pub fn inner_join(&mut self, table: &str, alias: &str, on: &str) -> &mut Self {
        self.joins.push(format!("INNER JOIN {table} {alias} ON {on}"));
        self
    }

    /// Add a `LEFT JOIN table alias ON condition`
    pub fn left_join(&mut self, table: &str, alias: &str, on: &str) -> &mut Self {
        self.joins.push(format!("LEFT JOIN {table} {alias} ON {on}"));
        self
    }

    /// Add a condition, combined with the others using AND
    pub fn and_where(&mut self, condition: impl Into<String>) -> &mut Self {
        self.conditions.push(condition.into());
        self
    }

    /// Bind the next positional `?` parameter
    pub fn bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.params.push(value.into());
        self
    }

    /// Append an ordering expression (fetch only; counts ignore ordering)
    pub fn order_by(&mut self, expression: impl Into<String>) -> &mut Self {
        self.order_by.push(expression.into());
        self
    }

    /// Select an expression in addition to the main select list
    pub fn add_select(&mut self, expression: impl Into<String>) -> &mut Self {
        self.extra_select.push(expression.into());
        self
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn window(&self) -> Option<PageWindow> {
        self.window
    }

    /// Render the row query
    pub fn to_sql(&self) -> String {
        let mut columns = vec![self.select.clone().unwrap_or_else(|| "*".to_string())];
        columns.extend(self.extra_select.iter().cloned());

        let mut sql = format!("SELECT {}{}", columns.join(", "), self.body());

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        if let Some(window) = self.window {
            sql.push_str(&format!(" LIMIT {} OFFSET {}", window.limit, window.offset));
        }

        sql
    }

    /// Render the filtered query as a single-value count
    pub fn to_count_sql(&self, expression: &CountExpression) -> String {
        format!("SELECT {expression} AS total{}", self.body())
    }

    /// FROM, joins and WHERE, shared by both renderings
    fn body(&self) -> String {
        let mut sql = format!(" FROM {}", self.from);

        if let Some(alias) = &self.alias {
            sql.push(' ');
            sql.push_str(alias);
        }

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }

        if !self.conditions.is_empty() {
            let conditions: Vec<String> =
                self.conditions.iter().map(|c| format!("({c})")).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        sql
    }
}

impl PageQuery for SqlQuery {
    fn set_select(&mut self, select: &str) {
        self.select = Some(select.to_string());
    }

    fn set_window(&mut self, window: PageWindow) {
        self.window = Some(window);
    }
}
