//! Generic paginator pipeline

use super::types::{CountExpression, Page, PageQuery, QuerySource};
use crate::error::{Error, Result};
use crate::pagination::{total_pages, Pagination};
use once_cell::unsync::OnceCell;

type Criteria<'a, Q> = Box<dyn Fn(&mut Q) + 'a>;

type Transformer<'a, R, T> = Box<dyn Fn(R) -> T + 'a>;

/// Paginates any [`QuerySource`]
///
/// Configure with the `with_*` builders, then read items and counts. The
/// total count, the primary key column and the item list are each computed
/// at most once for the lifetime of the paginator. Builders called after a
/// value was computed do not recompute it, so configure before reading.
pub struct Paginator<'a, S: QuerySource, T = <S as QuerySource>::Row> {
    pagination: &'a Pagination,
    source: &'a S,
    common_criteria: Option<Criteria<'a, S::Query>>,
    filter_criteria: Option<Criteria<'a, S::Query>>,
    get_items_criteria: Option<Criteria<'a, S::Query>>,
    select: Option<String>,
    has_joins: bool,
    transformer: Transformer<'a, S::Row, T>,
    primary_key: OnceCell<String>,
    total_items: OnceCell<u64>,
    items: OnceCell<Vec<T>>,
}

impl<'a, S: QuerySource> Paginator<'a, S> {
    /// Create a paginator returning raw backend rows
    pub fn new(pagination: &'a Pagination, source: &'a S) -> Self {
        Self {
            pagination,
            source,
            common_criteria: None,
            filter_criteria: None,
            get_items_criteria: None,
            select: None,
            has_joins: false,
            transformer: Box::new(|row| row),
            primary_key: OnceCell::new(),
            total_items: OnceCell::new(),
            items: OnceCell::new(),
        }
    }
}

impl<'a, S: QuerySource, T> Paginator<'a, S, T> {
    // ========================================================================
    // Configuration
    // ========================================================================

    /// Criteria applied to both the count and the fetch query (e.g. joins
    /// the filter depends on)
    #[must_use]
    pub fn with_common_criteria(mut self, criteria: impl Fn(&mut S::Query) + 'a) -> Self {
        self.common_criteria = Some(Box::new(criteria));
        self
    }

    /// Criteria narrowing the result set, applied to both phases
    #[must_use]
    pub fn with_filter_criteria(mut self, criteria: impl Fn(&mut S::Query) + 'a) -> Self {
        self.filter_criteria = Some(Box::new(criteria));
        self
    }

    /// Criteria for fetching only (e.g. eager loading related data)
    #[must_use]
    pub fn with_get_items_criteria(mut self, criteria: impl Fn(&mut S::Query) + 'a) -> Self {
        self.get_items_criteria = Some(Box::new(criteria));
        self
    }

    /// Explicit select expression for the fetch query
    #[must_use]
    pub fn with_select(mut self, select: impl Into<String>) -> Self {
        self.select = Some(select.into());
        self
    }

    /// Count distinct primary keys instead of rows
    ///
    /// Use when criteria join tables that can repeat rows of the paginated
    /// table. Requires a single-column primary key.
    #[must_use]
    pub fn has_joins_in_query(mut self) -> Self {
        self.has_joins = true;
        self
    }

    /// Map every fetched row before it is returned
    ///
    /// Items already fetched are dropped since their type changes; the
    /// memoized count is kept.
    pub fn with_transformer<U>(self, transformer: impl Fn(S::Row) -> U + 'a) -> Paginator<'a, S, U> {
        Paginator {
            pagination: self.pagination,
            source: self.source,
            common_criteria: self.common_criteria,
            filter_criteria: self.filter_criteria,
            get_items_criteria: self.get_items_criteria,
            select: self.select,
            has_joins: self.has_joins,
            transformer: Box::new(transformer),
            primary_key: self.primary_key,
            total_items: self.total_items,
            items: OnceCell::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn pagination(&self) -> &Pagination {
        self.pagination
    }

    /// Whether joins were flagged with [`has_joins_in_query`](Self::has_joins_in_query)
    pub fn joins_in_query(&self) -> bool {
        self.has_joins
    }

    /// Current page, never below 1
    pub fn current_page(&self) -> i64 {
        self.pagination.normalized_page()
    }

    pub fn items_per_page(&self) -> i64 {
        self.pagination.per_page()
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Items on the current page
    pub fn get_items(&self) -> Result<&[T]> {
        self.items
            .get_or_try_init(|| self.fetch_items())
            .map(Vec::as_slice)
    }

    /// Items across all pages
    pub fn get_total_items(&self) -> Result<u64> {
        self.total_items
            .get_or_try_init(|| self.count_items())
            .copied()
    }

    /// `ceil(total_items / per_page)`, or 0 when the page size is below 1
    pub fn get_total_pages(&self) -> Result<u64> {
        Ok(total_pages(self.get_total_items()?, self.pagination.per_page()))
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page() > 1
    }

    pub fn has_next_page(&self) -> Result<bool> {
        let total_pages = i64::try_from(self.get_total_pages()?).unwrap_or(i64::MAX);
        Ok(self.current_page() < total_pages)
    }

    pub fn previous_page_url(&self) -> Result<Option<String>> {
        if !self.has_previous_page() {
            return Ok(None);
        }
        self.pagination.get_url(self.current_page() - 1).map(Some)
    }

    pub fn next_page_url(&self) -> Result<Option<String>> {
        if !self.has_next_page()? {
            return Ok(None);
        }
        self.pagination.get_url(self.current_page() + 1).map(Some)
    }

    /// Snapshot items, counts and navigation links
    pub fn to_page(&self) -> Result<Page<T>>
    where
        T: Clone,
    {
        Ok(Page {
            items: self.get_items()?.to_vec(),
            page: self.current_page(),
            per_page: self.items_per_page(),
            total_items: self.get_total_items()?,
            total_pages: self.get_total_pages()?,
            next_page_url: self.next_page_url()?,
            previous_page_url: self.previous_page_url()?,
        })
    }

    // ========================================================================
    // Phases
    // ========================================================================

    /// Fresh base query with common and filter criteria applied
    fn filtered_query(&self) -> S::Query {
        let mut query = self.source.create_base_query();

        if let Some(criteria) = &self.common_criteria {
            criteria(&mut query);
        }
        if let Some(criteria) = &self.filter_criteria {
            criteria(&mut query);
        }

        query
    }

    fn count_items(&self) -> Result<u64> {
        // Key resolution fails before any query is built.
        let expression = if self.has_joins {
            CountExpression::Distinct(self.primary_key_column()?.to_string())
        } else {
            CountExpression::Rows
        };

        tracing::debug!(
            table = self.source.table(),
            count = %expression,
            "Counting items"
        );

        let query = self.filtered_query();
        let total = self.source.execute_for_count(query, &expression)?;

        tracing::trace!(table = self.source.table(), total, "Counted items");
        Ok(total)
    }

    fn fetch_items(&self) -> Result<Vec<T>> {
        let window = self.pagination.window();

        if window.is_empty() {
            tracing::debug!(
                table = self.source.table(),
                per_page = self.pagination.per_page(),
                "Page size below 1, returning empty page"
            );
            return Ok(Vec::new());
        }

        let mut query = self.filtered_query();
        if let Some(criteria) = &self.get_items_criteria {
            criteria(&mut query);
        }

        let select = self.resolve_select();
        query.set_select(&select);
        query.set_window(window);

        tracing::debug!(
            table = self.source.table(),
            select = %select,
            offset = window.offset,
            limit = window.limit,
            "Fetching items"
        );

        let rows = self.source.execute_for_rows(query)?;
        tracing::trace!(table = self.source.table(), rows = rows.len(), "Fetched items");

        Ok(rows.into_iter().map(|row| (self.transformer)(row)).collect())
    }

    fn resolve_select(&self) -> String {
        if let Some(select) = &self.select {
            return select.clone();
        }

        match self.source.alias() {
            Some(alias) => format!("{alias}.*"),
            None => "*".to_string(),
        }
    }

    /// Single primary key column, qualified with the alias or the table name
    fn primary_key_column(&self) -> Result<&str> {
        self.primary_key
            .get_or_try_init(|| {
                let table = self.source.table();
                let columns = self.source.primary_key_columns(table)?;

                if columns.len() != 1 {
                    return Err(Error::invalid_primary_key(table, columns));
                }

                let qualifier = self.source.alias().unwrap_or(table);
                Ok(format!("{qualifier}.{}", columns[0]))
            })
            .map(String::as_str)
    }
}
