//! In-memory query source
//!
//! Paginates a slice with predicate filters. There are no joins in memory,
//! so no primary key is reported and join-aware counting is unavailable.

use crate::error::Result;
use crate::pagination::PageWindow;
use crate::paginator::{CountExpression, PageQuery, QuerySource};
use std::fmt;

type Predicate<T> = Box<dyn Fn(&T) -> bool>;

/// Query over an in-memory collection
pub struct CollectionQuery<T> {
    predicates: Vec<Predicate<T>>,
    window: Option<PageWindow>,
}

impl<T> CollectionQuery<T> {
    fn new() -> Self {
        Self {
            predicates: Vec::new(),
            window: None,
        }
    }

    /// Keep only items matching `predicate`
    pub fn filter(&mut self, predicate: impl Fn(&T) -> bool + 'static) -> &mut Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    fn matches(&self, item: &T) -> bool {
        self.predicates.iter().all(|predicate| predicate(item))
    }
}

impl<T> PageQuery for CollectionQuery<T> {
    // Items are returned whole.
    fn set_select(&mut self, _select: &str) {}

    fn set_window(&mut self, window: PageWindow) {
        self.window = Some(window);
    }
}

impl<T> fmt::Debug for CollectionQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionQuery")
            .field("predicates", &self.predicates.len())
            .field("window", &self.window)
            .finish()
    }
}

/// Paginates a borrowed slice, cloning the items of the requested page
#[derive(Debug, Clone)]
pub struct CollectionSource<'d, T> {
    name: String,
    items: &'d [T],
}

impl<'d, T> CollectionSource<'d, T> {
    /// Create a source named `name` (used in logs and errors)
    pub fn new(name: impl Into<String>, items: &'d [T]) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

impl<T: Clone> QuerySource for CollectionSource<'_, T> {
    type Query = CollectionQuery<T>;
    type Row = T;

    fn table(&self) -> &str {
        &self.name
    }

    fn alias(&self) -> Option<&str> {
        None
    }

    fn create_base_query(&self) -> CollectionQuery<T> {
        CollectionQuery::new()
    }

    fn execute_for_rows(&self, query: CollectionQuery<T>) -> Result<Vec<T>> {
        let matching = self.items.iter().filter(|item| query.matches(item));

        let rows = match query.window {
            Some(window) => matching
                .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
                .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        };

        Ok(rows)
    }

    fn execute_for_count(
        &self,
        query: CollectionQuery<T>,
        _expression: &CountExpression,
    ) -> Result<u64> {
        // Without joins every item is distinct, so both expressions agree.
        Ok(self.items.iter().filter(|item| query.matches(item)).count() as u64)
    }

    fn primary_key_columns(&self, _table: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
