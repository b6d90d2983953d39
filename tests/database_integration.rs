//! Database integration tests with an in-memory DuckDB
//!
//! Set RUST_LOG=pagewise=debug to see the generated SQL.

use duckdb::Connection;
use pagewise::{DuckDbSource, Error, Pagination, Paginator, QuerySource, SqlQuery};
use serde_json::{json, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Items, their children, and a table with a composite key
fn connection() -> Connection {
    init_tracing();

    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE items (id INTEGER PRIMARY KEY, title VARCHAR NOT NULL);
         CREATE TABLE child_items (
             id INTEGER PRIMARY KEY,
             child_title VARCHAR NOT NULL,
             item_id INTEGER NOT NULL
         );
         CREATE TABLE item_tags (item_id INTEGER, tag VARCHAR, PRIMARY KEY (item_id, tag));
         CREATE TABLE audit_log (message VARCHAR);",
    )
    .unwrap();
    conn
}

fn add_item(conn: &Connection, id: i32, title: &str) {
    conn.execute("INSERT INTO items VALUES (?, ?)", duckdb::params![id, title])
        .unwrap();
}

fn add_child(conn: &Connection, id: i32, title: &str, item_id: i32) {
    conn.execute(
        "INSERT INTO child_items VALUES (?, ?, ?)",
        duckdb::params![id, title, item_id],
    )
    .unwrap();
}

// ============================================================================
// Basic Pagination
// ============================================================================

#[test]
fn test_default_zero_items() {
    let conn = connection();
    let source = DuckDbSource::new(&conn, "items").with_alias("i");
    let pagination = Pagination::new(1, 15);
    let paginator = Paginator::new(&pagination, &source);

    assert!(paginator.get_items().unwrap().is_empty());
    assert_eq!(paginator.get_total_items().unwrap(), 0);
    assert_eq!(paginator.get_total_pages().unwrap(), 0);
}

#[test]
fn test_high_page_when_no_items() {
    let conn = connection();
    let source = DuckDbSource::new(&conn, "items").with_alias("i");
    let pagination = Pagination::new(10, 15);
    let paginator = Paginator::new(&pagination, &source);

    assert!(paginator.get_items().unwrap().is_empty());
    assert_eq!(paginator.get_total_items().unwrap(), 0);
}

#[test]
fn test_default_one_item_select_everything() {
    let conn = connection();
    add_item(&conn, 1, "my-title");

    let source = DuckDbSource::new(&conn, "items").with_alias("i");
    let pagination = Pagination::new(1, 15);
    let paginator = Paginator::new(&pagination, &source);

    let items = paginator.get_items().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(Value::Object(items[0].clone()), json!({"id": 1, "title": "my-title"}));
}

#[test]
fn test_select_everything_explicitly_without_alias() {
    let conn = connection();
    add_item(&conn, 1, "my-title");

    let source = DuckDbSource::new(&conn, "items");
    let pagination = Pagination::new(1, 15);
    let paginator = Paginator::new(&pagination, &source).with_select("*");

    let items = paginator.get_items().unwrap();
    assert_eq!(items[0].get("title"), Some(&json!("my-title")));
}

#[test]
fn test_select_only_title() {
    let conn = connection();
    add_item(&conn, 1, "my-title");

    let source = DuckDbSource::new(&conn, "items").with_alias("i");
    let pagination = Pagination::new(1, 15);
    let paginator = Paginator::new(&pagination, &source).with_select("i.title");

    let items = paginator.get_items().unwrap();
    assert_eq!(items.len(), 1);
    assert!(!items[0].contains_key("id"));
    assert_eq!(items[0].get("title"), Some(&json!("my-title")));
}

#[test]
fn test_filter_two_items_to_one() {
    let conn = connection();
    add_item(&conn, 1, "my-title");
    add_item(&conn, 2, "my-title-1");

    let source = DuckDbSource::new(&conn, "items").with_alias("i");
    let pagination = Pagination::new(1, 15);
    let paginator =
        Paginator::new(&pagination, &source).with_filter_criteria(|query: &mut SqlQuery| {
            query.and_where("i.title = ?").bind("my-title-1".to_string());
        });

    let items = paginator.get_items().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].get("id"), Some(&json!(2)));
    assert_eq!(paginator.get_total_items().unwrap(), 1);
}

#[test]
fn test_transform_row_to_struct() {
    #[derive(Debug, PartialEq)]
    struct Item {
        id: i64,
        title: String,
    }

    let conn = connection();
    add_item(&conn, 1, "my-title");

    let source = DuckDbSource::new(&conn, "items").with_alias("i");
    let pagination = Pagination::new(1, 15);
    let paginator = Paginator::new(&pagination, &source).with_transformer(|row| Item {
        id: row.get("id").and_then(Value::as_i64).unwrap_or_default(),
        title: row
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    });

    assert_eq!(
        paginator.get_items().unwrap(),
        &[Item {
            id: 1,
            title: "my-title".to_string()
        }]
    );
}

#[test]
fn test_pages_follow_ordering() {
    let conn = connection();
    for id in 1..=7 {
        add_item(&conn, id, &format!("title-{id}"));
    }

    let source = DuckDbSource::new(&conn, "items").with_alias("i");
    let pagination = Pagination::new(3, 3);
    let paginator = Paginator::new(&pagination, &source)
        .with_common_criteria(|query: &mut SqlQuery| {
            query.order_by("i.id DESC");
        })
        .with_transformer(|row| row.get("id").and_then(Value::as_i64));

    assert_eq!(paginator.get_items().unwrap(), &[Some(1)]);
    assert_eq!(paginator.get_total_items().unwrap(), 7);
    assert_eq!(paginator.get_total_pages().unwrap(), 3);
    assert!(!paginator.has_next_page().unwrap());
    assert_eq!(
        paginator.previous_page_url().unwrap().as_deref(),
        Some("/?page=2&perPage=3")
    );
}

// ============================================================================
// Join-aware Counting
// ============================================================================

fn join_children(query: &mut SqlQuery) {
    query.inner_join("child_items", "ci", "ci.item_id = i.id");
}

#[test]
fn test_one_to_two_join_counted_naively() {
    let conn = connection();
    add_item(&conn, 1, "parent");
    add_child(&conn, 1, "child-a", 1);
    add_child(&conn, 2, "child-b", 1);

    let source = DuckDbSource::new(&conn, "items").with_alias("i");
    let pagination = Pagination::new(1, 15);
    let paginator = Paginator::new(&pagination, &source).with_common_criteria(join_children);

    assert_eq!(paginator.get_total_items().unwrap(), 2);
}

#[test]
fn test_one_to_two_join_counted_by_primary_key() {
    let conn = connection();
    add_item(&conn, 1, "parent");
    add_child(&conn, 1, "child-a", 1);
    add_child(&conn, 2, "child-b", 1);

    let source = DuckDbSource::new(&conn, "items").with_alias("i");
    let pagination = Pagination::new(1, 15);
    let paginator = Paginator::new(&pagination, &source)
        .with_common_criteria(join_children)
        .with_select("DISTINCT i.*")
        .has_joins_in_query();

    assert_eq!(paginator.get_total_items().unwrap(), 1);
    assert_eq!(paginator.get_items().unwrap().len(), 1);
}

#[test]
fn test_one_to_two_join_counted_by_primary_key_without_alias() {
    let conn = connection();
    add_item(&conn, 1, "parent");
    add_item(&conn, 2, "lonely");
    add_child(&conn, 1, "child-a", 1);
    add_child(&conn, 2, "child-b", 1);

    let source = DuckDbSource::new(&conn, "items");
    let pagination = Pagination::new(1, 15);
    let paginator = Paginator::new(&pagination, &source)
        .with_common_criteria(|query: &mut SqlQuery| {
            query.inner_join("child_items", "c", "c.item_id = items.id");
        })
        .with_select("DISTINCT items.*")
        .has_joins_in_query();

    assert_eq!(paginator.get_total_items().unwrap(), 1);
    let items = paginator.get_items().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].get("title"), Some(&json!("parent")));
}

#[test]
fn test_paginate_children_of_item_by_title() {
    let conn = connection();
    add_item(&conn, 1, "my-parent");
    add_item(&conn, 2, "other-parent");
    add_child(&conn, 1, "my-child", 1);
    add_child(&conn, 2, "other-child", 2);

    let source = DuckDbSource::new(&conn, "child_items").with_alias("ci");
    let pagination = Pagination::new(1, 15);
    let paginator = Paginator::new(&pagination, &source)
        .has_joins_in_query()
        .with_common_criteria(|query: &mut SqlQuery| {
            query
                .inner_join("items", "i", "i.id = ci.item_id AND i.title = ?")
                .bind("my-parent".to_string());
        })
        .with_get_items_criteria(|query: &mut SqlQuery| {
            query.add_select("i.title AS parent_title");
        });

    let items = paginator.get_items().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(
        Value::Object(items[0].clone()),
        json!({
            "id": 1,
            "child_title": "my-child",
            "item_id": 1,
            "parent_title": "my-parent"
        })
    );
    assert_eq!(paginator.get_total_items().unwrap(), 1);
}

#[test]
fn test_composite_primary_key_rejected() {
    let conn = connection();
    let source = DuckDbSource::new(&conn, "item_tags").with_alias("t");
    let pagination = Pagination::new(1, 15);
    let paginator = Paginator::new(&pagination, &source).has_joins_in_query();

    match paginator.get_total_items() {
        Err(Error::InvalidPrimaryKey { table, columns }) => {
            assert_eq!(table, "item_tags");
            assert_eq!(columns, vec!["item_id", "tag"]);
        }
        other => panic!("Expected InvalidPrimaryKey, got {other:?}"),
    }
}

#[test]
fn test_missing_primary_key_rejected() {
    let conn = connection();
    let source = DuckDbSource::new(&conn, "audit_log");
    let pagination = Pagination::new(1, 15);
    let paginator = Paginator::new(&pagination, &source).has_joins_in_query();

    let err = paginator.get_total_items().unwrap_err();
    assert_eq!(
        err.to_string(),
        "No primary key identified for table \"audit_log\""
    );
    assert!(err.is_configuration_error());
}

// ============================================================================
// Backend Errors
// ============================================================================

#[test]
fn test_sql_error_aborts_page() {
    let conn = connection();
    let source = DuckDbSource::new(&conn, "items").with_alias("i");
    let pagination = Pagination::new(1, 15);
    let paginator =
        Paginator::new(&pagination, &source).with_filter_criteria(|query: &mut SqlQuery| {
            query.and_where("i.no_such_column = 1");
        });

    let err = paginator.get_items().unwrap_err();
    assert!(matches!(err, Error::Database(_)));
    assert!(paginator.to_page().is_err());
}

#[test]
fn test_source_reports_table_and_alias() {
    let conn = connection();
    let source = DuckDbSource::new(&conn, "items").with_alias("i");
    assert_eq!(source.table(), "items");
    assert_eq!(source.alias(), Some("i"));
}
