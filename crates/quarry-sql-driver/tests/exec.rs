//! Tests for statement execution and error reporting.

mod common;

use common::*;
use quarry_sql_core::builder::QueryBuilder;
use quarry_sql_core::grammar::{GenericGrammar, MySqlGrammar};
use quarry_sql_core::{CompileError, SqlValue};
use quarry_sql_driver::{
    ExecutedStatement, MemoryResult, Position, QueryError, SqlError, SqlErrorKind, SqlQuery,
};

#[test]
fn empty_query_is_a_usage_error() {
    let mut query = SqlQuery::new(driver(1));
    assert_eq!(query.exec("   "), Err(QueryError::EmptyQuery));
    assert_eq!(query.prepare(""), Err(QueryError::EmptyQuery));
}

#[test]
fn exec_prepared_without_prepare_is_a_usage_error() {
    let mut query = SqlQuery::new(driver(1));
    assert_eq!(query.exec_prepared(), Err(QueryError::NotPrepared));
}

#[test]
fn is_null_before_positioning_is_a_usage_error() {
    let mut query = executed(2);
    assert_eq!(query.is_null(0), Err(QueryError::NotPositioned));
    assert!(query.next());
    assert_eq!(query.is_null(0), Ok(false));
}

#[test]
fn closed_connection_reports_false() {
    let mut query = SqlQuery::new(driver(1));
    query.result_mut().set_open(false);

    assert_eq!(query.exec(SELECT), Ok(false));
    let error = query.last_error().unwrap();
    assert_eq!(error.kind, SqlErrorKind::Connection);
    assert!(!query.is_active());
    assert!(query.result().executed().is_empty());
}

#[test]
fn driver_error_is_kept_in_last_error() {
    let rejected = SqlError::statement("syntax error").with_native_code("1064");
    let mut query = SqlQuery::new(driver(1).with_error("selec 1", rejected.clone()));

    assert_eq!(query.exec("selec 1"), Ok(false));
    assert_eq!(query.last_error(), Some(&rejected));
    assert_eq!(query.last_query(), "selec 1");
    assert!(!query.is_active());

    assert_eq!(query.exec(SELECT), Ok(true));
    assert_eq!(query.last_error(), None);
}

#[test]
fn exec_resets_the_cursor() {
    let mut query = executed(3);
    assert!(query.seek(2, false));
    assert!(query.exec(SELECT).unwrap());
    assert_eq!(query.at(), Position::BeforeFirstRow);
    assert_eq!(query.size(), Some(3));
}

#[test]
fn size_depends_on_driver_support() {
    let mut query = SqlQuery::new(driver(3).without_size());
    assert!(query.exec(SELECT).unwrap());
    assert_eq!(query.size(), None);
}

#[test]
fn prepared_statement_runs_with_bound_values() {
    let sql = "insert into torrents (name, size) values (?, ?)";
    let mut query = SqlQuery::new(MemoryResult::new().with_affected(
        sql,
        1,
        Some(SqlValue::Int(42)),
    ));

    assert!(query.prepare(sql).unwrap());
    query.add_bind_value("ubuntu.iso");
    query.add_bind_value(4_096_i64);
    assert!(query.exec_prepared().unwrap());

    assert_eq!(query.num_rows_affected(), Some(1));
    assert_eq!(query.last_insert_id(), Some(SqlValue::Int(42)));
    assert_eq!(
        query.result().executed(),
        &[ExecutedStatement {
            sql: String::from(sql),
            bindings: vec![
                SqlValue::Text(String::from("ubuntu.iso")),
                SqlValue::Int(4096),
            ],
        }]
    );
}

#[test]
fn compiled_select_runs_with_its_bindings() {
    let sql = "select * from `torrents` where `size` > ? and `name` like ?";
    let mut query = SqlQuery::new(MemoryResult::new().with_rows(
        sql,
        &["id"],
        vec![vec![SqlValue::Int(5)]],
    ));
    let torrents = QueryBuilder::table("torrents")
        .where_("size", ">", 100)
        .where_("name", "like", "%iso");

    assert!(query.exec_select(&MySqlGrammar::new(), &torrents).unwrap());
    assert!(query.next());
    assert_eq!(query.value_by_name("id"), SqlValue::Int(5));
    assert_eq!(
        query.result().executed()[0].bindings,
        vec![SqlValue::Int(100), SqlValue::Text(String::from("%iso"))]
    );
}

#[test]
fn compile_errors_surface_as_usage_errors() {
    let mut query = SqlQuery::new(MemoryResult::new());
    let invalid = QueryBuilder::table("torrents").distinct_on(&["name"]);
    assert_eq!(
        query.exec_select(&GenericGrammar::new(), &invalid),
        Err(QueryError::Compile(CompileError::UnsupportedFeature {
            dialect: "generic",
            feature: "distinct on",
        }))
    );
    assert!(query.result().executed().is_empty());
}

#[test]
fn finish_keeps_the_query_for_reuse() {
    let mut query = executed(2);
    assert!(query.next());
    query.finish();
    assert!(!query.is_active());
    assert_eq!(query.value(0), SqlValue::Null);
    assert_eq!(query.last_insert_id(), None);

    let sql = query.last_query().to_owned();
    assert!(query.exec(&sql).unwrap());
    assert!(query.next());
}
