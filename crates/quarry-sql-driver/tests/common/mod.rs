#![allow(dead_code)]

use quarry_sql_core::SqlValue;
use quarry_sql_driver::{MemoryResult, Position, SqlQuery};

pub const SELECT: &str = "select * from torrents";

/// A driver answering [`SELECT`] with `rows` rows of `(id, name)`.
pub fn driver(rows: i64) -> MemoryResult {
    let rows = (0..rows)
        .map(|id| vec![SqlValue::Int(id), SqlValue::Text(format!("torrent{id}"))])
        .collect();
    MemoryResult::new().with_rows(SELECT, &["id", "name"], rows)
}

/// An executed query over `rows` rows.
pub fn executed(rows: i64) -> SqlQuery<MemoryResult> {
    let mut query = SqlQuery::new(driver(rows));
    assert!(query.exec(SELECT).unwrap());
    query
}

/// An executed query positioned at `at` with an empty fetch log.
pub fn positioned(rows: i64, at: Position) -> SqlQuery<MemoryResult> {
    let mut query = executed(rows);
    match at {
        Position::BeforeFirstRow => {}
        Position::Row(row) => {
            assert!(query.seek(i64::try_from(row).unwrap(), false));
        }
        Position::AfterLastRow => while query.next() {},
    }
    assert_eq!(query.at(), at);
    query.result_mut().clear_fetch_calls();
    query
}
