//! The result cursor.
//!
//! [`SqlQuery`] executes one statement at a time on a [`SqlResult`] and
//! walks its rows. Every navigation is mapped onto the driver's fetch
//! primitives, preferring the sequential ones.
//!
//! Navigation never fails with an error: running out of rows is reported
//! as `false`. Driver errors are reported as `false` too and kept in
//! [`SqlQuery::last_error`]. Only misuse of the API returns `Err`.

use std::time::Instant;

use quarry_sql_core::builder::QueryBuilder;
use quarry_sql_core::{CompiledStatement, Grammar, SqlValue, ToSqlValue};
use tracing::{debug, warn};

use crate::error::{QueryError, Result, SqlError};
use crate::record::SqlRecord;
use crate::result::{ExecOutcome, SqlResult};

/// Cursor position within a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Position {
    #[default]
    BeforeFirstRow,
    /// Zero-based row index.
    Row(usize),
    AfterLastRow,
}

/// A statement and the cursor over its result.
#[derive(Debug)]
pub struct SqlQuery<R: SqlResult> {
    result: R,
    at: Position,
    active: bool,
    select: bool,
    prepared: bool,
    last_query: String,
    last_error: Option<SqlError>,
    bound_values: Vec<SqlValue>,
    affected: Option<u64>,
}

impl<R: SqlResult> SqlQuery<R> {
    /// Wraps a driver result.
    pub const fn new(result: R) -> Self {
        Self {
            result,
            at: Position::BeforeFirstRow,
            active: false,
            select: false,
            prepared: false,
            last_query: String::new(),
            last_error: None,
            bound_values: Vec::new(),
            affected: None,
        }
    }

    // ----- execution -----

    /// Executes `sql` directly.
    ///
    /// Returns `Ok(false)` when the driver fails; see [`Self::last_error`].
    pub fn exec(&mut self, sql: &str) -> Result<bool> {
        let sql = sql.trim();
        if !self.begin(sql, "exec")? {
            return Ok(false);
        }
        self.last_query = String::from(sql);

        let started = Instant::now();
        let outcome = self.result.exec(sql);
        Ok(self.complete(outcome, started))
    }

    /// Prepares `sql` for [`Self::exec_prepared`].
    pub fn prepare(&mut self, sql: &str) -> Result<bool> {
        let sql = sql.trim();
        if !self.begin(sql, "prepare")? {
            return Ok(false);
        }
        self.last_query = String::from(sql);

        match self.result.prepare(sql) {
            Ok(()) => {
                self.prepared = true;
                Ok(true)
            }
            Err(error) => {
                self.record_error(error);
                Ok(false)
            }
        }
    }

    /// Executes the prepared statement with the bound values.
    pub fn exec_prepared(&mut self) -> Result<bool> {
        if !self.prepared {
            return Err(QueryError::NotPrepared);
        }
        self.last_error = None;
        self.active = false;
        self.at = Position::BeforeFirstRow;

        let started = Instant::now();
        let outcome = self.result.exec_prepared(&self.bound_values);
        Ok(self.complete(outcome, started))
    }

    /// Binds `value` to placeholder `index`, padding earlier ones with NULL.
    pub fn bind_value<T: ToSqlValue>(&mut self, index: usize, value: T) {
        if index >= self.bound_values.len() {
            self.bound_values.resize(index + 1, SqlValue::Null);
        }
        self.bound_values[index] = value.to_sql_value();
    }

    /// Binds `value` to the placeholder after the last bound one.
    pub fn add_bind_value<T: ToSqlValue>(&mut self, value: T) {
        self.bound_values.push(value.to_sql_value());
    }

    /// Prepares and executes a compiled statement with its bindings.
    pub fn exec_statement(&mut self, statement: CompiledStatement) -> Result<bool> {
        let CompiledStatement { sql, bindings } = statement;
        if !self.prepare(&sql)? {
            return Ok(false);
        }
        self.bound_values = bindings;
        self.exec_prepared()
    }

    /// Compiles `query` with `grammar` and executes it as a select.
    pub fn exec_select(&mut self, grammar: &dyn Grammar, query: &QueryBuilder) -> Result<bool> {
        let statement = grammar.select_statement(query)?;
        self.exec_statement(statement)
    }

    /// Resets the state for a new statement. `Ok(false)` when the
    /// connection is closed.
    fn begin(&mut self, sql: &str, operation: &'static str) -> Result<bool> {
        if sql.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        if !self.result.is_open() {
            warn!(operation, sql, "Database not open");
            self.last_error = Some(SqlError::connection("database not open"));
            return Ok(false);
        }

        self.bound_values.clear();
        self.active = false;
        self.select = false;
        self.prepared = false;
        self.affected = None;
        self.last_error = None;
        self.at = Position::BeforeFirstRow;
        Ok(true)
    }

    fn complete(
        &mut self,
        outcome: std::result::Result<ExecOutcome, SqlError>,
        started: Instant,
    ) -> bool {
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match outcome {
            Ok(outcome) => {
                self.active = true;
                self.select = outcome.is_select;
                self.affected = outcome.rows_affected;
                debug!(
                    sql = %self.last_query,
                    elapsed_ms,
                    size = ?self.size(),
                    affected = ?self.affected,
                    "Executed query"
                );
                true
            }
            Err(error) => {
                debug!(sql = %self.last_query, elapsed_ms, error = %error, "Query failed");
                self.record_error(error);
                false
            }
        }
    }

    fn record_error(&mut self, error: SqlError) {
        self.active = false;
        self.last_error = Some(error);
    }

    // ----- navigation -----

    /// Moves to the next row.
    pub fn next(&mut self) -> bool {
        if !self.can_navigate() {
            return false;
        }
        match self.at {
            Position::BeforeFirstRow => self.fetch_first(),
            Position::AfterLastRow => false,
            Position::Row(current) => self.fetch_next(current),
        }
    }

    /// Moves to the previous row.
    pub fn previous(&mut self) -> bool {
        if !self.can_navigate() {
            return false;
        }
        match self.at {
            Position::BeforeFirstRow => false,
            Position::AfterLastRow => self.fetch_last(),
            Position::Row(current) => self.fetch_previous(current),
        }
    }

    pub fn first(&mut self) -> bool {
        self.can_navigate() && self.fetch_first()
    }

    pub fn last(&mut self) -> bool {
        self.can_navigate() && self.fetch_last()
    }

    /// Moves to row `index`, or `index` rows away from the current one
    /// when `relative` is set.
    pub fn seek(&mut self, index: i64, relative: bool) -> bool {
        if !self.can_navigate() {
            return false;
        }
        let origin = self.at;

        let target = if relative {
            self.resolve_relative(index)
        } else {
            self.row_or_reset(index)
        };
        match target {
            Some(target) => self.fetch_target(origin, target),
            None => false,
        }
    }

    /// Absolute row index `index` rows away from the current position.
    fn resolve_relative(&mut self, index: i64) -> Option<usize> {
        match self.at {
            Position::BeforeFirstRow if index > 0 => usize::try_from(index - 1).ok(),
            Position::BeforeFirstRow => None,
            Position::AfterLastRow if index < 0 => {
                if !self.fetch_last() {
                    return None;
                }
                let Position::Row(last) = self.at else {
                    return None;
                };
                let target = i64::try_from(last).ok()?.checked_add(index + 1)?;
                self.row_or_reset(target)
            }
            Position::AfterLastRow => None,
            Position::Row(current) => {
                let target = i64::try_from(current).ok()?.checked_add(index)?;
                self.row_or_reset(target)
            }
        }
    }

    fn row_or_reset(&mut self, target: i64) -> Option<usize> {
        let row = usize::try_from(target).ok();
        if row.is_none() {
            self.at = Position::BeforeFirstRow;
        }
        row
    }

    /// Uses the cheapest primitive that reaches `target` from `origin`.
    fn fetch_target(&mut self, origin: Position, target: usize) -> bool {
        match origin {
            Position::BeforeFirstRow if target == 0 => self.fetch_first(),
            Position::Row(current) if current.checked_add(1) == Some(target) => {
                self.fetch_next(current)
            }
            Position::Row(current) if current.checked_sub(1) == Some(target) => {
                self.fetch_previous(current)
            }
            _ => {
                if self.result.fetch(target) {
                    self.at = Position::Row(target);
                    true
                } else {
                    self.at = Position::AfterLastRow;
                    false
                }
            }
        }
    }

    fn fetch_first(&mut self) -> bool {
        let row = self.result.fetch_first().then_some(0);
        self.settle(row, Position::AfterLastRow)
    }

    fn fetch_last(&mut self) -> bool {
        let last = self.result.fetch_last();
        self.settle(last, Position::AfterLastRow)
    }

    fn fetch_next(&mut self, current: usize) -> bool {
        let row = self
            .result
            .fetch_next(current)
            .then(|| current.checked_add(1))
            .flatten();
        self.settle(row, Position::AfterLastRow)
    }

    fn fetch_previous(&mut self, current: usize) -> bool {
        let row = self
            .result
            .fetch_previous(current)
            .then(|| current.checked_sub(1))
            .flatten();
        self.settle(row, Position::BeforeFirstRow)
    }

    fn settle(&mut self, row: Option<usize>, otherwise: Position) -> bool {
        self.at = row.map_or(otherwise, Position::Row);
        row.is_some()
    }

    const fn can_navigate(&self) -> bool {
        self.active && self.select
    }

    // ----- row access -----

    /// Value of column `index` on the current row, `Null` when the cursor
    /// is not on a row.
    pub fn value(&self, index: usize) -> SqlValue {
        if !(self.active && self.select && self.is_valid()) {
            warn!(index, "Not positioned on a valid record");
            return SqlValue::Null;
        }
        self.result.data(index).unwrap_or_else(|| {
            warn!(index, "Field index out of range");
            SqlValue::Null
        })
    }

    /// Value of the column called `name` on the current row.
    pub fn value_by_name(&self, name: &str) -> SqlValue {
        match self.result.record().index_of(name) {
            Some(index) => self.value(index),
            None => {
                warn!(name, "Unknown field name");
                SqlValue::Null
            }
        }
    }

    /// Whether column `index` on the current row is NULL.
    ///
    /// # Errors
    ///
    /// [`QueryError::NotPositioned`] unless the cursor is on a row.
    pub fn is_null(&self, index: usize) -> Result<bool> {
        if self.active && self.is_valid() {
            Ok(self.result.is_null(index))
        } else {
            Err(QueryError::NotPositioned)
        }
    }

    /// Whether the column called `name` is NULL. Unknown names are NULL.
    pub fn is_null_by_name(&self, name: &str) -> Result<bool> {
        if let Some(index) = self.result.record().index_of(name) {
            return self.is_null(index);
        }
        warn!(name, "Unknown field name");
        Ok(true)
    }

    /// Field metadata, with values when the cursor is on a row.
    pub fn record(&self) -> SqlRecord {
        if !(self.active && self.select) {
            return SqlRecord::new();
        }
        let mut record = self.result.record();
        if self.is_valid() {
            for index in 0..record.count() {
                record.set_value(index, self.value(index));
            }
        }
        record
    }

    // ----- result metadata -----

    /// Rows in the result, if the driver can tell and the statement
    /// returns rows.
    pub fn size(&self) -> Option<usize> {
        if !(self.active && self.select) {
            return None;
        }
        self.result.size()
    }

    pub const fn num_rows_affected(&self) -> Option<u64> {
        if self.active {
            self.affected
        } else {
            None
        }
    }

    pub fn last_insert_id(&self) -> Option<SqlValue> {
        if self.active {
            self.result.last_insert_id()
        } else {
            None
        }
    }

    // ----- lifecycle -----

    /// Releases the result set, keeping the query and its bound values.
    pub fn finish(&mut self) {
        if !self.active {
            return;
        }
        self.last_error = None;
        self.at = Position::BeforeFirstRow;
        self.result.detach_from_result_set();
        self.active = false;
    }

    /// Resets to a fresh query on the same driver.
    pub fn clear(&mut self) {
        self.result.detach_from_result_set();
        self.at = Position::BeforeFirstRow;
        self.active = false;
        self.select = false;
        self.prepared = false;
        self.affected = None;
        self.last_error = None;
        self.last_query.clear();
        self.bound_values.clear();
    }

    // ----- accessors -----

    pub const fn at(&self) -> Position {
        self.at
    }

    /// Whether the cursor is on a row.
    pub const fn is_valid(&self) -> bool {
        matches!(self.at, Position::Row(_))
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub const fn is_select(&self) -> bool {
        self.select
    }

    pub const fn last_error(&self) -> Option<&SqlError> {
        self.last_error.as_ref()
    }

    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    pub fn bound_values(&self) -> &[SqlValue] {
        &self.bound_values
    }

    pub const fn result(&self) -> &R {
        &self.result
    }

    pub fn result_mut(&mut self) -> &mut R {
        &mut self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{FetchCall, MemoryResult};

    const SELECT: &str = "select * from users";

    fn query(rows: i64) -> SqlQuery<MemoryResult> {
        let rows = (0..rows)
            .map(|id| vec![SqlValue::Int(id), SqlValue::Text(format!("user{id}"))])
            .collect();
        SqlQuery::new(MemoryResult::new().with_rows(SELECT, &["id", "name"], rows))
    }

    #[test]
    fn test_next_walks_rows_then_exhausts() {
        let mut query = query(2);
        assert!(query.exec(SELECT).unwrap());
        assert!(query.next());
        assert_eq!(query.at(), Position::Row(0));
        assert!(query.next());
        assert!(!query.next());
        assert_eq!(query.at(), Position::AfterLastRow);
        assert!(!query.next());
        assert_eq!(
            query.result().fetch_calls(),
            &[FetchCall::First, FetchCall::Next, FetchCall::Next]
        );
    }

    #[test]
    fn test_previous_from_after_last_fetches_last() {
        let mut query = query(3);
        query.exec(SELECT).unwrap();
        while query.next() {}
        assert!(query.previous());
        assert_eq!(query.at(), Position::Row(2));
        assert!(query.previous());
        assert!(query.previous());
        assert!(!query.previous());
        assert_eq!(query.at(), Position::BeforeFirstRow);
        assert!(!query.previous());
    }

    #[test]
    fn test_empty_result() {
        let mut query = query(0);
        query.exec(SELECT).unwrap();
        assert!(!query.next());
        assert_eq!(query.at(), Position::AfterLastRow);
        assert!(!query.last());
        assert_eq!(query.size(), Some(0));
    }

    #[test]
    fn test_value_access() {
        let mut query = query(2);
        query.exec(SELECT).unwrap();
        assert_eq!(query.value(0), SqlValue::Null);
        assert!(query.seek(1, false));
        assert_eq!(query.value(0), SqlValue::Int(1));
        assert_eq!(
            query.value_by_name("NAME"),
            SqlValue::Text(String::from("user1"))
        );
        assert_eq!(query.value_by_name("email"), SqlValue::Null);
        assert_eq!(query.value(7), SqlValue::Null);
        assert_eq!(query.is_null(1), Ok(false));
        assert_eq!(query.is_null_by_name("email"), Ok(true));
    }

    #[test]
    fn test_record_carries_values_on_a_row() {
        let mut query = query(1);
        query.exec(SELECT).unwrap();
        assert_eq!(query.record().value(0), SqlValue::Null);
        query.next();
        let record = query.record();
        assert_eq!(record.value_by_name("id"), SqlValue::Int(0));
        assert_eq!(record.count(), 2);
    }

    #[test]
    fn test_bind_value_pads_with_null() {
        let mut query = query(0);
        query.bind_value(2, "c");
        query.add_bind_value(4);
        assert_eq!(
            query.bound_values(),
            &[
                SqlValue::Null,
                SqlValue::Null,
                SqlValue::Text(String::from("c")),
                SqlValue::Int(4),
            ]
        );
    }

    #[test]
    fn test_finish_and_clear() {
        let mut query = query(2);
        query.exec(SELECT).unwrap();
        query.next();
        query.finish();
        assert!(!query.is_active());
        assert_eq!(query.at(), Position::BeforeFirstRow);
        assert_eq!(query.last_query(), SELECT);
        assert!(!query.next());

        query.clear();
        assert_eq!(query.last_query(), "");
        assert!(!query.is_select());
        assert_eq!(query.exec_prepared(), Err(QueryError::NotPrepared));
    }
}
