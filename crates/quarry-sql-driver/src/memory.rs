//! An in-memory driver with scripted responses.
//!
//! [`MemoryResult`] answers each SQL string with a response registered up
//! front and records every fetch primitive the cursor asks for, which makes
//! it suitable for exercising [`SqlQuery`](crate::SqlQuery) without a
//! database.

use std::collections::HashMap;

use quarry_sql_core::SqlValue;

use crate::error::SqlError;
use crate::record::{SqlField, SqlRecord};
use crate::result::{ExecOutcome, SqlResult};

/// A scripted answer to one SQL string.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// A row-returning statement.
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<SqlValue>>,
    },
    /// A statement that changes rows.
    Affected {
        rows: u64,
        last_insert_id: Option<SqlValue>,
    },
    /// The database rejects the statement.
    Error(SqlError),
}

/// A fetch primitive invoked on the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchCall {
    Fetch(usize),
    First,
    Last,
    Next,
    Previous,
}

/// A statement sent to the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    pub sql: String,
    pub bindings: Vec<SqlValue>,
}

#[derive(Debug)]
struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
    row: Option<usize>,
}

/// In-memory [`SqlResult`].
#[derive(Debug)]
pub struct MemoryResult {
    responses: HashMap<String, Response>,
    open: bool,
    supports_size: bool,
    prepared: Option<String>,
    result_set: Option<ResultSet>,
    last_insert_id: Option<SqlValue>,
    fetch_calls: Vec<FetchCall>,
    executed: Vec<ExecutedStatement>,
}

impl Default for MemoryResult {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryResult {
    /// Creates an open driver with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            open: true,
            supports_size: true,
            prepared: None,
            result_set: None,
            last_insert_id: None,
            fetch_calls: Vec::new(),
            executed: Vec::new(),
        }
    }

    /// Registers `response` for `sql`.
    #[must_use]
    pub fn with_response(mut self, sql: &str, response: Response) -> Self {
        self.responses.insert(String::from(sql.trim()), response);
        self
    }

    /// Registers a row-returning response for `sql`.
    #[must_use]
    pub fn with_rows(self, sql: &str, columns: &[&str], rows: Vec<Vec<SqlValue>>) -> Self {
        let columns = columns.iter().map(|column| String::from(*column)).collect();
        self.with_response(sql, Response::Rows { columns, rows })
    }

    /// Registers an affected-rows response for `sql`.
    #[must_use]
    pub fn with_affected(self, sql: &str, rows: u64, last_insert_id: Option<SqlValue>) -> Self {
        self.with_response(
            sql,
            Response::Affected {
                rows,
                last_insert_id,
            },
        )
    }

    /// Registers a failure for `sql`.
    #[must_use]
    pub fn with_error(self, sql: &str, error: SqlError) -> Self {
        self.with_response(sql, Response::Error(error))
    }

    /// Stops reporting the result size, like drivers without that feature.
    #[must_use]
    pub const fn without_size(mut self) -> Self {
        self.supports_size = false;
        self
    }

    /// Opens or closes the simulated connection.
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Fetch primitives invoked so far, oldest first.
    #[must_use]
    pub fn fetch_calls(&self) -> &[FetchCall] {
        &self.fetch_calls
    }

    pub fn clear_fetch_calls(&mut self) {
        self.fetch_calls.clear();
    }

    /// Statements executed so far, oldest first.
    #[must_use]
    pub fn executed(&self) -> &[ExecutedStatement] {
        &self.executed
    }

    fn run(&mut self, sql: &str, bindings: &[SqlValue]) -> Result<ExecOutcome, SqlError> {
        self.executed.push(ExecutedStatement {
            sql: String::from(sql),
            bindings: bindings.to_vec(),
        });
        self.result_set = None;
        self.last_insert_id = None;

        match self.responses.get(sql.trim()) {
            Some(Response::Rows { columns, rows }) => {
                self.result_set = Some(ResultSet {
                    columns: columns.clone(),
                    rows: rows.clone(),
                    row: None,
                });
                Ok(ExecOutcome::select())
            }
            Some(Response::Affected {
                rows,
                last_insert_id,
            }) => {
                self.last_insert_id.clone_from(last_insert_id);
                Ok(ExecOutcome::affected(*rows))
            }
            Some(Response::Error(error)) => Err(error.clone()),
            None => Err(SqlError::statement(format!("no such table for query: {sql}"))),
        }
    }

    fn move_to(&mut self, index: usize) -> bool {
        let Some(result_set) = self.result_set.as_mut() else {
            return false;
        };
        if index < result_set.rows.len() {
            result_set.row = Some(index);
            true
        } else {
            result_set.row = None;
            false
        }
    }

    fn current_row(&self) -> Option<&[SqlValue]> {
        let result_set = self.result_set.as_ref()?;
        result_set
            .row
            .and_then(|row| result_set.rows.get(row))
            .map(Vec::as_slice)
    }
}

impl SqlResult for MemoryResult {
    fn is_open(&self) -> bool {
        self.open
    }

    fn exec(&mut self, sql: &str) -> Result<ExecOutcome, SqlError> {
        if !self.open {
            return Err(SqlError::connection("connection is closed"));
        }
        self.prepared = None;
        self.run(sql, &[])
    }

    fn prepare(&mut self, sql: &str) -> Result<(), SqlError> {
        if !self.open {
            return Err(SqlError::connection("connection is closed"));
        }
        self.prepared = Some(String::from(sql));
        Ok(())
    }

    fn exec_prepared(&mut self, bindings: &[SqlValue]) -> Result<ExecOutcome, SqlError> {
        let Some(sql) = self.prepared.clone() else {
            return Err(SqlError::statement("no prepared statement"));
        };
        self.run(&sql, bindings)
    }

    fn fetch(&mut self, index: usize) -> bool {
        self.fetch_calls.push(FetchCall::Fetch(index));
        self.move_to(index)
    }

    fn fetch_first(&mut self) -> bool {
        self.fetch_calls.push(FetchCall::First);
        self.move_to(0)
    }

    fn fetch_last(&mut self) -> Option<usize> {
        self.fetch_calls.push(FetchCall::Last);
        let last = self.result_set.as_ref()?.rows.len().checked_sub(1)?;
        self.move_to(last).then_some(last)
    }

    fn fetch_next(&mut self, current: usize) -> bool {
        self.fetch_calls.push(FetchCall::Next);
        current.checked_add(1).is_some_and(|index| self.move_to(index))
    }

    fn fetch_previous(&mut self, current: usize) -> bool {
        self.fetch_calls.push(FetchCall::Previous);
        current.checked_sub(1).is_some_and(|index| self.move_to(index))
    }

    fn data(&self, index: usize) -> Option<SqlValue> {
        self.current_row()?.get(index).cloned()
    }

    fn is_null(&self, index: usize) -> bool {
        self.current_row()
            .and_then(|row| row.get(index))
            .is_none_or(SqlValue::is_null)
    }

    fn size(&self) -> Option<usize> {
        if !self.supports_size {
            return None;
        }
        self.result_set.as_ref().map(|result_set| result_set.rows.len())
    }

    fn record(&self) -> SqlRecord {
        self.result_set
            .as_ref()
            .map(|result_set| {
                result_set
                    .columns
                    .iter()
                    .map(|column| SqlField::new(column.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn last_insert_id(&self) -> Option<SqlValue> {
        self.last_insert_id.clone()
    }

    fn detach_from_result_set(&mut self) {
        self.result_set = None;
    }
}
