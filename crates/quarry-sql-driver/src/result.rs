//! The driver interface the cursor is built on.

use quarry_sql_core::SqlValue;

use crate::error::SqlError;
use crate::record::SqlRecord;

/// What a successful execution produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Whether the statement returns rows.
    pub is_select: bool,
    /// Rows changed by the statement, if the driver reports it.
    pub rows_affected: Option<u64>,
}

impl ExecOutcome {
    /// A row-returning statement.
    #[must_use]
    pub const fn select() -> Self {
        Self {
            is_select: true,
            rows_affected: None,
        }
    }

    /// A statement that changed `rows` rows.
    #[must_use]
    pub const fn affected(rows: u64) -> Self {
        Self {
            is_select: false,
            rows_affected: Some(rows),
        }
    }
}

/// One executing statement on a database driver.
///
/// Row addressing is reduced to [`fetch`](SqlResult::fetch) plus the
/// sequential shortcuts, which default to random access. Drivers override
/// the shortcuts when stepping is cheaper than seeking.
pub trait SqlResult {
    /// Whether the underlying connection is usable.
    fn is_open(&self) -> bool;

    /// Executes `sql` directly.
    fn exec(&mut self, sql: &str) -> Result<ExecOutcome, SqlError>;

    /// Prepares `sql` for [`exec_prepared`](SqlResult::exec_prepared).
    fn prepare(&mut self, sql: &str) -> Result<(), SqlError>;

    /// Executes the prepared statement with `bindings` in placeholder order.
    fn exec_prepared(&mut self, bindings: &[SqlValue]) -> Result<ExecOutcome, SqlError>;

    /// Moves to row `index`. Returns `false` when there is no such row.
    fn fetch(&mut self, index: usize) -> bool;

    fn fetch_first(&mut self) -> bool {
        self.fetch(0)
    }

    /// Moves to the last row and returns its index, `None` for an empty
    /// result.
    fn fetch_last(&mut self) -> Option<usize>;

    /// Moves from row `current` to the row after it.
    fn fetch_next(&mut self, current: usize) -> bool {
        current
            .checked_add(1)
            .is_some_and(|index| self.fetch(index))
    }

    /// Moves from row `current` to the row before it.
    fn fetch_previous(&mut self, current: usize) -> bool {
        current
            .checked_sub(1)
            .is_some_and(|index| self.fetch(index))
    }

    /// Value of column `index` on the current row.
    fn data(&self, index: usize) -> Option<SqlValue>;

    /// Whether column `index` on the current row is NULL.
    fn is_null(&self, index: usize) -> bool;

    /// Number of rows in the result, if the driver can tell.
    fn size(&self) -> Option<usize>;

    /// Field metadata of the result, without values.
    fn record(&self) -> SqlRecord;

    fn last_insert_id(&self) -> Option<SqlValue>;

    /// Releases the result set while keeping the statement.
    fn detach_from_result_set(&mut self);
}
