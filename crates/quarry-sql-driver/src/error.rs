//! Error types for statement execution.

use std::fmt;

use quarry_sql_core::CompileError;

/// Where a driver error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlErrorKind {
    /// The connection is not open or was lost.
    Connection,
    /// The server rejected the statement.
    Statement,
    /// Anything the driver could not classify.
    Unknown,
}

impl SqlErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Statement => "statement",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SqlErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A driver or database error.
///
/// These are stored in the query's last-error slot and reported through a
/// `false` return, never raised as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct SqlError {
    pub kind: SqlErrorKind,
    pub message: String,
    /// Database specific error code, if the driver reported one.
    pub native_code: Option<String>,
}

impl SqlError {
    #[must_use]
    pub fn new(kind: SqlErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            native_code: None,
        }
    }

    /// A connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(SqlErrorKind::Connection, message)
    }

    /// A statement error.
    #[must_use]
    pub fn statement(message: impl Into<String>) -> Self {
        Self::new(SqlErrorKind::Statement, message)
    }

    /// Attaches the database specific error code.
    #[must_use]
    pub fn with_native_code(mut self, code: impl Into<String>) -> Self {
        self.native_code = Some(code.into());
        self
    }
}

/// Misuse of the query API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// An empty query string was passed to `exec` or `prepare`.
    #[error("cannot execute an empty query")]
    EmptyQuery,

    /// `exec_prepared` was called before `prepare`.
    #[error("no prepared query, call prepare() first or pass the query to exec()")]
    NotPrepared,

    /// A field was inspected before the cursor was placed on a row.
    #[error("the query must be executed and positioned on a row before inspecting fields")]
    NotPositioned,

    /// The statement could not be compiled.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
