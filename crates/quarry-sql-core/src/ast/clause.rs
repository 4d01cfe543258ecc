//! Clause items produced by the query builder and consumed by the grammar.

use std::collections::BTreeMap;

use super::types::{Column, Condition, DatePart, Direction};
use crate::builder::QueryBuilder;
use crate::value::SqlValue;

/// One row of an insert: column name to value.
///
/// Keys are kept sorted, so the insert column list is deterministic.
pub type Record = BTreeMap<String, SqlValue>;

/// A where predicate together with its leading connective.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereItem {
    pub condition: Condition,
    pub kind: WhereKind,
}

impl WhereItem {
    #[must_use]
    pub const fn new(condition: Condition, kind: WhereKind) -> Self {
        Self { condition, kind }
    }
}

/// The closed set of where predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereKind {
    /// `column op value`
    Basic {
        column: Column,
        operator: String,
        value: SqlValue,
    },
    /// A parenthesized group of predicates.
    Nested(Vec<WhereItem>),
    /// `first op second`, both columns.
    Column {
        first: Column,
        operator: String,
        second: Column,
    },
    /// `column in (...)`
    In { column: Column, values: Vec<SqlValue> },
    /// `column not in (...)`
    NotIn { column: Column, values: Vec<SqlValue> },
    /// `column is null`
    Null(Column),
    /// `column is not null`
    NotNull(Column),
    /// Raw SQL.
    Raw(String),
    /// `exists (subquery)`
    Exists(Box<QueryBuilder>),
    /// `not exists (subquery)`
    NotExists(Box<QueryBuilder>),
    /// `(a, b) op (?, ?)`
    RowValues {
        columns: Vec<Column>,
        operator: String,
        values: Vec<SqlValue>,
    },
    /// `column [not] between min and max`
    Between {
        column: Column,
        min: SqlValue,
        max: SqlValue,
        not: bool,
    },
    /// `column [not] between min_column and max_column`
    BetweenColumns {
        column: Column,
        min: Column,
        max: Column,
        not: bool,
    },
    /// Comparison against one part of a date/time column.
    DateBased {
        part: DatePart,
        column: Column,
        operator: String,
        value: SqlValue,
    },
}

/// A having predicate together with its leading connective.
#[derive(Debug, Clone, PartialEq)]
pub struct HavingItem {
    pub condition: Condition,
    pub kind: HavingKind,
}

impl HavingItem {
    #[must_use]
    pub const fn new(condition: Condition, kind: HavingKind) -> Self {
        Self { condition, kind }
    }
}

/// The closed set of having predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum HavingKind {
    Basic {
        column: Column,
        operator: String,
        value: SqlValue,
    },
    Raw(String),
    Between {
        column: Column,
        min: SqlValue,
        max: SqlValue,
        not: bool,
    },
    Null(Column),
    NotNull(Column),
}

/// An order by item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderItem {
    Column { column: Column, direction: Direction },
    Raw(String),
}

/// An assignment in the `set` list of an update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateItem {
    pub column: String,
    pub value: SqlValue,
}

impl UpdateItem {
    #[must_use]
    pub fn new(column: impl Into<String>, value: SqlValue) -> Self {
        Self {
            column: column.into(),
            value,
        }
    }
}

/// A query appended with `union` or `union all`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionItem {
    pub query: Box<QueryBuilder>,
    pub all: bool,
}
