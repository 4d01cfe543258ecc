//! Leaf types shared by the clause AST.

use crate::value::Expression;

/// A column reference: an identifier to be wrapped, or raw SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// A bare or dotted identifier, optionally aliased with `as`.
    Name(String),
    /// Raw SQL inlined as-is.
    Raw(Expression),
}

impl Column {
    /// Returns `true` for raw columns.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Self::Name(String::from(name))
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Expression> for Column {
    fn from(expression: Expression) -> Self {
        Self::Raw(expression)
    }
}

/// The source of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FromClause {
    /// No table set yet.
    #[default]
    None,
    /// A table name, optionally aliased with `as`.
    Table(String),
    /// Raw SQL used as the table expression.
    Raw(Expression),
}

impl FromClause {
    /// Returns the table name when the source is a plain table.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::Table(table) => Some(table),
            Self::None | Self::Raw(_) => None,
        }
    }

    /// Returns `true` when no source has been set.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Connective placed in front of a where/having item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Condition {
    #[default]
    And,
    Or,
}

impl Condition {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Join type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinType {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Left => "left",
            Self::Right => "right",
            Self::Cross => "cross",
        }
    }
}

/// The part of a date/time column compared by a date-based where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Date,
    Time,
    Day,
    Month,
    Year,
}

impl DatePart {
    /// Returns the lower-case SQL function name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// Row locking requested by the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Lock {
    #[default]
    None,
    /// Exclusive lock (`for update`).
    ForUpdate,
    /// Shared lock.
    Shared,
    /// Raw lock clause.
    Raw(String),
}

/// Distinct mode of the select list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Distinct {
    #[default]
    None,
    /// `select distinct`.
    All,
    /// `select distinct on (...)`, PostgreSQL only.
    Columns(Vec<String>),
}

impl Distinct {
    /// Returns `true` unless the mode is [`Distinct::None`].
    #[must_use]
    pub const fn is_set(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// An aggregate function replacing the select list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub function: String,
    pub columns: Vec<Column>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::raw;

    #[test]
    fn test_column_conversions() {
        assert_eq!(Column::from("id"), Column::Name(String::from("id")));
        assert!(Column::from(raw("count(*)")).is_raw());
    }

    #[test]
    fn test_from_table() {
        assert_eq!(FromClause::Table(String::from("users")).table(), Some("users"));
        assert_eq!(FromClause::Raw(raw("(select 1)")).table(), None);
        assert!(FromClause::default().is_none());
    }

    #[test]
    fn test_keywords() {
        assert_eq!(Condition::Or.as_str(), "or");
        assert_eq!(Direction::Desc.as_str(), "desc");
        assert_eq!(JoinType::Left.as_str(), "left");
        assert_eq!(DatePart::Month.as_str(), "month");
    }
}
