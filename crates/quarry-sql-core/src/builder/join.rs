//! Join clauses.

use crate::ast::{Column, Condition, JoinType, WhereItem, WhereKind};
use crate::value::{SqlValue, ToSqlValue};

/// A join and its `on` constraints.
///
/// Constraints reuse the where items; values bound here end up in the
/// `Join` binding category of the owning query.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub(crate) kind: JoinType,
    pub(crate) table: String,
    pub(crate) wheres: Vec<WhereItem>,
    pub(crate) bindings: Vec<SqlValue>,
}

impl JoinClause {
    /// Creates a join without constraints.
    #[must_use]
    pub fn new(kind: JoinType, table: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.into(),
            wheres: vec![],
            bindings: vec![],
        }
    }

    /// Returns the join type.
    #[must_use]
    pub const fn kind(&self) -> JoinType {
        self.kind
    }

    /// Returns the joined table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the constraints.
    #[must_use]
    pub fn wheres(&self) -> &[WhereItem] {
        &self.wheres
    }

    /// Returns the values bound by the constraints.
    #[must_use]
    pub fn bindings(&self) -> &[SqlValue] {
        &self.bindings
    }

    /// Adds an `on first op second` column constraint.
    #[must_use]
    pub fn on(self, first: &str, operator: &str, second: &str) -> Self {
        self.push_on(Condition::And, first, operator, second)
    }

    /// Adds an `or first op second` column constraint.
    #[must_use]
    pub fn or_on(self, first: &str, operator: &str, second: &str) -> Self {
        self.push_on(Condition::Or, first, operator, second)
    }

    /// Adds a constraint against a bound value.
    #[must_use]
    pub fn where_<T: ToSqlValue>(self, column: &str, operator: &str, value: T) -> Self {
        self.push_basic(Condition::And, column, operator, value.to_sql_value())
    }

    /// Adds an `or` constraint against a bound value.
    #[must_use]
    pub fn or_where<T: ToSqlValue>(self, column: &str, operator: &str, value: T) -> Self {
        self.push_basic(Condition::Or, column, operator, value.to_sql_value())
    }

    /// Adds a `column in (...)` constraint.
    #[must_use]
    pub fn where_in<T, I>(mut self, column: &str, values: I) -> Self
    where
        T: ToSqlValue,
        I: IntoIterator<Item = T>,
    {
        let values: Vec<SqlValue> = values.into_iter().map(ToSqlValue::to_sql_value).collect();
        self.bind_all(&values);
        self.wheres.push(WhereItem::new(
            Condition::And,
            WhereKind::In {
                column: Column::from(column),
                values,
            },
        ));
        self
    }

    /// Adds a `column is null` constraint.
    #[must_use]
    pub fn where_null(mut self, column: &str) -> Self {
        self.wheres.push(WhereItem::new(
            Condition::And,
            WhereKind::Null(Column::from(column)),
        ));
        self
    }

    /// Adds raw SQL with its bindings.
    #[must_use]
    pub fn where_raw(mut self, sql: &str, bindings: Vec<SqlValue>) -> Self {
        self.bind_all(&bindings);
        self.wheres
            .push(WhereItem::new(Condition::And, WhereKind::Raw(String::from(sql))));
        self
    }

    fn push_on(mut self, condition: Condition, first: &str, operator: &str, second: &str) -> Self {
        self.wheres.push(WhereItem::new(
            condition,
            WhereKind::Column {
                first: Column::from(first),
                operator: String::from(operator),
                second: Column::from(second),
            },
        ));
        self
    }

    fn push_basic(
        mut self,
        condition: Condition,
        column: &str,
        operator: &str,
        value: SqlValue,
    ) -> Self {
        self.bind_all(std::slice::from_ref(&value));
        self.wheres.push(WhereItem::new(
            condition,
            WhereKind::Basic {
                column: Column::from(column),
                operator: String::from(operator),
                value,
            },
        ));
        self
    }

    fn bind_all(&mut self, values: &[SqlValue]) {
        self.bindings.extend(
            values
                .iter()
                .filter(|value| !value.is_expression())
                .cloned(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::raw;

    #[test]
    fn test_join_collects_constraints_and_bindings() {
        let join = JoinClause::new(JoinType::Left, "contacts")
            .on("users.id", "=", "contacts.user_id")
            .where_("contacts.active", "=", true)
            .or_where("contacts.created_at", ">", raw("now()"));

        assert_eq!(join.kind(), JoinType::Left);
        assert_eq!(join.table(), "contacts");
        assert_eq!(join.wheres().len(), 3);
        assert_eq!(join.bindings(), &[SqlValue::Bool(true)]);
    }
}
