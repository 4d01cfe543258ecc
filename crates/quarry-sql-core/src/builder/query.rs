//! Query state builder.
//!
//! `QueryBuilder` only accumulates clause items and bindings. It never
//! renders SQL; a [`Grammar`](crate::grammar::Grammar) reads it to compile
//! statements for a specific dialect.

use super::bindings::{BindingType, Bindings};
use super::join::JoinClause;
use crate::ast::{
    Aggregate, Column, Condition, DatePart, Direction, Distinct, FromClause, HavingItem,
    HavingKind, JoinType, Lock, OrderItem, UnionItem, WhereItem, WhereKind,
};
use crate::value::{Expression, SqlValue, ToSqlValue};

/// Accumulated state of one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    pub(crate) from: FromClause,
    pub(crate) columns: Vec<Column>,
    pub(crate) distinct: Distinct,
    pub(crate) aggregate: Option<Aggregate>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) wheres: Vec<WhereItem>,
    pub(crate) groups: Vec<Column>,
    pub(crate) havings: Vec<HavingItem>,
    pub(crate) orders: Vec<OrderItem>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) lock: Lock,
    pub(crate) unions: Vec<UnionItem>,
    pub(crate) bindings: Bindings,
}

impl QueryBuilder {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query against `table`.
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self::new().from(table)
    }

    /// Returns the bindings recorded so far.
    #[must_use]
    pub const fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Returns the table source.
    #[must_use]
    pub const fn from_clause(&self) -> &FromClause {
        &self.from
    }

    /// Returns the where items.
    #[must_use]
    pub fn wheres(&self) -> &[WhereItem] {
        &self.wheres
    }

    /// Returns the joins.
    #[must_use]
    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    // ----- from -----

    /// Sets the table, optionally aliased (`"users as u"`).
    #[must_use]
    pub fn from(mut self, table: &str) -> Self {
        self.from = FromClause::Table(String::from(table));
        self
    }

    /// Sets a raw table expression with its bindings.
    #[must_use]
    pub fn from_raw(mut self, expression: Expression, bindings: Vec<SqlValue>) -> Self {
        self.from = FromClause::Raw(expression);
        self.bindings.set(BindingType::From, bindings);
        self
    }

    // ----- select list -----

    /// Replaces the select list.
    #[must_use]
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().copied().map(Column::from).collect();
        self.bindings.set(BindingType::Select, vec![]);
        self
    }

    /// Appends columns to the select list.
    #[must_use]
    pub fn add_select(mut self, columns: &[&str]) -> Self {
        self.columns.extend(columns.iter().copied().map(Column::from));
        self
    }

    /// Appends a raw select expression with its bindings.
    #[must_use]
    pub fn select_raw(mut self, sql: &str, bindings: Vec<SqlValue>) -> Self {
        self.columns.push(Column::Raw(Expression::new(sql)));
        self.bindings.extend(BindingType::Select, bindings);
        self
    }

    /// `select distinct`.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.distinct = Distinct::All;
        self
    }

    /// `select distinct on (...)`.
    #[must_use]
    pub fn distinct_on(mut self, columns: &[&str]) -> Self {
        self.distinct = Distinct::Columns(columns.iter().map(|c| String::from(*c)).collect());
        self
    }

    /// Replaces the select list, and its bindings, with an aggregate
    /// function.
    #[must_use]
    pub fn aggregate(mut self, function: &str, columns: &[&str]) -> Self {
        self.columns.clear();
        self.bindings.set(BindingType::Select, Vec::new());
        let columns = if columns.is_empty() {
            vec![Column::from("*")]
        } else {
            columns.iter().copied().map(Column::from).collect()
        };
        self.aggregate = Some(Aggregate {
            function: String::from(function),
            columns,
        });
        self
    }

    // ----- joins -----

    /// Adds an inner join on `first op second`.
    #[must_use]
    pub fn join(self, table: &str, first: &str, operator: &str, second: &str) -> Self {
        self.join_clause(JoinClause::new(JoinType::Inner, table).on(first, operator, second))
    }

    /// Adds a left join on `first op second`.
    #[must_use]
    pub fn left_join(self, table: &str, first: &str, operator: &str, second: &str) -> Self {
        self.join_clause(JoinClause::new(JoinType::Left, table).on(first, operator, second))
    }

    /// Adds a right join on `first op second`.
    #[must_use]
    pub fn right_join(self, table: &str, first: &str, operator: &str, second: &str) -> Self {
        self.join_clause(JoinClause::new(JoinType::Right, table).on(first, operator, second))
    }

    /// Adds a cross join.
    #[must_use]
    pub fn cross_join(self, table: &str) -> Self {
        self.join_clause(JoinClause::new(JoinType::Cross, table))
    }

    /// Adds a fully configured join.
    #[must_use]
    pub fn join_clause(mut self, join: JoinClause) -> Self {
        self.bindings
            .extend(BindingType::Join, join.bindings.iter().cloned());
        self.joins.push(join);
        self
    }

    // ----- wheres -----

    /// `column op value`
    #[must_use]
    pub fn where_<C: Into<Column>, T: ToSqlValue>(
        self,
        column: C,
        operator: &str,
        value: T,
    ) -> Self {
        self.push_basic(Condition::And, column.into(), operator, value.to_sql_value())
    }

    /// `or column op value`
    #[must_use]
    pub fn or_where<C: Into<Column>, T: ToSqlValue>(
        self,
        column: C,
        operator: &str,
        value: T,
    ) -> Self {
        self.push_basic(Condition::Or, column.into(), operator, value.to_sql_value())
    }

    /// `column = value`
    #[must_use]
    pub fn where_eq<C: Into<Column>, T: ToSqlValue>(self, column: C, value: T) -> Self {
        self.where_(column, "=", value)
    }

    /// `or column = value`
    #[must_use]
    pub fn or_where_eq<C: Into<Column>, T: ToSqlValue>(self, column: C, value: T) -> Self {
        self.or_where(column, "=", value)
    }

    /// `first op second`, comparing two columns.
    #[must_use]
    pub fn where_column(self, first: &str, operator: &str, second: &str) -> Self {
        self.push_where(
            Condition::And,
            WhereKind::Column {
                first: Column::from(first),
                operator: String::from(operator),
                second: Column::from(second),
            },
        )
    }

    /// `or first op second`, comparing two columns.
    #[must_use]
    pub fn or_where_column(self, first: &str, operator: &str, second: &str) -> Self {
        self.push_where(
            Condition::Or,
            WhereKind::Column {
                first: Column::from(first),
                operator: String::from(operator),
                second: Column::from(second),
            },
        )
    }

    /// `column in (...)`
    #[must_use]
    pub fn where_in<T, I>(self, column: &str, values: I) -> Self
    where
        T: ToSqlValue,
        I: IntoIterator<Item = T>,
    {
        self.push_in(Condition::And, column, values, false)
    }

    /// `or column in (...)`
    #[must_use]
    pub fn or_where_in<T, I>(self, column: &str, values: I) -> Self
    where
        T: ToSqlValue,
        I: IntoIterator<Item = T>,
    {
        self.push_in(Condition::Or, column, values, false)
    }

    /// `column not in (...)`
    #[must_use]
    pub fn where_not_in<T, I>(self, column: &str, values: I) -> Self
    where
        T: ToSqlValue,
        I: IntoIterator<Item = T>,
    {
        self.push_in(Condition::And, column, values, true)
    }

    /// `or column not in (...)`
    #[must_use]
    pub fn or_where_not_in<T, I>(self, column: &str, values: I) -> Self
    where
        T: ToSqlValue,
        I: IntoIterator<Item = T>,
    {
        self.push_in(Condition::Or, column, values, true)
    }

    /// `column is null`
    #[must_use]
    pub fn where_null(self, column: &str) -> Self {
        self.push_where(Condition::And, WhereKind::Null(Column::from(column)))
    }

    /// `or column is null`
    #[must_use]
    pub fn or_where_null(self, column: &str) -> Self {
        self.push_where(Condition::Or, WhereKind::Null(Column::from(column)))
    }

    /// `column is not null`
    #[must_use]
    pub fn where_not_null(self, column: &str) -> Self {
        self.push_where(Condition::And, WhereKind::NotNull(Column::from(column)))
    }

    /// `or column is not null`
    #[must_use]
    pub fn or_where_not_null(self, column: &str) -> Self {
        self.push_where(Condition::Or, WhereKind::NotNull(Column::from(column)))
    }

    /// Raw predicate with its bindings.
    #[must_use]
    pub fn where_raw(mut self, sql: &str, bindings: Vec<SqlValue>) -> Self {
        self.bindings.extend(BindingType::Where, bindings);
        self.push_where(Condition::And, WhereKind::Raw(String::from(sql)))
    }

    /// `or` raw predicate with its bindings.
    #[must_use]
    pub fn or_where_raw(mut self, sql: &str, bindings: Vec<SqlValue>) -> Self {
        self.bindings.extend(BindingType::Where, bindings);
        self.push_where(Condition::Or, WhereKind::Raw(String::from(sql)))
    }

    /// Parenthesized group built by `callback`. Empty groups are dropped.
    #[must_use]
    pub fn where_nested<F>(self, callback: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.push_nested(Condition::And, callback)
    }

    /// `or` parenthesized group built by `callback`.
    #[must_use]
    pub fn or_where_nested<F>(self, callback: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.push_nested(Condition::Or, callback)
    }

    /// `exists (query)`
    #[must_use]
    pub fn where_exists(self, query: Self) -> Self {
        self.push_exists(Condition::And, query, false)
    }

    /// `or exists (query)`
    #[must_use]
    pub fn or_where_exists(self, query: Self) -> Self {
        self.push_exists(Condition::Or, query, false)
    }

    /// `not exists (query)`
    #[must_use]
    pub fn where_not_exists(self, query: Self) -> Self {
        self.push_exists(Condition::And, query, true)
    }

    /// `(a, b) op (?, ?)`
    #[must_use]
    pub fn where_row_values(
        mut self,
        columns: &[&str],
        operator: &str,
        values: Vec<SqlValue>,
    ) -> Self {
        self.bindings.extend(BindingType::Where, values.iter().cloned());
        self.push_where(
            Condition::And,
            WhereKind::RowValues {
                columns: columns.iter().copied().map(Column::from).collect(),
                operator: String::from(operator),
                values,
            },
        )
    }

    /// `column between min and max`
    #[must_use]
    pub fn where_between<T: ToSqlValue>(self, column: &str, min: T, max: T) -> Self {
        self.push_between(Condition::And, column, min, max, false)
    }

    /// `or column between min and max`
    #[must_use]
    pub fn or_where_between<T: ToSqlValue>(self, column: &str, min: T, max: T) -> Self {
        self.push_between(Condition::Or, column, min, max, false)
    }

    /// `column not between min and max`
    #[must_use]
    pub fn where_not_between<T: ToSqlValue>(self, column: &str, min: T, max: T) -> Self {
        self.push_between(Condition::And, column, min, max, true)
    }

    /// `column between min_column and max_column`
    #[must_use]
    pub fn where_between_columns(self, column: &str, min: &str, max: &str) -> Self {
        self.push_where(
            Condition::And,
            WhereKind::BetweenColumns {
                column: Column::from(column),
                min: Column::from(min),
                max: Column::from(max),
                not: false,
            },
        )
    }

    /// `column not between min_column and max_column`
    #[must_use]
    pub fn where_not_between_columns(self, column: &str, min: &str, max: &str) -> Self {
        self.push_where(
            Condition::And,
            WhereKind::BetweenColumns {
                column: Column::from(column),
                min: Column::from(min),
                max: Column::from(max),
                not: true,
            },
        )
    }

    /// Compares the date part of `column`.
    #[must_use]
    pub fn where_date<T: ToSqlValue>(self, column: &str, operator: &str, value: T) -> Self {
        self.push_date(DatePart::Date, column, operator, value)
    }

    /// Compares the time part of `column`.
    #[must_use]
    pub fn where_time<T: ToSqlValue>(self, column: &str, operator: &str, value: T) -> Self {
        self.push_date(DatePart::Time, column, operator, value)
    }

    /// Compares the day of month of `column`.
    #[must_use]
    pub fn where_day<T: ToSqlValue>(self, column: &str, operator: &str, value: T) -> Self {
        self.push_date(DatePart::Day, column, operator, value)
    }

    /// Compares the month of `column`.
    #[must_use]
    pub fn where_month<T: ToSqlValue>(self, column: &str, operator: &str, value: T) -> Self {
        self.push_date(DatePart::Month, column, operator, value)
    }

    /// Compares the year of `column`.
    #[must_use]
    pub fn where_year<T: ToSqlValue>(self, column: &str, operator: &str, value: T) -> Self {
        self.push_date(DatePart::Year, column, operator, value)
    }

    // ----- grouping -----

    /// Appends group by columns.
    #[must_use]
    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.groups.extend(columns.iter().copied().map(Column::from));
        self
    }

    /// Appends a raw group by expression with its bindings.
    #[must_use]
    pub fn group_by_raw(mut self, sql: &str, bindings: Vec<SqlValue>) -> Self {
        self.groups.push(Column::Raw(Expression::new(sql)));
        self.bindings.extend(BindingType::GroupBy, bindings);
        self
    }

    /// `having column op value`
    #[must_use]
    pub fn having<T: ToSqlValue>(self, column: &str, operator: &str, value: T) -> Self {
        self.push_having_basic(Condition::And, column, operator, value.to_sql_value())
    }

    /// `or having column op value`
    #[must_use]
    pub fn or_having<T: ToSqlValue>(self, column: &str, operator: &str, value: T) -> Self {
        self.push_having_basic(Condition::Or, column, operator, value.to_sql_value())
    }

    /// Raw having predicate with its bindings.
    #[must_use]
    pub fn having_raw(mut self, sql: &str, bindings: Vec<SqlValue>) -> Self {
        self.bindings.extend(BindingType::Having, bindings);
        self.havings
            .push(HavingItem::new(Condition::And, HavingKind::Raw(String::from(sql))));
        self
    }

    /// `having column between min and max`
    #[must_use]
    pub fn having_between<T: ToSqlValue>(mut self, column: &str, min: T, max: T) -> Self {
        let (min, max) = (min.to_sql_value(), max.to_sql_value());
        self.bindings
            .extend(BindingType::Having, [min.clone(), max.clone()]);
        self.havings.push(HavingItem::new(
            Condition::And,
            HavingKind::Between {
                column: Column::from(column),
                min,
                max,
                not: false,
            },
        ));
        self
    }

    /// `having column is null`
    #[must_use]
    pub fn having_null(mut self, column: &str) -> Self {
        self.havings.push(HavingItem::new(
            Condition::And,
            HavingKind::Null(Column::from(column)),
        ));
        self
    }

    /// `having column is not null`
    #[must_use]
    pub fn having_not_null(mut self, column: &str) -> Self {
        self.havings.push(HavingItem::new(
            Condition::And,
            HavingKind::NotNull(Column::from(column)),
        ));
        self
    }

    // ----- ordering -----

    /// Appends an order by column.
    #[must_use]
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.orders.push(OrderItem::Column {
            column: Column::from(column),
            direction,
        });
        self
    }

    /// Appends a descending order by column.
    #[must_use]
    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by(column, Direction::Desc)
    }

    /// Appends a raw order by expression with its bindings.
    #[must_use]
    pub fn order_by_raw(mut self, sql: &str, bindings: Vec<SqlValue>) -> Self {
        self.orders.push(OrderItem::Raw(String::from(sql)));
        self.bindings.extend(BindingType::Order, bindings);
        self
    }

    /// Removes every order by item and its bindings.
    #[must_use]
    pub fn reorder(mut self) -> Self {
        self.orders.clear();
        self.bindings.set(BindingType::Order, vec![]);
        self
    }

    // ----- paging -----

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Limit and offset for a 1-based page.
    #[must_use]
    pub fn for_page(self, page: u64, per_page: u64) -> Self {
        self.offset(page.saturating_sub(1).saturating_mul(per_page))
            .limit(per_page)
    }

    // ----- locking -----

    /// Exclusive row lock.
    #[must_use]
    pub fn lock_for_update(mut self) -> Self {
        self.lock = Lock::ForUpdate;
        self
    }

    /// Shared row lock.
    #[must_use]
    pub fn shared_lock(mut self) -> Self {
        self.lock = Lock::Shared;
        self
    }

    /// Raw lock clause.
    #[must_use]
    pub fn lock(mut self, sql: &str) -> Self {
        self.lock = Lock::Raw(String::from(sql));
        self
    }

    // ----- unions -----

    /// `union (query)`
    #[must_use]
    pub fn union(self, query: Self) -> Self {
        self.push_union(query, false)
    }

    /// `union all (query)`
    #[must_use]
    pub fn union_all(self, query: Self) -> Self {
        self.push_union(query, true)
    }

    // ----- internals -----

    pub(crate) fn has_joins_or_limit(&self) -> bool {
        !self.joins.is_empty() || self.limit.is_some()
    }

    fn push_where(mut self, condition: Condition, kind: WhereKind) -> Self {
        self.wheres.push(WhereItem::new(condition, kind));
        self
    }

    fn push_basic(
        mut self,
        condition: Condition,
        column: Column,
        operator: &str,
        value: SqlValue,
    ) -> Self {
        self.bindings.push(BindingType::Where, value.clone());
        self.push_where(
            condition,
            WhereKind::Basic {
                column,
                operator: String::from(operator),
                value,
            },
        )
    }

    fn push_in<T, I>(mut self, condition: Condition, column: &str, values: I, not: bool) -> Self
    where
        T: ToSqlValue,
        I: IntoIterator<Item = T>,
    {
        let values: Vec<SqlValue> = values.into_iter().map(ToSqlValue::to_sql_value).collect();
        self.bindings
            .extend(BindingType::Where, values.iter().cloned());
        let column = Column::from(column);
        let kind = if not {
            WhereKind::NotIn { column, values }
        } else {
            WhereKind::In { column, values }
        };
        self.push_where(condition, kind)
    }

    fn push_nested<F>(mut self, condition: Condition, callback: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let nested = callback(Self::new());
        if nested.wheres.is_empty() {
            return self;
        }
        self.bindings.extend(
            BindingType::Where,
            nested.bindings.get(BindingType::Where).iter().cloned(),
        );
        self.push_where(condition, WhereKind::Nested(nested.wheres))
    }

    fn push_exists(mut self, condition: Condition, query: Self, not: bool) -> Self {
        self.bindings
            .extend(BindingType::Where, query.bindings.flatten());
        let query = Box::new(query);
        let kind = if not {
            WhereKind::NotExists(query)
        } else {
            WhereKind::Exists(query)
        };
        self.push_where(condition, kind)
    }

    fn push_between<T: ToSqlValue>(
        mut self,
        condition: Condition,
        column: &str,
        min: T,
        max: T,
        not: bool,
    ) -> Self {
        let (min, max) = (min.to_sql_value(), max.to_sql_value());
        self.bindings
            .extend(BindingType::Where, [min.clone(), max.clone()]);
        self.push_where(
            condition,
            WhereKind::Between {
                column: Column::from(column),
                min,
                max,
                not,
            },
        )
    }

    fn push_date<T: ToSqlValue>(
        mut self,
        part: DatePart,
        column: &str,
        operator: &str,
        value: T,
    ) -> Self {
        let value = value.to_sql_value();
        self.bindings.push(BindingType::Where, value.clone());
        self.push_where(
            Condition::And,
            WhereKind::DateBased {
                part,
                column: Column::from(column),
                operator: String::from(operator),
                value,
            },
        )
    }

    fn push_having_basic(
        mut self,
        condition: Condition,
        column: &str,
        operator: &str,
        value: SqlValue,
    ) -> Self {
        self.bindings.push(BindingType::Having, value.clone());
        self.havings.push(HavingItem::new(
            condition,
            HavingKind::Basic {
                column: Column::from(column),
                operator: String::from(operator),
                value,
            },
        ));
        self
    }

    fn push_union(mut self, query: Self, all: bool) -> Self {
        self.bindings
            .extend(BindingType::Union, query.bindings.flatten());
        self.unions.push(UnionItem {
            query: Box::new(query),
            all,
        });
        self
    }
}
