//! Dialect-aware statement compilation.
//!
//! [`Grammar`] carries the generic SQL dialect in its default methods. A
//! concrete dialect overrides only the pieces whose syntax differs; the
//! select pipeline order and the where dispatch stay shared.
//!
//! ```rust
//! use quarry_sql_core::ast::Direction;
//! use quarry_sql_core::builder::QueryBuilder;
//! use quarry_sql_core::grammar::{GenericGrammar, Grammar};
//! use quarry_sql_core::SqlValue;
//!
//! let query = QueryBuilder::table("users")
//!     .where_eq("id", 5)
//!     .order_by("name", Direction::Asc)
//!     .limit(10);
//!
//! let statement = GenericGrammar::new().select_statement(&query).unwrap();
//! assert_eq!(
//!     statement.sql,
//!     r#"select * from "users" where "id" = ? order by "name" asc limit 10"#
//! );
//! assert_eq!(statement.bindings, vec![SqlValue::Int(5)]);
//! ```

mod config;
mod generic;
mod mysql;
mod postgres;
mod sqlite;
pub mod wrap;

pub use config::{DriverKind, GrammarConfig};
pub use generic::GenericGrammar;
pub use mysql::MySqlGrammar;
pub use postgres::PostgresGrammar;
pub use sqlite::SqliteGrammar;

use tracing::trace;

use crate::ast::{
    Aggregate, Column, DatePart, Distinct, FromClause, HavingItem, HavingKind, Lock, OrderItem,
    Record, UnionItem, UpdateItem, WhereItem, WhereKind,
};
use crate::builder::{prepare_bindings_for_insert, BindingType, JoinClause, QueryBuilder};
use crate::error::{CompileError, CompileResult};
use crate::value::SqlValue;

use wrap::{join_sql, remove_leading_boolean};

/// One logical part of a select statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectComponent {
    Aggregate,
    Columns,
    From,
    Joins,
    Wheres,
    Groups,
    Havings,
    Orders,
    Limit,
    Offset,
    Lock,
    Unions,
}

impl SelectComponent {
    /// The fixed emission order shared by every dialect.
    pub const ALL: [Self; 12] = [
        Self::Aggregate,
        Self::Columns,
        Self::From,
        Self::Joins,
        Self::Wheres,
        Self::Groups,
        Self::Havings,
        Self::Orders,
        Self::Limit,
        Self::Offset,
        Self::Lock,
        Self::Unions,
    ];
}

/// SQL text paired with the values for its placeholders, in order.
///
/// Not `Clone`: a compiled statement moves to the cursor that runs it.
#[derive(Debug, PartialEq)]
pub struct CompiledStatement {
    pub sql: String,
    pub bindings: Vec<SqlValue>,
}

impl CompiledStatement {
    #[must_use]
    pub fn new(sql: impl Into<String>, bindings: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            bindings,
        }
    }
}

/// A SQL dialect.
///
/// Every method has the generic behavior unless noted; dialects override
/// what differs.
pub trait Grammar {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the prefix prepended to every table name.
    fn table_prefix(&self) -> &str;

    /// Column used to rewrite joined or limited update/delete statements
    /// through a sub-select, if the dialect needs it.
    fn row_identifier(&self) -> Option<&'static str> {
        None
    }

    // ------------------------------------------------------------------
    // Wrapping
    // ------------------------------------------------------------------

    /// Quotes one identifier segment.
    fn wrap_value(&self, value: &str) -> String {
        wrap::quote_identifier(value, '"')
    }

    /// Wraps a possibly dotted and aliased identifier.
    fn wrap(&self, value: &str) -> String {
        self.wrap_prefixed(value, false)
    }

    /// Wraps `value`, prefixing the alias when `prefix_alias` is set.
    fn wrap_prefixed(&self, value: &str, prefix_alias: bool) -> String {
        if let Some((left, alias)) = wrap::split_alias(value) {
            let alias = if prefix_alias {
                format!("{}{alias}", self.table_prefix())
            } else {
                String::from(alias)
            };
            return format!("{} as {}", self.wrap(left), self.wrap_value(&alias));
        }
        self.wrap_segments(value)
    }

    /// Wraps each dot-separated segment; the first of several is a table.
    fn wrap_segments(&self, value: &str) -> String {
        let segments: Vec<&str> = value.split('.').collect();
        let multi = segments.len() > 1;
        segments
            .iter()
            .enumerate()
            .map(|(index, segment)| {
                if index == 0 && multi {
                    self.wrap_table(segment)
                } else {
                    self.wrap_value(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Wraps a table name, adding the table prefix.
    fn wrap_table(&self, table: &str) -> String {
        self.wrap_prefixed(&format!("{}{table}", self.table_prefix()), true)
    }

    /// Wraps a column, inlining raw expressions.
    fn wrap_column(&self, column: &Column) -> String {
        match column {
            Column::Name(name) => self.wrap(name),
            Column::Raw(expression) => String::from(expression.as_str()),
        }
    }

    /// Renders the table source.
    fn wrap_from(&self, from: &FromClause) -> String {
        match from {
            FromClause::None => String::new(),
            FromClause::Table(table) => self.wrap_table(table),
            FromClause::Raw(expression) => String::from(expression.as_str()),
        }
    }

    /// Wraps and comma-joins columns.
    fn columnize(&self, columns: &[Column]) -> String {
        columns
            .iter()
            .map(|column| self.wrap_column(column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Wraps and comma-joins plain column names.
    fn wrap_list(&self, names: &[&str]) -> String {
        names
            .iter()
            .map(|name| self.wrap(name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `?`, or the inlined text of an expression.
    fn parameter(&self, value: &SqlValue) -> String {
        match value {
            SqlValue::Expression(expression) => String::from(expression.as_str()),
            _ => String::from(SqlValue::placeholder()),
        }
    }

    /// Comma-joined parameters.
    fn parametrize(&self, values: &[SqlValue]) -> String {
        values
            .iter()
            .map(|value| self.parameter(value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Wraps a string literal in single quotes.
    fn quote_string(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Quotes and comma-joins string literals.
    fn quote_strings(&self, values: &[&str]) -> String {
        values
            .iter()
            .map(|value| self.quote_string(value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn unqualify_column(&self, column: &str) -> String {
        String::from(wrap::unqualify_column(column))
    }

    fn alias_from_from(&self, table: &str) -> String {
        String::from(wrap::alias_from_from(table))
    }

    // ------------------------------------------------------------------
    // Select pipeline
    // ------------------------------------------------------------------

    /// The select components in emission order.
    fn select_components(&self) -> &'static [SelectComponent] {
        &SelectComponent::ALL
    }

    /// Whether `component` contributes to the select of `query`.
    fn is_component_set(&self, component: SelectComponent, query: &QueryBuilder) -> bool {
        match component {
            SelectComponent::Aggregate => query.aggregate.is_some(),
            SelectComponent::Columns => query.aggregate.is_none(),
            SelectComponent::From => !query.from.is_none(),
            SelectComponent::Joins => !query.joins.is_empty(),
            SelectComponent::Wheres => !query.wheres.is_empty(),
            SelectComponent::Groups => !query.groups.is_empty(),
            SelectComponent::Havings => !query.havings.is_empty(),
            SelectComponent::Orders => !query.orders.is_empty(),
            SelectComponent::Limit => query.limit.is_some(),
            SelectComponent::Offset => query.offset.is_some(),
            SelectComponent::Lock => query.lock != Lock::None,
            SelectComponent::Unions => !query.unions.is_empty(),
        }
    }

    /// Compiles one select component.
    fn compile_component(
        &self,
        component: SelectComponent,
        query: &QueryBuilder,
    ) -> CompileResult<String> {
        Ok(match component {
            SelectComponent::Aggregate => query
                .aggregate
                .as_ref()
                .map(|aggregate| self.compile_aggregate(query, aggregate))
                .unwrap_or_default(),
            SelectComponent::Columns => self.compile_columns(query)?,
            SelectComponent::From => self.compile_from(query),
            SelectComponent::Joins => self.compile_joins(query)?,
            SelectComponent::Wheres => self.compile_wheres(query)?,
            SelectComponent::Groups => self.compile_groups(query),
            SelectComponent::Havings => self.compile_havings(query),
            SelectComponent::Orders => self.compile_orders(query),
            SelectComponent::Limit => self.compile_limit(query),
            SelectComponent::Offset => self.compile_offset(query),
            SelectComponent::Lock => self.compile_lock(query),
            SelectComponent::Unions => self.compile_unions(query)?,
        })
    }

    /// Compiles a select statement.
    fn compile_select(&self, query: &QueryBuilder) -> CompileResult<String> {
        let mut parts = Vec::new();
        for component in self.select_components() {
            if !self.is_component_set(*component, query) {
                continue;
            }
            let sql = self.compile_component(*component, query)?;
            if !sql.is_empty() {
                parts.push(sql);
            }
        }
        Ok(parts.join(" "))
    }

    fn compile_aggregate(&self, query: &QueryBuilder, aggregate: &Aggregate) -> String {
        let mut column = self.columnize(&aggregate.columns);
        match &query.distinct {
            Distinct::All if column != "*" => column = format!("distinct {column}"),
            Distinct::Columns(columns) => {
                let names: Vec<&str> = columns.iter().map(String::as_str).collect();
                column = format!("distinct {}", self.wrap_list(&names));
            }
            _ => {}
        }
        format!(
            "select {}({column}) as {}",
            aggregate.function,
            self.wrap("aggregate")
        )
    }

    /// The select list without the `select` keyword; `*` when empty.
    fn compile_column_list(&self, query: &QueryBuilder) -> String {
        if query.columns.is_empty() {
            String::from("*")
        } else {
            self.columnize(&query.columns)
        }
    }

    fn compile_columns(&self, query: &QueryBuilder) -> CompileResult<String> {
        let select = match &query.distinct {
            Distinct::None => "select",
            Distinct::All => "select distinct",
            Distinct::Columns(_) => {
                return Err(CompileError::UnsupportedFeature {
                    dialect: self.name(),
                    feature: "distinct on",
                })
            }
        };
        Ok(format!("{select} {}", self.compile_column_list(query)))
    }

    fn compile_from(&self, query: &QueryBuilder) -> String {
        format!("from {}", self.wrap_from(&query.from))
    }

    fn compile_joins(&self, query: &QueryBuilder) -> CompileResult<String> {
        let mut joins = Vec::with_capacity(query.joins.len());
        for join in &query.joins {
            joins.push(self.compile_join(join)?);
        }
        Ok(joins.join(" "))
    }

    fn compile_join(&self, join: &JoinClause) -> CompileResult<String> {
        let table = self.wrap_table(&join.table);
        let constraints = self.compile_where_list(&join.wheres, "on")?;
        Ok(join_sql(&[join.kind.as_str(), "join", &table, &constraints]))
    }

    fn compile_wheres(&self, query: &QueryBuilder) -> CompileResult<String> {
        self.compile_where_list(&query.wheres, "where")
    }

    /// Concatenates where items behind `conjunction` (`where` or `on`).
    /// Returns an empty string when nothing compiles.
    fn compile_where_list(&self, items: &[WhereItem], conjunction: &str) -> CompileResult<String> {
        let parts = self.compile_where_parts(items)?;
        if parts.is_empty() {
            return Ok(String::new());
        }
        Ok(format!(
            "{conjunction} {}",
            remove_leading_boolean(&parts.join(" "))
        ))
    }

    /// Each non-empty item prefixed with its connective.
    fn compile_where_parts(&self, items: &[WhereItem]) -> CompileResult<Vec<String>> {
        let mut parts = Vec::with_capacity(items.len());
        for item in items {
            let sql = self.compile_where(item)?;
            if !sql.is_empty() {
                parts.push(format!("{} {sql}", item.condition.as_str()));
            }
        }
        Ok(parts)
    }

    /// Dispatches one where item to its compiler.
    fn compile_where(&self, item: &WhereItem) -> CompileResult<String> {
        Ok(match &item.kind {
            WhereKind::Basic {
                column,
                operator,
                value,
            } => self.where_basic(column, operator, value),
            WhereKind::Nested(items) => self.where_nested(items)?,
            WhereKind::Column {
                first,
                operator,
                second,
            } => self.where_column(first, operator, second),
            WhereKind::In { column, values } => self.where_in(column, values, false),
            WhereKind::NotIn { column, values } => self.where_in(column, values, true),
            WhereKind::Null(column) => self.where_null(column, false),
            WhereKind::NotNull(column) => self.where_null(column, true),
            WhereKind::Raw(sql) => self.where_raw(sql),
            WhereKind::Exists(query) => self.where_exists(query, false)?,
            WhereKind::NotExists(query) => self.where_exists(query, true)?,
            WhereKind::RowValues {
                columns,
                operator,
                values,
            } => self.where_row_values(columns, operator, values),
            WhereKind::Between {
                column,
                min,
                max,
                not,
            } => self.where_between(column, min, max, *not),
            WhereKind::BetweenColumns {
                column,
                min,
                max,
                not,
            } => self.where_between_columns(column, min, max, *not),
            WhereKind::DateBased {
                part,
                column,
                operator,
                value,
            } => self.where_date_based(*part, column, operator, value),
        })
    }

    fn where_basic(&self, column: &Column, operator: &str, value: &SqlValue) -> String {
        format!(
            "{} {operator} {}",
            self.wrap_column(column),
            self.parameter(value)
        )
    }

    /// Parenthesized group; empty when the group compiles to nothing.
    fn where_nested(&self, items: &[WhereItem]) -> CompileResult<String> {
        let parts = self.compile_where_parts(items)?;
        if parts.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("({})", remove_leading_boolean(&parts.join(" "))))
    }

    fn where_column(&self, first: &Column, operator: &str, second: &Column) -> String {
        format!(
            "{} {operator} {}",
            self.wrap_column(first),
            self.wrap_column(second)
        )
    }

    /// `in`/`not in`; an empty list is always false/true respectively.
    fn where_in(&self, column: &Column, values: &[SqlValue], not: bool) -> String {
        if values.is_empty() {
            return String::from(if not { "1 = 1" } else { "0 = 1" });
        }
        let keyword = if not { "not in" } else { "in" };
        format!(
            "{} {keyword} ({})",
            self.wrap_column(column),
            self.parametrize(values)
        )
    }

    fn where_null(&self, column: &Column, not: bool) -> String {
        let keyword = if not { "is not null" } else { "is null" };
        format!("{} {keyword}", self.wrap_column(column))
    }

    fn where_raw(&self, sql: &str) -> String {
        String::from(sql)
    }

    fn where_exists(&self, query: &QueryBuilder, not: bool) -> CompileResult<String> {
        let keyword = if not { "not exists" } else { "exists" };
        Ok(format!("{keyword} ({})", self.compile_select(query)?))
    }

    fn where_row_values(&self, columns: &[Column], operator: &str, values: &[SqlValue]) -> String {
        format!(
            "({}) {operator} ({})",
            self.columnize(columns),
            self.parametrize(values)
        )
    }

    fn where_between(&self, column: &Column, min: &SqlValue, max: &SqlValue, not: bool) -> String {
        let keyword = if not { "not between" } else { "between" };
        format!(
            "{} {keyword} {} and {}",
            self.wrap_column(column),
            self.parameter(min),
            self.parameter(max)
        )
    }

    fn where_between_columns(
        &self,
        column: &Column,
        min: &Column,
        max: &Column,
        not: bool,
    ) -> String {
        let keyword = if not { "not between" } else { "between" };
        format!(
            "{} {keyword} {} and {}",
            self.wrap_column(column),
            self.wrap_column(min),
            self.wrap_column(max)
        )
    }

    /// `date(column) op ?` and friends.
    fn where_date_based(
        &self,
        part: DatePart,
        column: &Column,
        operator: &str,
        value: &SqlValue,
    ) -> String {
        format!(
            "{}({}) {operator} {}",
            part.as_str(),
            self.wrap_column(column),
            self.parameter(value)
        )
    }

    fn compile_groups(&self, query: &QueryBuilder) -> String {
        format!("group by {}", self.columnize(&query.groups))
    }

    fn compile_havings(&self, query: &QueryBuilder) -> String {
        let parts: Vec<String> = query
            .havings
            .iter()
            .map(|having| format!("{} {}", having.condition.as_str(), self.compile_having(having)))
            .collect();
        format!("having {}", remove_leading_boolean(&parts.join(" ")))
    }

    fn compile_having(&self, having: &HavingItem) -> String {
        match &having.kind {
            HavingKind::Basic {
                column,
                operator,
                value,
            } => format!(
                "{} {operator} {}",
                self.wrap_column(column),
                self.parameter(value)
            ),
            HavingKind::Raw(sql) => sql.clone(),
            HavingKind::Between {
                column,
                min,
                max,
                not,
            } => self.where_between(column, min, max, *not),
            HavingKind::Null(column) => self.where_null(column, false),
            HavingKind::NotNull(column) => self.where_null(column, true),
        }
    }

    fn compile_orders(&self, query: &QueryBuilder) -> String {
        let orders: Vec<String> = query
            .orders
            .iter()
            .map(|order| match order {
                OrderItem::Column { column, direction } => {
                    format!("{} {}", self.wrap_column(column), direction.as_str())
                }
                OrderItem::Raw(sql) => sql.clone(),
            })
            .collect();
        format!("order by {}", orders.join(", "))
    }

    fn compile_limit(&self, query: &QueryBuilder) -> String {
        query
            .limit
            .map(|limit| format!("limit {limit}"))
            .unwrap_or_default()
    }

    fn compile_offset(&self, query: &QueryBuilder) -> String {
        query
            .offset
            .map(|offset| format!("offset {offset}"))
            .unwrap_or_default()
    }

    /// Only raw lock clauses have a generic rendering.
    fn compile_lock(&self, query: &QueryBuilder) -> String {
        match &query.lock {
            Lock::Raw(sql) => sql.clone(),
            Lock::None | Lock::ForUpdate | Lock::Shared => String::new(),
        }
    }

    fn compile_unions(&self, query: &QueryBuilder) -> CompileResult<String> {
        let mut unions = Vec::with_capacity(query.unions.len());
        for union in &query.unions {
            unions.push(self.compile_union(union)?);
        }
        Ok(unions.join(" "))
    }

    fn compile_union(&self, union: &UnionItem) -> CompileResult<String> {
        let keyword = if union.all { "union all" } else { "union" };
        Ok(format!("{keyword} ({})", self.compile_select(&union.query)?))
    }

    // ------------------------------------------------------------------
    // Other statements
    // ------------------------------------------------------------------

    /// A one-row, one-column select telling whether `query` has rows.
    fn compile_exists(&self, query: &QueryBuilder) -> CompileResult<String> {
        Ok(format!(
            "select exists({}) as {}",
            self.compile_select(query)?,
            self.wrap("exists")
        ))
    }

    /// The wrapped target table of a mutation statement.
    fn compile_table(
        &self,
        query: &QueryBuilder,
        statement: &'static str,
    ) -> CompileResult<String> {
        if query.from.is_none() {
            return Err(CompileError::MissingTable { statement });
        }
        Ok(self.wrap_from(&query.from))
    }

    /// Multi-row insert. All records must share the first record's columns.
    fn compile_insert(&self, query: &QueryBuilder, records: &[Record]) -> CompileResult<String> {
        let table = self.compile_table(query, "insert")?;
        if records.iter().all(Record::is_empty) {
            return Ok(self.compile_empty_insert(&table));
        }
        ensure_same_columns(records)?;
        let Some(first) = records.first() else {
            return Ok(self.compile_empty_insert(&table));
        };

        let columns: Vec<&str> = first.keys().map(String::as_str).collect();
        let rows: Vec<String> = records
            .iter()
            .map(|record| {
                let values: Vec<String> =
                    record.values().map(|value| self.parameter(value)).collect();
                format!("({})", values.join(", "))
            })
            .collect();

        Ok(format!(
            "insert into {table} ({}) values {}",
            self.wrap_list(&columns),
            rows.join(", ")
        ))
    }

    /// Insert of a row with only default values.
    fn compile_empty_insert(&self, table: &str) -> String {
        format!("insert into {table} default values")
    }

    fn compile_insert_or_ignore(
        &self,
        _query: &QueryBuilder,
        _records: &[Record],
    ) -> CompileResult<String> {
        Err(CompileError::UnsupportedFeature {
            dialect: self.name(),
            feature: "insert or ignore",
        })
    }

    /// Insert that makes the new primary key available.
    fn compile_insert_get_id(
        &self,
        query: &QueryBuilder,
        records: &[Record],
        _sequence: Option<&str>,
    ) -> CompileResult<String> {
        self.compile_insert(query, records)
    }

    /// Insert, or update `update` when a row conflicts on `unique_by`.
    fn compile_upsert(
        &self,
        _query: &QueryBuilder,
        _records: &[Record],
        _unique_by: &[&str],
        _update: &[&str],
    ) -> CompileResult<String> {
        Err(CompileError::UnsupportedFeature {
            dialect: self.name(),
            feature: "upsert",
        })
    }

    fn compile_update(&self, query: &QueryBuilder, items: &[UpdateItem]) -> CompileResult<String> {
        let table = self.compile_table(query, "update")?;
        let columns = self.compile_update_columns(items);

        if let Some(row_id) = self.row_identifier() {
            if query.has_joins_or_limit() {
                return self.compile_update_by_row_id(query, &table, &columns, row_id);
            }
        }

        let wheres = self.compile_wheres(query)?;
        if query.joins.is_empty() {
            self.compile_update_without_joins(query, &table, &columns, &wheres)
        } else {
            self.compile_update_with_joins(query, &table, &columns, &wheres)
        }
    }

    fn compile_update_columns(&self, items: &[UpdateItem]) -> String {
        items
            .iter()
            .map(|item| format!("{} = {}", self.wrap(&item.column), self.parameter(&item.value)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn compile_update_without_joins(
        &self,
        _query: &QueryBuilder,
        table: &str,
        columns: &str,
        wheres: &str,
    ) -> CompileResult<String> {
        Ok(join_sql(&["update", table, "set", columns, wheres]))
    }

    fn compile_update_with_joins(
        &self,
        query: &QueryBuilder,
        table: &str,
        columns: &str,
        wheres: &str,
    ) -> CompileResult<String> {
        let joins = self.compile_joins(query)?;
        Ok(join_sql(&["update", table, &joins, "set", columns, wheres]))
    }

    /// `update t set ... where row_id in (select alias.row_id ...)`.
    fn compile_update_by_row_id(
        &self,
        query: &QueryBuilder,
        table: &str,
        columns: &str,
        row_id: &str,
    ) -> CompileResult<String> {
        let select = self.compile_row_id_select(query, row_id, "update")?;
        Ok(format!(
            "update {table} set {columns} where {} in ({select})",
            self.wrap(row_id)
        ))
    }

    /// The query re-targeted to select only `alias.row_id`.
    fn compile_row_id_select(
        &self,
        query: &QueryBuilder,
        row_id: &str,
        statement: &'static str,
    ) -> CompileResult<String> {
        let Some(table) = query.from.table() else {
            return Err(CompileError::RawTableRewrite {
                dialect: self.name(),
                statement,
            });
        };
        let alias = self.alias_from_from(table);

        let mut select = query.clone();
        select.columns = vec![Column::Name(format!("{alias}.{row_id}"))];
        select.aggregate = None;
        select.distinct = Distinct::None;
        self.compile_select(&select)
    }

    /// Orders the update bindings the way [`Grammar::compile_update`]
    /// emits their placeholders.
    fn prepare_bindings_for_update(
        &self,
        query: &QueryBuilder,
        items: &[UpdateItem],
    ) -> Vec<SqlValue> {
        let values = update_values(items);
        if self.row_identifier().is_some() && query.has_joins_or_limit() {
            return values
                .into_iter()
                .chain(query.bindings.flatten_except(&[BindingType::Select]))
                .collect();
        }

        let mut bindings = query
            .bindings
            .flatten_only(&[BindingType::From, BindingType::Join]);
        bindings.extend(values);
        bindings.extend(query.bindings.flatten_only(&[BindingType::Where]));
        bindings
    }

    fn compile_delete(&self, query: &QueryBuilder) -> CompileResult<String> {
        let table = self.compile_table(query, "delete")?;

        if let Some(row_id) = self.row_identifier() {
            if query.has_joins_or_limit() {
                let select = self.compile_row_id_select(query, row_id, "delete")?;
                return Ok(format!(
                    "delete from {table} where {} in ({select})",
                    self.wrap(row_id)
                ));
            }
        }

        let wheres = self.compile_wheres(query)?;
        if query.joins.is_empty() {
            self.compile_delete_without_joins(query, &table, &wheres)
        } else {
            self.compile_delete_with_joins(query, &table, &wheres)
        }
    }

    fn compile_delete_without_joins(
        &self,
        _query: &QueryBuilder,
        table: &str,
        wheres: &str,
    ) -> CompileResult<String> {
        Ok(join_sql(&["delete from", table, wheres]))
    }

    fn compile_delete_with_joins(
        &self,
        query: &QueryBuilder,
        table: &str,
        wheres: &str,
    ) -> CompileResult<String> {
        let alias = query
            .from
            .table()
            .map_or_else(
                || String::from(table),
                |from| self.wrap_table(&self.alias_from_from(from)),
            );
        let joins = self.compile_joins(query)?;
        Ok(join_sql(&["delete", &alias, "from", table, &joins, wheres]))
    }

    /// Orders the delete bindings the way [`Grammar::compile_delete`]
    /// emits their placeholders.
    fn prepare_bindings_for_delete(&self, query: &QueryBuilder) -> Vec<SqlValue> {
        if self.row_identifier().is_some() && query.has_joins_or_limit() {
            return query.bindings.flatten_except(&[BindingType::Select]);
        }
        query.bindings.flatten_only(&[
            BindingType::From,
            BindingType::Join,
            BindingType::Where,
        ])
    }

    /// One or more statements that empty the table, run in order.
    fn compile_truncate(&self, query: &QueryBuilder) -> CompileResult<Vec<CompiledStatement>> {
        let table = self.compile_table(query, "truncate")?;
        Ok(vec![CompiledStatement::new(
            format!("truncate table {table}"),
            vec![],
        )])
    }

    // ------------------------------------------------------------------
    // Statements paired with their bindings
    // ------------------------------------------------------------------

    fn select_statement(&self, query: &QueryBuilder) -> CompileResult<CompiledStatement> {
        let statement =
            CompiledStatement::new(self.compile_select(query)?, query.bindings.flatten());
        trace!(
            dialect = self.name(),
            sql = %statement.sql,
            bindings = statement.bindings.len(),
            "Compiled select"
        );
        Ok(statement)
    }

    fn exists_statement(&self, query: &QueryBuilder) -> CompileResult<CompiledStatement> {
        let statement =
            CompiledStatement::new(self.compile_exists(query)?, query.bindings.flatten());
        trace!(
            dialect = self.name(),
            sql = %statement.sql,
            bindings = statement.bindings.len(),
            "Compiled exists"
        );
        Ok(statement)
    }

    fn insert_statement(
        &self,
        query: &QueryBuilder,
        records: &[Record],
    ) -> CompileResult<CompiledStatement> {
        let statement = CompiledStatement::new(
            self.compile_insert(query, records)?,
            prepare_bindings_for_insert(records),
        );
        trace!(
            dialect = self.name(),
            sql = %statement.sql,
            rows = records.len(),
            "Compiled insert"
        );
        Ok(statement)
    }

    fn insert_or_ignore_statement(
        &self,
        query: &QueryBuilder,
        records: &[Record],
    ) -> CompileResult<CompiledStatement> {
        let statement = CompiledStatement::new(
            self.compile_insert_or_ignore(query, records)?,
            prepare_bindings_for_insert(records),
        );
        trace!(
            dialect = self.name(),
            sql = %statement.sql,
            rows = records.len(),
            "Compiled insert or ignore"
        );
        Ok(statement)
    }

    fn insert_get_id_statement(
        &self,
        query: &QueryBuilder,
        records: &[Record],
        sequence: Option<&str>,
    ) -> CompileResult<CompiledStatement> {
        let statement = CompiledStatement::new(
            self.compile_insert_get_id(query, records, sequence)?,
            prepare_bindings_for_insert(records),
        );
        trace!(dialect = self.name(), sql = %statement.sql, "Compiled insert get id");
        Ok(statement)
    }

    /// Upsert; `update` defaults to every column of the first record, and
    /// an explicitly empty `update` degrades to a plain insert.
    fn upsert_statement(
        &self,
        query: &QueryBuilder,
        records: &[Record],
        unique_by: &[&str],
        update: Option<&[&str]>,
    ) -> CompileResult<CompiledStatement> {
        let update: Vec<&str> = match update {
            Some([]) => return self.insert_statement(query, records),
            Some(columns) => columns.to_vec(),
            None => records
                .first()
                .map(|record| record.keys().map(String::as_str).collect())
                .unwrap_or_default(),
        };
        let statement = CompiledStatement::new(
            self.compile_upsert(query, records, unique_by, &update)?,
            prepare_bindings_for_insert(records),
        );
        trace!(
            dialect = self.name(),
            sql = %statement.sql,
            rows = records.len(),
            "Compiled upsert"
        );
        Ok(statement)
    }

    fn update_statement(
        &self,
        query: &QueryBuilder,
        items: &[UpdateItem],
    ) -> CompileResult<CompiledStatement> {
        let statement = CompiledStatement::new(
            self.compile_update(query, items)?,
            self.prepare_bindings_for_update(query, items),
        );
        trace!(
            dialect = self.name(),
            sql = %statement.sql,
            bindings = statement.bindings.len(),
            "Compiled update"
        );
        Ok(statement)
    }

    fn delete_statement(&self, query: &QueryBuilder) -> CompileResult<CompiledStatement> {
        let statement = CompiledStatement::new(
            self.compile_delete(query)?,
            self.prepare_bindings_for_delete(query),
        );
        trace!(
            dialect = self.name(),
            sql = %statement.sql,
            bindings = statement.bindings.len(),
            "Compiled delete"
        );
        Ok(statement)
    }

    fn truncate_statements(&self, query: &QueryBuilder) -> CompileResult<Vec<CompiledStatement>> {
        let statements = self.compile_truncate(query)?;
        trace!(dialect = self.name(), statements = statements.len(), "Compiled truncate");
        Ok(statements)
    }
}

/// Non-expression values of an update `set` list.
pub(super) fn update_values(items: &[UpdateItem]) -> Vec<SqlValue> {
    items
        .iter()
        .map(|item| &item.value)
        .filter(|value| !value.is_expression())
        .cloned()
        .collect()
}

fn ensure_same_columns(records: &[Record]) -> CompileResult<()> {
    let Some(first) = records.first() else {
        return Ok(());
    };
    for (index, record) in records.iter().enumerate().skip(1) {
        if !record.keys().eq(first.keys()) {
            return Err(CompileError::HeterogeneousRecords { index });
        }
    }
    Ok(())
}
