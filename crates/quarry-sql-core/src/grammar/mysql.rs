//! MySQL grammar.

use super::wrap::{self, join_sql};
use super::{update_values, Grammar};
use crate::ast::{Lock, Record, UpdateItem};
use crate::builder::{BindingType, QueryBuilder};
use crate::error::CompileResult;
use crate::value::SqlValue;

/// MySQL / MariaDB grammar.
#[derive(Debug, Default, Clone)]
pub struct MySqlGrammar {
    prefix: String,
}

impl MySqlGrammar {
    /// Creates a new MySQL grammar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            prefix: String::new(),
        }
    }

    /// Sets the table prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Order and limit, which MySQL accepts on single-table mutations.
    fn compile_order_and_limit(&self, query: &QueryBuilder) -> (String, String) {
        let orders = if query.orders.is_empty() {
            String::new()
        } else {
            self.compile_orders(query)
        };
        (orders, self.compile_limit(query))
    }
}

impl Grammar for MySqlGrammar {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn table_prefix(&self) -> &str {
        &self.prefix
    }

    fn wrap_value(&self, value: &str) -> String {
        wrap::quote_identifier(value, '`')
    }

    fn compile_lock(&self, query: &QueryBuilder) -> String {
        match &query.lock {
            Lock::None => String::new(),
            Lock::ForUpdate => String::from("for update"),
            Lock::Shared => String::from("lock in share mode"),
            Lock::Raw(sql) => sql.clone(),
        }
    }

    fn compile_empty_insert(&self, table: &str) -> String {
        format!("insert into {table} () values ()")
    }

    fn compile_insert_or_ignore(
        &self,
        query: &QueryBuilder,
        records: &[Record],
    ) -> CompileResult<String> {
        let sql = self.compile_insert(query, records)?;
        Ok(format!(
            "insert ignore{}",
            sql.strip_prefix("insert").unwrap_or(&sql)
        ))
    }

    fn compile_upsert(
        &self,
        query: &QueryBuilder,
        records: &[Record],
        _unique_by: &[&str],
        update: &[&str],
    ) -> CompileResult<String> {
        let sql = self.compile_insert(query, records)?;
        let columns: Vec<String> = update
            .iter()
            .map(|column| {
                let wrapped = self.wrap(column);
                format!("{wrapped} = values({wrapped})")
            })
            .collect();
        Ok(format!(
            "{sql} on duplicate key update {}",
            columns.join(", ")
        ))
    }

    fn compile_update_without_joins(
        &self,
        query: &QueryBuilder,
        table: &str,
        columns: &str,
        wheres: &str,
    ) -> CompileResult<String> {
        let (orders, limit) = self.compile_order_and_limit(query);
        Ok(join_sql(&[
            "update", table, "set", columns, wheres, &orders, &limit,
        ]))
    }

    fn prepare_bindings_for_update(
        &self,
        query: &QueryBuilder,
        items: &[UpdateItem],
    ) -> Vec<SqlValue> {
        let mut bindings = query
            .bindings
            .flatten_only(&[BindingType::From, BindingType::Join]);
        bindings.extend(update_values(items));
        bindings.extend(query.bindings.flatten_only(&[BindingType::Where]));
        if query.joins.is_empty() {
            bindings.extend(query.bindings.flatten_only(&[BindingType::Order]));
        }
        bindings
    }

    fn compile_delete_without_joins(
        &self,
        query: &QueryBuilder,
        table: &str,
        wheres: &str,
    ) -> CompileResult<String> {
        let (orders, limit) = self.compile_order_and_limit(query);
        Ok(join_sql(&["delete from", table, wheres, &orders, &limit]))
    }

    fn prepare_bindings_for_delete(&self, query: &QueryBuilder) -> Vec<SqlValue> {
        let mut bindings = query.bindings.flatten_only(&[
            BindingType::From,
            BindingType::Join,
            BindingType::Where,
        ]);
        if query.joins.is_empty() {
            bindings.extend(query.bindings.flatten_only(&[BindingType::Order]));
        }
        bindings
    }
}
