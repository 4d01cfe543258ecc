//! SQLite grammar.

use super::postgres::{compile_conflict_update, compile_unqualified_update_columns};
use super::{CompiledStatement, Grammar};
use crate::ast::{Column, DatePart, Record, UnionItem, UpdateItem};
use crate::builder::QueryBuilder;
use crate::error::{CompileError, CompileResult};
use crate::value::SqlValue;

/// SQLite grammar.
#[derive(Debug, Default, Clone)]
pub struct SqliteGrammar {
    prefix: String,
}

impl SqliteGrammar {
    /// Creates a new SQLite grammar.
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
}

impl Grammar for SqliteGrammar {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn table_prefix(&self) -> &str {
        &self.prefix
    }

    fn row_identifier(&self) -> Option<&'static str> {
        Some("rowid")
    }

    fn where_date_based(
        &self,
        part: DatePart,
        column: &Column,
        operator: &str,
        value: &SqlValue,
    ) -> String {
        let column = self.wrap_column(column);
        let expression = match part {
            DatePart::Date => format!("strftime('%Y-%m-%d', {column})"),
            DatePart::Time => format!("strftime('%H:%M:%S', {column})"),
            DatePart::Day => format!("cast(strftime('%d', {column}) as integer)"),
            DatePart::Month => format!("cast(strftime('%m', {column}) as integer)"),
            DatePart::Year => format!("cast(strftime('%Y', {column}) as integer)"),
        };
        format!("{expression} {operator} {}", self.parameter(value))
    }

    /// SQLite has no row locks.
    fn compile_lock(&self, _query: &QueryBuilder) -> String {
        String::new()
    }

    fn compile_union(&self, union: &UnionItem) -> CompileResult<String> {
        let keyword = if union.all { "union all" } else { "union" };
        Ok(format!(
            "{keyword} select * from ({})",
            self.compile_select(&union.query)?
        ))
    }

    fn compile_insert_or_ignore(
        &self,
        query: &QueryBuilder,
        records: &[Record],
    ) -> CompileResult<String> {
        let sql = self.compile_insert(query, records)?;
        Ok(format!(
            "insert or ignore{}",
            sql.strip_prefix("insert").unwrap_or(&sql)
        ))
    }

    fn compile_upsert(
        &self,
        query: &QueryBuilder,
        records: &[Record],
        unique_by: &[&str],
        update: &[&str],
    ) -> CompileResult<String> {
        let insert = self.compile_insert(query, records)?;
        Ok(compile_conflict_update(self, &insert, unique_by, update))
    }

    fn compile_update_columns(&self, items: &[UpdateItem]) -> String {
        compile_unqualified_update_columns(self, items)
    }

    /// Clears the autoincrement sequence, then the rows.
    fn compile_truncate(&self, query: &QueryBuilder) -> CompileResult<Vec<CompiledStatement>> {
        let Some(table) = query.from.table() else {
            return Err(CompileError::MissingTable {
                statement: "truncate",
            });
        };
        Ok(vec![
            CompiledStatement::new(
                "delete from sqlite_sequence where name = ?",
                vec![SqlValue::Text(format!("{}{table}", self.prefix))],
            ),
            CompiledStatement::new(format!("delete from {}", self.wrap_table(table)), vec![]),
        ])
    }
}
