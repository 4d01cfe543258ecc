//! PostgreSQL grammar.

use super::{CompiledStatement, Grammar};
use crate::ast::{Column, DatePart, Distinct, Lock, Record, UpdateItem};
use crate::builder::QueryBuilder;
use crate::error::CompileResult;
use crate::value::SqlValue;

/// PostgreSQL grammar.
#[derive(Debug, Default, Clone)]
pub struct PostgresGrammar {
    prefix: String,
}

impl PostgresGrammar {
    /// Creates a new PostgreSQL grammar.
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

/// `on conflict (...) do update set c = "excluded"."c"`, shared with SQLite.
pub(super) fn compile_conflict_update<G: Grammar + ?Sized>(
    grammar: &G,
    insert: &str,
    unique_by: &[&str],
    update: &[&str],
) -> String {
    let excluded = grammar.wrap_value("excluded");
    let columns: Vec<String> = update
        .iter()
        .map(|column| {
            let wrapped = grammar.wrap(column);
            format!("{wrapped} = {excluded}.{wrapped}")
        })
        .collect();
    format!(
        "{insert} on conflict ({}) do update set {}",
        grammar.wrap_list(unique_by),
        columns.join(", ")
    )
}

/// Update assignments with unqualified column names, shared with SQLite.
pub(super) fn compile_unqualified_update_columns<G: Grammar + ?Sized>(
    grammar: &G,
    items: &[UpdateItem],
) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{} = {}",
                grammar.wrap(&grammar.unqualify_column(&item.column)),
                grammar.parameter(&item.value)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl Grammar for PostgresGrammar {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn table_prefix(&self) -> &str {
        &self.prefix
    }

    fn row_identifier(&self) -> Option<&'static str> {
        Some("ctid")
    }

    fn compile_columns(&self, query: &QueryBuilder) -> CompileResult<String> {
        let select = match &query.distinct {
            Distinct::None => String::from("select"),
            Distinct::All => String::from("select distinct"),
            Distinct::Columns(columns) => {
                let names: Vec<&str> = columns.iter().map(String::as_str).collect();
                format!("select distinct on ({})", self.wrap_list(&names))
            }
        };
        Ok(format!("{select} {}", self.compile_column_list(query)))
    }

    /// LIKE-family operators compare the text form of the column.
    fn where_basic(&self, column: &Column, operator: &str, value: &SqlValue) -> String {
        let mut column = self.wrap_column(column);
        if operator.to_ascii_lowercase().contains("like") {
            column.push_str("::text");
        }
        format!("{column} {operator} {}", self.parameter(value))
    }

    fn where_date_based(
        &self,
        part: DatePart,
        column: &Column,
        operator: &str,
        value: &SqlValue,
    ) -> String {
        let column = self.wrap_column(column);
        let parameter = self.parameter(value);
        match part {
            DatePart::Date => format!("{column}::date {operator} {parameter}"),
            DatePart::Time => format!("{column}::time {operator} {parameter}"),
            DatePart::Day | DatePart::Month | DatePart::Year => format!(
                "extract({} from {column}) {operator} {parameter}",
                part.as_str()
            ),
        }
    }

    fn compile_lock(&self, query: &QueryBuilder) -> String {
        match &query.lock {
            Lock::None => String::new(),
            Lock::ForUpdate => String::from("for update"),
            Lock::Shared => String::from("for share"),
            Lock::Raw(sql) => sql.clone(),
        }
    }

    fn compile_insert_or_ignore(
        &self,
        query: &QueryBuilder,
        records: &[Record],
    ) -> CompileResult<String> {
        Ok(format!(
            "{} on conflict do nothing",
            self.compile_insert(query, records)?
        ))
    }

    fn compile_insert_get_id(
        &self,
        query: &QueryBuilder,
        records: &[Record],
        sequence: Option<&str>,
    ) -> CompileResult<String> {
        Ok(format!(
            "{} returning {}",
            self.compile_insert(query, records)?,
            self.wrap(sequence.unwrap_or("id"))
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

    fn compile_truncate(&self, query: &QueryBuilder) -> CompileResult<Vec<CompiledStatement>> {
        let table = self.compile_table(query, "truncate")?;
        Ok(vec![CompiledStatement::new(
            format!("truncate {table} restart identity cascade"),
            vec![],
        )])
    }
}
