#![allow(dead_code)]

use quarry_sql_core::ast::Record;
use quarry_sql_core::builder::count_placeholders;
use quarry_sql_core::grammar::{
    CompiledStatement, GenericGrammar, Grammar, MySqlGrammar, PostgresGrammar, SqliteGrammar,
};
use quarry_sql_core::SqlValue;

/// Every shipped dialect.
pub fn grammars() -> Vec<Box<dyn Grammar>> {
    vec![
        Box::new(GenericGrammar::new()),
        Box::new(MySqlGrammar::new()),
        Box::new(PostgresGrammar::new()),
        Box::new(SqliteGrammar::new()),
    ]
}

pub fn record(pairs: &[(&str, SqlValue)]) -> Record {
    pairs
        .iter()
        .map(|(column, value)| (String::from(*column), value.clone()))
        .collect()
}

/// Replaces each unquoted `?` with the inline form of the next binding.
pub fn interpolate(sql: &str, bindings: &[SqlValue]) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut values = bindings.iter();
    let mut quote: Option<char> = None;

    for c in sql.chars() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '?' => {
                    let value = values
                        .next()
                        .unwrap_or_else(|| panic!("more placeholders than bindings in: {sql}"));
                    out.push_str(&value.to_sql_inline());
                    continue;
                }
                _ => {}
            },
        }
        out.push(c);
    }

    assert!(
        values.next().is_none(),
        "more bindings than placeholders in: {sql}"
    );
    out
}

pub fn assert_aligned(statement: &CompiledStatement, context: &str) {
    assert_eq!(
        count_placeholders(&statement.sql),
        statement.bindings.len(),
        "placeholder/binding mismatch for {context}: {}",
        statement.sql
    );
}
