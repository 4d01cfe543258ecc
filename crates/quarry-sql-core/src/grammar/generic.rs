//! Generic SQL grammar.

use super::Grammar;

/// Generic SQL grammar: double-quoted identifiers and no dialect extensions.
#[derive(Debug, Default, Clone)]
pub struct GenericGrammar {
    prefix: String,
}

impl GenericGrammar {
    /// Creates a new generic grammar.
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

impl Grammar for GenericGrammar {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn table_prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Record;
    use crate::builder::QueryBuilder;
    use crate::error::CompileError;

    #[test]
    fn test_generic_grammar() {
        let grammar = GenericGrammar::new();
        assert_eq!(grammar.name(), "generic");
        assert_eq!(grammar.wrap_value("id"), "\"id\"");
        assert_eq!(grammar.table_prefix(), "");
    }

    #[test]
    fn test_insert_or_ignore_is_unsupported() {
        let query = QueryBuilder::table("users");
        assert!(matches!(
            GenericGrammar::new().compile_insert_or_ignore(&query, &[Record::new()]),
            Err(CompileError::UnsupportedFeature { dialect: "generic", .. })
        ));
    }

    #[test]
    fn test_truncate() {
        let query = QueryBuilder::table("users");
        let statements = GenericGrammar::new().compile_truncate(&query).unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].sql, "truncate table \"users\"");
    }
}
