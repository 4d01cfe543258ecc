//! Error types for statement compilation.

/// Errors raised while compiling a query into SQL text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The dialect has no syntax for the requested feature.
    #[error("{feature} is not supported by the {dialect} grammar")]
    UnsupportedFeature {
        dialect: &'static str,
        feature: &'static str,
    },

    /// The statement needs a table and none was set.
    #[error("{statement} statement requires a table")]
    MissingTable { statement: &'static str },

    /// Insert records do not share one column set.
    #[error("insert record {index} does not have the same columns as the first record")]
    HeterogeneousRecords { index: usize },

    /// A joined or limited mutation cannot be rewritten against a raw table.
    #[error("{dialect} cannot rewrite a {statement} with joins or limit over a raw table expression")]
    RawTableRewrite {
        dialect: &'static str,
        statement: &'static str,
    },

    /// Unknown driver name in the grammar configuration.
    #[error("unknown database driver '{0}'")]
    UnknownDriver(String),
}

/// Result type for compile operations.
pub type CompileResult<T> = std::result::Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CompileError::UnsupportedFeature {
            dialect: "generic",
            feature: "insert or ignore",
        };
        assert_eq!(
            err.to_string(),
            "insert or ignore is not supported by the generic grammar"
        );
        assert_eq!(
            CompileError::MissingTable { statement: "update" }.to_string(),
            "update statement requires a table"
        );
    }
}
