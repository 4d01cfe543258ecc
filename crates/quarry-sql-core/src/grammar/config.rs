//! Grammar selection from configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{GenericGrammar, Grammar, MySqlGrammar, PostgresGrammar, SqliteGrammar};
use crate::error::CompileError;

/// The database driver a grammar is built for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    #[default]
    Generic,
    #[serde(alias = "mariadb")]
    MySql,
    #[serde(alias = "pgsql", alias = "postgresql")]
    Postgres,
    #[serde(alias = "sqlite3")]
    Sqlite,
}

impl DriverKind {
    /// Returns the canonical lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverKind {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" => Ok(Self::Generic),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "pgsql" | "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(CompileError::UnknownDriver(s.to_string())),
        }
    }
}

/// Which grammar to build and with what table prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarConfig {
    #[serde(default)]
    pub driver: DriverKind,
    #[serde(default)]
    pub prefix: String,
}

impl GrammarConfig {
    #[must_use]
    pub fn new(driver: DriverKind) -> Self {
        Self {
            driver,
            prefix: String::new(),
        }
    }

    /// Sets the table prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Builds the configured grammar.
    #[must_use]
    pub fn grammar(&self) -> Box<dyn Grammar + Send + Sync> {
        let prefix = self.prefix.clone();
        match self.driver {
            DriverKind::Generic => Box::new(GenericGrammar::new().with_prefix(prefix)),
            DriverKind::MySql => Box::new(MySqlGrammar::new().with_prefix(prefix)),
            DriverKind::Postgres => Box::new(PostgresGrammar::new().with_prefix(prefix)),
            DriverKind::Sqlite => Box::new(SqliteGrammar::new().with_prefix(prefix)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_aliases() {
        assert_eq!("MariaDB".parse::<DriverKind>(), Ok(DriverKind::MySql));
        assert_eq!("pgsql".parse::<DriverKind>(), Ok(DriverKind::Postgres));
        assert_eq!("sqlite3".parse::<DriverKind>(), Ok(DriverKind::Sqlite));
        assert_eq!(
            "oracle".parse::<DriverKind>(),
            Err(CompileError::UnknownDriver(String::from("oracle")))
        );
    }

    #[test]
    fn test_grammar_from_config() {
        let grammar = GrammarConfig::new(DriverKind::MySql)
            .with_prefix("tiny_")
            .grammar();
        assert_eq!(grammar.name(), "mysql");
        assert_eq!(grammar.wrap_table("users"), "`tiny_users`");
    }

    #[test]
    fn test_config_deserializes_aliases() {
        let config: GrammarConfig =
            serde_json::from_str(r#"{"driver": "postgresql", "prefix": "app_"}"#).unwrap();
        assert_eq!(config.driver, DriverKind::Postgres);
        assert_eq!(config.grammar().wrap_table("users"), "\"app_users\"");

        let defaults: GrammarConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, GrammarConfig::default());
        assert_eq!(
            serde_json::to_string(&GrammarConfig::new(DriverKind::Sqlite)).unwrap(),
            r#"{"driver":"sqlite","prefix":""}"#
        );
    }
}
