//! # quarry-sql-driver
//!
//! A result cursor over a minimal driver interface.
//!
//! A database driver implements [`SqlResult`]: execution, a random-access
//! `fetch(n)` and optional sequential shortcuts. [`SqlQuery`] builds the
//! full cursor on top of it: `next`/`previous`/`first`/`last`, absolute and
//! relative `seek`, field access by index or name, and the last-error slot.
//!
//! ```rust
//! use quarry_sql_core::SqlValue;
//! use quarry_sql_driver::{MemoryResult, Position, SqlQuery};
//!
//! let driver = MemoryResult::new().with_rows(
//!     "select id from users",
//!     &["id"],
//!     vec![vec![SqlValue::Int(1)], vec![SqlValue::Int(2)]],
//! );
//! let mut query = SqlQuery::new(driver);
//!
//! assert!(query.exec("select id from users").unwrap());
//! let mut ids = Vec::new();
//! while query.next() {
//!     ids.push(query.value(0));
//! }
//! assert_eq!(ids, vec![SqlValue::Int(1), SqlValue::Int(2)]);
//! assert_eq!(query.at(), Position::AfterLastRow);
//! ```
//!
//! Compiled statements run as prepared statements with their bindings:
//!
//! ```rust
//! use quarry_sql_core::builder::QueryBuilder;
//! use quarry_sql_core::grammar::SqliteGrammar;
//! use quarry_sql_core::SqlValue;
//! use quarry_sql_driver::{MemoryResult, SqlQuery};
//!
//! let driver = MemoryResult::new().with_rows(
//!     r#"select * from "users" where "id" = ?"#,
//!     &["id"],
//!     vec![vec![SqlValue::Int(7)]],
//! );
//! let mut query = SqlQuery::new(driver);
//! let users = QueryBuilder::table("users").where_eq("id", 7);
//!
//! assert!(query.exec_select(&SqliteGrammar::new(), &users).unwrap());
//! assert_eq!(query.bound_values(), &[SqlValue::Int(7)]);
//! assert!(query.first());
//! ```

pub mod error;
pub mod memory;
pub mod query;
pub mod record;
pub mod result;

pub use error::{QueryError, Result, SqlError, SqlErrorKind};
pub use memory::{ExecutedStatement, FetchCall, MemoryResult, Response};
pub use query::{Position, SqlQuery};
pub use record::{SqlField, SqlRecord};
pub use result::{ExecOutcome, SqlResult};
