//! # quarry-sql-core
//!
//! Dialect-aware SQL compilation with ordered parameter bindings.
//!
//! This crate provides:
//! - A value model that separates bound parameters from raw expressions
//! - A clause AST and a fluent builder that records bindings per clause
//! - A [`Grammar`](grammar::Grammar) trait with generic, MySQL, PostgreSQL
//!   and SQLite dialects
//! - Binding re-ordering so placeholders and values always line up
//!
//! ## Compiling a query
//!
//! ```rust
//! use quarry_sql_core::builder::QueryBuilder;
//! use quarry_sql_core::grammar::{DriverKind, GrammarConfig};
//!
//! let grammar = GrammarConfig::new(DriverKind::MySql).grammar();
//! let query = QueryBuilder::table("users").where_eq("id", 5);
//!
//! let statement = grammar.select_statement(&query).unwrap();
//! assert_eq!(statement.sql, "select * from `users` where `id` = ?");
//! ```
//!
//! ## Raw expressions
//!
//! Values wrapped with [`raw`] are inlined and never bound:
//!
//! ```rust
//! use quarry_sql_core::ast::UpdateItem;
//! use quarry_sql_core::builder::QueryBuilder;
//! use quarry_sql_core::grammar::{GenericGrammar, Grammar};
//! use quarry_sql_core::{raw, SqlValue, ToSqlValue};
//!
//! let query = QueryBuilder::table("posts").where_eq("id", 3);
//! let items = [
//!     UpdateItem::new("views", raw("views + 1").to_sql_value()),
//!     UpdateItem::new("title", SqlValue::Text(String::from("hi"))),
//! ];
//!
//! let statement = GenericGrammar::new().update_statement(&query, &items).unwrap();
//! assert_eq!(
//!     statement.sql,
//!     r#"update "posts" set "views" = views + 1, "title" = ? where "id" = ?"#
//! );
//! assert_eq!(statement.bindings.len(), 2);
//! ```

pub mod ast;
pub mod builder;
pub mod error;
pub mod grammar;
pub mod value;

pub use builder::QueryBuilder;
pub use error::{CompileError, CompileResult};
pub use grammar::{CompiledStatement, Grammar};
pub use value::{raw, Expression, SqlValue, ToSqlValue};
