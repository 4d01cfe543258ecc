//! Query state builder and binding sequence manager.
//!
//! ```rust
//! use quarry_sql_core::builder::{BindingType, QueryBuilder};
//! use quarry_sql_core::SqlValue;
//!
//! let query = QueryBuilder::table("users").where_eq("id", 5).limit(10);
//!
//! assert_eq!(query.bindings().get(BindingType::Where), &[SqlValue::Int(5)]);
//! ```

mod bindings;
mod join;
mod query;

pub use bindings::{count_placeholders, prepare_bindings_for_insert, BindingType, Bindings};
pub use join::JoinClause;
pub use query::QueryBuilder;
