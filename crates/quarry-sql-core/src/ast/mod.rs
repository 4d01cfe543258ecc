//! Clause AST.
//!
//! A closed set of tagged variants for where/having predicates, joins,
//! orders and update items. The builder produces them and the grammar
//! consumes them; nothing here knows how to render SQL.

mod clause;
mod types;

pub use clause::{
    HavingItem, HavingKind, OrderItem, Record, UnionItem, UpdateItem, WhereItem, WhereKind,
};
pub use types::{
    Aggregate, Column, Condition, DatePart, Direction, Distinct, FromClause, JoinType, Lock,
};
