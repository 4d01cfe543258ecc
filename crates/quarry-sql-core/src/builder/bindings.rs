//! Binding sequence manager.
//!
//! Values are collected per clause category in builder-call order. The
//! categories are declared in select emission order, so the bindings of a
//! select are simply the flattened map. Mutation statements emit clauses in
//! a different order and re-linearize through the grammar.

use std::collections::BTreeMap;

use crate::ast::Record;
use crate::value::SqlValue;

/// The clause category a bound value belongs to.
///
/// The declaration order is the order placeholders appear in a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingType {
    Select,
    From,
    Join,
    Where,
    GroupBy,
    Having,
    Order,
    Union,
}

impl BindingType {
    /// All categories in emission order.
    pub const ALL: [Self; 8] = [
        Self::Select,
        Self::From,
        Self::Join,
        Self::Where,
        Self::GroupBy,
        Self::Having,
        Self::Order,
        Self::Union,
    ];
}

/// Bound values grouped by clause category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: BTreeMap<BindingType, Vec<SqlValue>>,
}

impl Bindings {
    /// Creates an empty binding map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a value under `binding_type`. Expressions are skipped since
    /// they never produce a placeholder.
    pub fn push(&mut self, binding_type: BindingType, value: SqlValue) {
        if value.is_expression() {
            return;
        }
        self.values.entry(binding_type).or_default().push(value);
    }

    /// Records every value under `binding_type`.
    pub fn extend<I>(&mut self, binding_type: BindingType, values: I)
    where
        I: IntoIterator<Item = SqlValue>,
    {
        for value in values {
            self.push(binding_type, value);
        }
    }

    /// Replaces the values of one category.
    pub fn set(&mut self, binding_type: BindingType, values: Vec<SqlValue>) {
        self.values.remove(&binding_type);
        self.extend(binding_type, values);
    }

    /// Appends every category of `other` to the same category here.
    pub fn merge(&mut self, other: Self) {
        for (binding_type, values) in other.values {
            self.extend(binding_type, values);
        }
    }

    /// Returns the values of one category.
    #[must_use]
    pub fn get(&self, binding_type: BindingType) -> &[SqlValue] {
        self.values.get(&binding_type).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of bound values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All values in emission order.
    #[must_use]
    pub fn flatten(&self) -> Vec<SqlValue> {
        self.values.values().flatten().cloned().collect()
    }

    /// All values except the given categories, in emission order.
    #[must_use]
    pub fn flatten_except(&self, except: &[BindingType]) -> Vec<SqlValue> {
        self.values
            .iter()
            .filter(|(binding_type, _)| !except.contains(binding_type))
            .flat_map(|(_, values)| values.iter().cloned())
            .collect()
    }

    /// Only the given categories, in the order they are listed.
    #[must_use]
    pub fn flatten_only(&self, only: &[BindingType]) -> Vec<SqlValue> {
        only.iter()
            .flat_map(|binding_type| self.get(*binding_type).iter().cloned())
            .collect()
    }
}

/// Bindings of a multi-row insert: row-major, each row in column order.
#[must_use]
pub fn prepare_bindings_for_insert(records: &[Record]) -> Vec<SqlValue> {
    records
        .iter()
        .flat_map(Record::values)
        .filter(|value| !value.is_expression())
        .cloned()
        .collect()
}

/// Counts `?` placeholders, ignoring those inside string literals and
/// quoted identifiers.
#[must_use]
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut quote: Option<char> = None;

    for c in sql.chars() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '?' => count += 1,
                _ => {}
            },
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::raw;

    #[test]
    fn test_push_skips_expressions() {
        let mut bindings = Bindings::new();
        bindings.push(BindingType::Where, SqlValue::Int(1));
        bindings.push(BindingType::Where, SqlValue::Expression(raw("now()")));
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn test_flatten_follows_category_order() {
        let mut bindings = Bindings::new();
        bindings.push(BindingType::Order, SqlValue::Int(4));
        bindings.push(BindingType::Where, SqlValue::Int(3));
        bindings.push(BindingType::Join, SqlValue::Int(2));
        bindings.push(BindingType::Select, SqlValue::Int(1));

        assert_eq!(
            bindings.flatten(),
            vec![
                SqlValue::Int(1),
                SqlValue::Int(2),
                SqlValue::Int(3),
                SqlValue::Int(4)
            ]
        );
        assert_eq!(
            bindings.flatten_except(&[BindingType::Select, BindingType::Join]),
            vec![SqlValue::Int(3), SqlValue::Int(4)]
        );
        assert_eq!(
            bindings.flatten_only(&[BindingType::Order, BindingType::Join]),
            vec![SqlValue::Int(4), SqlValue::Int(2)]
        );
    }

    #[test]
    fn test_merge_and_set() {
        let mut first = Bindings::new();
        first.push(BindingType::Where, SqlValue::Int(1));
        let mut second = Bindings::new();
        second.push(BindingType::Where, SqlValue::Int(2));
        second.push(BindingType::Having, SqlValue::Int(3));

        first.merge(second);
        assert_eq!(first.get(BindingType::Where).len(), 2);
        assert_eq!(first.get(BindingType::Having), &[SqlValue::Int(3)]);

        first.set(BindingType::Where, vec![SqlValue::Int(9)]);
        assert_eq!(first.get(BindingType::Where), &[SqlValue::Int(9)]);
        assert!(first.get(BindingType::Union).is_empty());
    }

    #[test]
    fn test_insert_bindings_are_row_major() {
        let mut first = Record::new();
        first.insert(String::from("b"), SqlValue::Int(2));
        first.insert(String::from("a"), SqlValue::Int(1));
        let mut second = Record::new();
        second.insert(String::from("a"), SqlValue::Int(3));
        second.insert(String::from("b"), SqlValue::Expression(raw("default")));

        assert_eq!(
            prepare_bindings_for_insert(&[first, second]),
            vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]
        );
    }

    #[test]
    fn test_count_placeholders_ignores_quoted_text() {
        assert_eq!(count_placeholders("select * from t where a = ? and b = ?"), 2);
        assert_eq!(count_placeholders("select '?' from \"t?\" where `c?` = ?"), 1);
        assert_eq!(count_placeholders("select 'it''s ?' where a = ?"), 1);
        assert_eq!(count_placeholders(""), 0);
    }
}
