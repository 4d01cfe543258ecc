//! Field metadata for result rows.

use quarry_sql_core::SqlValue;

/// One column of a result row.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlField {
    pub name: String,
    pub value: SqlValue,
    /// Originating table, when the driver knows it.
    pub table: Option<String>,
}

impl SqlField {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: SqlValue::Null,
            table: None,
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

/// The ordered fields of a result row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlRecord {
    fields: Vec<SqlField>,
}

impl SqlRecord {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn append(&mut self, field: SqlField) {
        self.fields.push(field);
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of the field called `name`, compared case-insensitively.
    ///
    /// A `table.field` name only matches a field from that table.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let (table, field) = match name.split_once('.') {
            Some((table, field)) => (Some(table), field),
            None => (None, name),
        };
        self.fields.iter().position(|candidate| {
            candidate.name.eq_ignore_ascii_case(field)
                && table.is_none_or(|table| {
                    candidate
                        .table
                        .as_deref()
                        .is_some_and(|own| own.eq_ignore_ascii_case(table))
                })
        })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    #[must_use]
    pub fn field(&self, index: usize) -> Option<&SqlField> {
        self.fields.get(index)
    }

    #[must_use]
    pub fn field_name(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|field| field.name.as_str())
    }

    /// Value at `index`, `Null` when out of range.
    #[must_use]
    pub fn value(&self, index: usize) -> SqlValue {
        self.fields
            .get(index)
            .map_or(SqlValue::Null, |field| field.value.clone())
    }

    /// Value of the field called `name`, `Null` when unknown.
    #[must_use]
    pub fn value_by_name(&self, name: &str) -> SqlValue {
        self.index_of(name)
            .map_or(SqlValue::Null, |index| self.value(index))
    }

    /// Sets the value at `index`; out of range indexes are ignored.
    pub fn set_value(&mut self, index: usize, value: SqlValue) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value;
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &SqlField> {
        self.fields.iter()
    }
}

impl FromIterator<SqlField> for SqlRecord {
    fn from_iter<I: IntoIterator<Item = SqlField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SqlRecord {
        [
            SqlField::new("id").with_table("users"),
            SqlField::new("Name").with_table("users"),
            SqlField::new("id").with_table("posts"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_index_of_is_case_insensitive() {
        let record = record();
        assert_eq!(record.index_of("name"), Some(1));
        assert_eq!(record.index_of("ID"), Some(0));
        assert_eq!(record.index_of("email"), None);
    }

    #[test]
    fn test_index_of_qualified_name() {
        let record = record();
        assert_eq!(record.index_of("posts.id"), Some(2));
        assert_eq!(record.index_of("users.id"), Some(0));
        assert!(!record.contains("comments.id"));
    }

    #[test]
    fn test_set_value() {
        let mut record = record();
        record.set_value(1, SqlValue::Text(String::from("ada")));
        record.set_value(9, SqlValue::Int(1));
        assert_eq!(
            record.value_by_name("name"),
            SqlValue::Text(String::from("ada"))
        );
        assert_eq!(record.value(9), SqlValue::Null);
        assert_eq!(record.field_name(2), Some("id"));
        assert_eq!(record.count(), 3);
    }
}
