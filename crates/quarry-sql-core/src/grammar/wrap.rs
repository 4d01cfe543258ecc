//! String helpers behind identifier wrapping and clause concatenation.
//!
//! These are pure transforms; malformed input yields a degenerate string
//! rather than an error.

/// Splits `"left as right"` on the first case-insensitive ` as `.
#[must_use]
pub fn split_alias(value: &str) -> Option<(&str, &str)> {
    // ASCII lowercasing keeps byte offsets intact.
    let position = value.to_ascii_lowercase().find(" as ")?;
    Some((&value[..position], &value[position + 4..]))
}

/// Quotes one identifier segment, doubling embedded quotes. `*` passes
/// through unquoted.
#[must_use]
pub fn quote_identifier(value: &str, quote: char) -> String {
    if value == "*" {
        return String::from(value);
    }
    let doubled = format!("{quote}{quote}");
    let escaped = value.replace(quote, &doubled);
    format!("{quote}{escaped}{quote}")
}

/// Returns the part after the last dot.
#[must_use]
pub fn unqualify_column(column: &str) -> &str {
    column.rsplit_once('.').map_or(column, |(_, name)| name)
}

/// Returns the alias of `"table as alias"`, or the table itself.
#[must_use]
pub fn alias_from_from(table: &str) -> &str {
    split_alias(table).map_or(table, |(_, alias)| alias)
}

/// Strips the connective in front of the first clause fragment.
#[must_use]
pub fn remove_leading_boolean(sql: &str) -> &str {
    sql.strip_prefix("and ")
        .or_else(|| sql.strip_prefix("or "))
        .unwrap_or(sql)
}

/// Joins the non-empty fragments with single spaces.
#[must_use]
pub fn join_sql(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_alias_is_case_insensitive() {
        assert_eq!(split_alias("users as u"), Some(("users", "u")));
        assert_eq!(split_alias("users AS u"), Some(("users", "u")));
        assert_eq!(split_alias("users"), None);
        assert_eq!(split_alias("basket"), None);
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("name", '"'), "\"name\"");
        assert_eq!(quote_identifier("na\"me", '"'), "\"na\"\"me\"");
        assert_eq!(quote_identifier("na`me", '`'), "`na``me`");
        assert_eq!(quote_identifier("*", '"'), "*");
    }

    #[test]
    fn test_unqualify_and_alias() {
        assert_eq!(unqualify_column("users.name"), "name");
        assert_eq!(unqualify_column("db.users.name"), "name");
        assert_eq!(unqualify_column("name"), "name");
        assert_eq!(alias_from_from("users as u"), "u");
        assert_eq!(alias_from_from("users"), "users");
    }

    #[test]
    fn test_remove_leading_boolean_strips_once() {
        assert_eq!(remove_leading_boolean("and a = ? and b = ?"), "a = ? and b = ?");
        assert_eq!(remove_leading_boolean("or a = ?"), "a = ?");
        assert_eq!(remove_leading_boolean("and and_flag = 1"), "and_flag = 1");
        assert_eq!(remove_leading_boolean("order = 1"), "order = 1");
    }

    #[test]
    fn test_join_sql_skips_empty_parts() {
        assert_eq!(
            join_sql(&["update", "\"t\"", "", "set", "a = ?", ""]),
            "update \"t\" set a = ?"
        );
    }
}
