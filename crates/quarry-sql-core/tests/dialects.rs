//! Statement rendering across dialects.

mod common;

use common::*;
use quarry_sql_core::ast::{Direction, UpdateItem};
use quarry_sql_core::builder::QueryBuilder;
use quarry_sql_core::grammar::{
    DriverKind, GenericGrammar, Grammar, GrammarConfig, MySqlGrammar, PostgresGrammar,
    SqliteGrammar,
};
use quarry_sql_core::{raw, CompileError, SqlValue};

#[test]
fn components_keep_their_order_in_every_dialect() {
    let query = QueryBuilder::table("users")
        .aggregate("count", &[])
        .where_eq("id", 1)
        .order_by("name", Direction::Asc)
        .limit(3);

    for grammar in grammars() {
        let sql = grammar.select_statement(&query).unwrap().sql;
        let positions: Vec<usize> = ["count(*)", " from ", " where ", " order by ", " limit 3"]
            .iter()
            .map(|fragment| {
                sql.find(fragment)
                    .unwrap_or_else(|| panic!("{fragment} missing from {sql}"))
            })
            .collect();
        assert!(
            positions.windows(2).all(|pair| pair[0] < pair[1]),
            "{}: {sql}",
            grammar.name()
        );
    }
}

#[test]
fn generic_select_end_to_end() {
    let query = QueryBuilder::table("users")
        .select(&["id", "name"])
        .where_("age", ">", 18)
        .where_in("status", ["active", "pending"])
        .order_by("name", Direction::Asc)
        .limit(10);

    let statement = GenericGrammar::new().select_statement(&query).unwrap();
    assert_eq!(
        statement.sql,
        "select \"id\", \"name\" from \"users\" where \"age\" > ? \
         and \"status\" in (?, ?) order by \"name\" asc limit 10"
    );
    assert_eq!(
        statement.bindings,
        vec![
            SqlValue::Int(18),
            SqlValue::Text(String::from("active")),
            SqlValue::Text(String::from("pending")),
        ]
    );
}

#[test]
fn expressions_pass_through_verbatim() {
    let query = QueryBuilder::table("posts")
        .where_("published_at", "<", raw("now()"))
        .where_in("id", [SqlValue::Int(1), SqlValue::Expression(raw("last_id()"))]);

    for grammar in grammars() {
        let statement = grammar.select_statement(&query).unwrap();
        assert!(statement.sql.contains("< now()"), "{}", statement.sql);
        assert!(statement.sql.contains("in (?, last_id())"), "{}", statement.sql);
        assert_eq!(statement.bindings, vec![SqlValue::Int(1)]);
    }
}

#[test]
fn identifiers_follow_dialect_quoting() {
    let expected = [
        ("generic", "\"app_users\" as \"app_u\"", "\"app_u\".\"id\""),
        ("mysql", "`app_users` as `app_u`", "`app_u`.`id`"),
        ("postgres", "\"app_users\" as \"app_u\"", "\"app_u\".\"id\""),
        ("sqlite", "\"app_users\" as \"app_u\"", "\"app_u\".\"id\""),
    ];
    for (driver, table, column) in expected {
        let grammar = GrammarConfig::new(driver.parse::<DriverKind>().unwrap())
            .with_prefix("app_")
            .grammar();
        assert_eq!(grammar.wrap_table("users as u"), table);
        assert_eq!(grammar.wrap("u.id"), column);
        assert_eq!(grammar.wrap("*"), "*");
    }
}

#[test]
fn nested_groups_compile_with_their_bindings() {
    let query = QueryBuilder::table("users")
        .where_eq("a", 1)
        .where_nested(|q| q.where_eq("b", 2).or_where_eq("c", 3))
        .or_where_nested(|q| q.where_null("d"));

    for grammar in grammars() {
        let statement = grammar.select_statement(&query).unwrap();
        assert_aligned(&statement, grammar.name());
        assert!(statement.sql.contains(" and ("), "{}", statement.sql);
        assert!(statement.sql.contains(" or ("), "{}", statement.sql);
        assert_eq!(
            statement.bindings,
            vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)]
        );
    }
}

#[test]
fn insert_orders_values_by_column() {
    let query = QueryBuilder::table("users");
    let records = [
        record(&[
            ("name", SqlValue::Text(String::from("ada"))),
            ("age", SqlValue::Int(36)),
        ]),
        record(&[
            ("name", SqlValue::Text(String::from("alan"))),
            ("age", SqlValue::Expression(raw("default"))),
        ]),
    ];

    for grammar in grammars() {
        let statement = grammar.insert_statement(&query, &records).unwrap();
        assert_aligned(&statement, grammar.name());
        assert!(statement.sql.ends_with("values (?, ?), (default, ?)"), "{}", statement.sql);
        assert_eq!(
            statement.bindings,
            vec![
                SqlValue::Int(36),
                SqlValue::Text(String::from("ada")),
                SqlValue::Text(String::from("alan")),
            ]
        );
    }
}

#[test]
fn insert_rejects_mismatched_records() {
    let query = QueryBuilder::table("users");
    let records = [
        record(&[("name", SqlValue::Text(String::from("ada")))]),
        record(&[("email", SqlValue::Text(String::from("a@b.c")))]),
    ];
    for grammar in grammars() {
        assert_eq!(
            grammar.insert_statement(&query, &records),
            Err(CompileError::HeterogeneousRecords { index: 1 })
        );
    }
}

#[test]
fn insert_with_a_leading_empty_record_is_rejected() {
    let query = QueryBuilder::table("users");
    let records = [
        record(&[]),
        record(&[("name", SqlValue::Text(String::from("x")))]),
    ];
    for grammar in grammars() {
        assert_eq!(
            grammar.insert_statement(&query, &records),
            Err(CompileError::HeterogeneousRecords { index: 1 }),
            "{}",
            grammar.name()
        );
        let empty = grammar.insert_statement(&query, &[]).unwrap();
        assert_aligned(&empty, grammar.name());
        assert!(empty.bindings.is_empty());
    }
}

#[test]
fn upsert_support_depends_on_dialect() {
    let query = QueryBuilder::table("tags");
    let records = [record(&[
        ("name", SqlValue::Text(String::from("rust"))),
        ("uses", SqlValue::Int(1)),
    ])];

    assert_eq!(
        GenericGrammar::new().upsert_statement(&query, &records, &["name"], None),
        Err(CompileError::UnsupportedFeature {
            dialect: "generic",
            feature: "upsert",
        })
    );
    assert!(MySqlGrammar::new()
        .upsert_statement(&query, &records, &["name"], None)
        .unwrap()
        .sql
        .ends_with("on duplicate key update `name` = values(`name`), `uses` = values(`uses`)"));
    assert!(SqliteGrammar::new()
        .upsert_statement(&query, &records, &["name"], Some(&["uses"][..]))
        .unwrap()
        .sql
        .ends_with("on conflict (\"name\") do update set \"uses\" = \"excluded\".\"uses\""));

    let plain = PostgresGrammar::new()
        .upsert_statement(&query, &records, &["name"], Some(&[][..]))
        .unwrap();
    assert_eq!(plain.sql, "insert into \"tags\" (\"name\", \"uses\") values (?, ?)");
}

#[test]
fn mutations_without_a_table_fail() {
    let query = QueryBuilder::new().where_eq("id", 1);
    for grammar in grammars() {
        assert_eq!(
            grammar
                .update_statement(&query, &[UpdateItem::new("name", SqlValue::Null)])
                .map(|statement| statement.sql),
            Err(CompileError::MissingTable {
                statement: "update"
            })
        );
        assert_eq!(
            grammar.delete_statement(&query).map(|statement| statement.sql),
            Err(CompileError::MissingTable {
                statement: "delete"
            })
        );
    }
}

#[test]
fn raw_source_cannot_be_rewritten_through_row_id() {
    let query = QueryBuilder::new()
        .from_raw(raw("(select * from users) as u"), vec![])
        .limit(1);
    for grammar in [
        Box::new(PostgresGrammar::new()) as Box<dyn Grammar>,
        Box::new(SqliteGrammar::new()),
    ] {
        assert_eq!(
            grammar.delete_statement(&query).map(|statement| statement.sql),
            Err(CompileError::RawTableRewrite {
                dialect: grammar.name(),
                statement: "delete",
            })
        );
    }
}

#[test]
fn truncate_statement_count_per_dialect() {
    let query = QueryBuilder::table("users");
    let counts: Vec<(&str, usize)> = grammars()
        .iter()
        .map(|grammar| (grammar.name(), grammar.truncate_statements(&query).unwrap().len()))
        .collect();
    assert_eq!(
        counts,
        vec![("generic", 1), ("mysql", 1), ("postgres", 1), ("sqlite", 2)]
    );
}
