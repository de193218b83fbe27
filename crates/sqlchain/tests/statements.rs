//! Golden-output tests for the four statement kinds.

use sqlchain::prelude::*;
use sqlchain::{JoinKind, Predicate};

#[test]
fn select_with_single_predicate() {
    let sql = select(["id"])
        .from("users")
        .and_where("active", "=", 1)
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT id FROM users WHERE (active = 1)");
}

#[test]
fn select_with_or_predicate() {
    let sql = select(["id"])
        .from("users")
        .and_where("a", "=", 1)
        .or_where("b", "=", 2)
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT id FROM users WHERE (a = 1) OR (b = 2)");
}

#[test]
fn select_with_in_subquery() {
    let sql = select(["id"])
        .from("users")
        .and_where("role_id", "IN", select(["id"]).from("roles"))
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT id FROM users WHERE role_id IN (SELECT id FROM roles)");
}

#[test]
fn insert_positional_rows() {
    let sql = insert()
        .into("users")
        .fields(["id", "name"])
        .values([row![1, "a"], row![2, "b"]])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "INSERT INTO users (id,name) VALUES (1,'a'),(2,'b')");
}

#[test]
fn select_without_table_fails() {
    let err = select(["id"]).build().unwrap_err();
    assert!(err.is_invalid_table_name());
    assert_eq!(err, QbError::invalid_table_name("SELECT requires at least one table"));
}

#[test]
fn alias_rule() {
    let sql = select([alias("n", "name")])
        .from(alias("u", "users"))
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT name AS n FROM users AS u");

    let sql = select_from(alias("x", select(["id"]).from("t")))
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM (SELECT id FROM t) AS x");
}

#[test]
fn between_arity_is_checked() {
    let err = select_from("t")
        .and_where("a", "BETWEEN", vec![1, 2, 3])
        .to_sql()
        .unwrap_err();
    assert!(err.is_invalid_value());

    let sql = select_from("t")
        .and_where("a", "NOT BETWEEN", vec![1, 2])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT * FROM t WHERE a NOT BETWEEN 1 AND 2");
}

#[test]
fn missing_operand_fails() {
    let err = select_from("t")
        .and_where_op("a", ">")
        .to_sql()
        .unwrap_err();
    assert!(err.is_invalid_value());
}

#[test]
fn failed_render_returns_no_sql() {
    let qb = select_from("t").eq("a", 1).limit(-3).parameterized();
    assert!(qb.build().unwrap_err().is_invalid_limit());
    assert!(qb.render().is_err());
}

#[test]
fn join_kinds() {
    let qb = select_from(alias("a", "accounts"))
        .join_inner("b", "b.id = a.b_id")
        .join_right("c", "c.id = a.c_id")
        .join_outer("d", "d.id = a.d_id")
        .join_full("e", "e.id = a.e_id")
        .join_with(JoinKind::Left, "f", Predicate::new("f.id", "=", "a.f_id").raw());
    assert_eq!(
        qb.to_sql().unwrap(),
        "SELECT * FROM accounts AS a INNER JOIN b ON b.id = a.b_id \
         RIGHT JOIN c ON c.id = a.c_id OUTER JOIN d ON d.id = a.d_id \
         FULL OUTER JOIN e ON e.id = a.e_id LEFT JOIN f ON ((f.id = a.f_id))"
    );
}

#[test]
fn update_and_delete() {
    let sql = update("users")
        .set("status", "inactive")
        .set("note", "it's done")
        .eq("id", 7)
        .returning(["id"])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE users SET status = 'inactive', note = 'it''s done' WHERE (id = 7) RETURNING id"
    );

    let sql = delete_from("users")
        .not_in("id", vec![1, 2])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "DELETE FROM users WHERE id NOT IN (1, 2)");
}

#[test]
fn convenience_filters() {
    let sql = select_from("t")
        .ne("a", 1)
        .lte("b", 2)
        .not_like("c", "x%")
        .not_between("d", 1.5, 2.5)
        .and_where("e", "<>", None::<i32>)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM t WHERE (a != 1) AND (b <= 2) AND c NOT LIKE 'x%' \
         AND d NOT BETWEEN 1.5 AND 2.5 AND (e <> NULL)"
    );
}
