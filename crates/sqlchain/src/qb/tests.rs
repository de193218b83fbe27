//! Cross-module tests for the qb module.

use crate::config::{PlaceholderStyle, RenderConfig, RenderMode};
use crate::qb::param::marker_offsets;
use crate::qb::{
    Expression, JoinQb, Predicate, SqlQb, Value, WhereQb, alias, delete, insert, select,
    select_from, update,
};
use crate::row;
use chrono::{TimeZone, Utc};

#[test]
fn test_select_where() {
    let sql = select(["id"])
        .from("users")
        .and_where("active", "=", 1)
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT id FROM users WHERE (active = 1)");
}

#[test]
fn test_select_or_where() {
    let sql = select(["id"])
        .from("users")
        .and_where("a", "=", 1)
        .or_where("b", "=", 2)
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT id FROM users WHERE (a = 1) OR (b = 2)");
}

#[test]
fn test_in_sub_statement() {
    let sql = select(["id"])
        .from("users")
        .and_where("role_id", "IN", select(["id"]).from("roles"))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT id FROM users WHERE role_id IN (SELECT id FROM roles)"
    );
}

#[test]
fn test_insert_rows() {
    let sql = insert()
        .into("users")
        .fields(["id", "name"])
        .values([row![1, "a"], row![2, "b"]])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "INSERT INTO users (id,name) VALUES (1,'a'),(2,'b')");
}

#[test]
fn test_missing_table() {
    let err = select(["id"]).build().unwrap_err();
    assert!(err.is_invalid_table_name());
}

#[test]
fn test_first_joiner_suppressed_everywhere() {
    let qb = select_from("t")
        .or_where("a", "=", 1)
        .and_where("b", "=", 2)
        .group_by("a")
        .or_having("count(*)", ">", 1)
        .having("sum(b)", "<", 9);
    assert_eq!(
        qb.to_sql().unwrap(),
        "SELECT * FROM t WHERE (a = 1) AND (b = 2) GROUP BY a HAVING (count(*) > 1) AND (sum(b) < 9)"
    );
}

#[test]
fn test_nested_parameter_alignment() {
    let inner = select(["id"])
        .from("roles")
        .eq("name", "admin")
        .gt("level", 2);
    let derived = select(["*"]).from("permissions").eq("scope", "global");
    let qb = select(["u.id"])
        .column(alias("n", Expression::with_params("coalesce(u.nick, ?)", ["anon"])))
        .from(alias("u", "users"))
        .from(alias("p", derived))
        .join_left(
            alias("c", "companies"),
            [
                Predicate::new("c.id", "=", "u.company_id").raw(),
                Predicate::new("c.kind", "=", "TENANT"),
            ],
        )
        .eq("u.active", true)
        .in_list("u.role_id", inner)
        .between("u.age", 18, 65)
        .parameterized();

    let (sql, params) = qb.render().unwrap();
    assert_eq!(
        sql,
        "SELECT u.id, coalesce(u.nick, ?) AS n FROM users AS u, \
         (SELECT * FROM permissions WHERE (scope = ?)) AS p \
         LEFT JOIN companies AS c ON ((c.id = u.company_id) AND (c.kind = ?)) \
         WHERE (u.active = ?) AND u.role_id IN (SELECT id FROM roles WHERE (name = ?) AND (level > ?)) \
         AND u.age BETWEEN ? AND ?"
    );
    assert_eq!(
        params,
        vec![
            Value::from("anon"),
            Value::from("global"),
            Value::from("TENANT"),
            Value::Bool(true),
            Value::from("admin"),
            Value::Int(2),
            Value::Int(18),
            Value::Int(65),
        ]
    );
    assert_eq!(marker_offsets(&sql).len(), params.len());
}

#[test]
fn test_sub_statement_follows_outer_mode() {
    let inner = select(["id"]).from("roles").eq("name", "admin").inline();
    let outer = select(["id"]).from("users").in_list("role_id", inner.clone());

    let (sql, params) = outer.clone().parameterized().render().unwrap();
    assert_eq!(
        sql,
        "SELECT id FROM users WHERE role_id IN (SELECT id FROM roles WHERE (name = ?))"
    );
    assert_eq!(params, vec![Value::from("admin")]);

    assert_eq!(
        outer.to_sql().unwrap(),
        "SELECT id FROM users WHERE role_id IN (SELECT id FROM roles WHERE (name = 'admin'))"
    );
    // The inner builder is only referenced, never changed.
    assert_eq!(
        inner.to_sql().unwrap(),
        "SELECT id FROM roles WHERE (name = 'admin')"
    );
}

#[test]
fn test_render_is_idempotent() {
    let qb = select(["id"])
        .from("users")
        .eq("a", 1)
        .in_list("b", select(["x"]).from("y").eq("z", 2))
        .parameterized();
    let first = qb.render().unwrap();
    let second = qb.render().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.1.len(), 2);
}

#[test]
fn test_numbered_placeholders_across_statements() {
    let built = update("users")
        .set("name", "bob")
        .set("note", "why?")
        .where_expr(Expression::with_params("id = ? OR legacy_id = ?", [1, 2]))
        .numbered()
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "UPDATE users SET name = $1, note = $2 WHERE (id = $3 OR legacy_id = $4)"
    );
    assert_eq!(built.params.len(), 4);
}

#[test]
fn test_numbered_skips_quoted_markers() {
    let built = select_from("docs")
        .and_where_raw("title", "=", "'what?'")
        .eq("id", 5)
        .numbered()
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "SELECT * FROM docs WHERE (title = 'what?') AND (id = $1)"
    );
}

#[test]
fn test_placeholder_mismatch_is_rejected() {
    let qb = select_from("docs").where_expr(Expression::with_params("id = ?", [1, 2]));
    assert!(qb.clone().parameterized().build().unwrap_err().is_invalid_value());
    assert!(qb.to_sql().unwrap_err().is_invalid_value());
}

#[test]
fn test_unbound_question_mark_in_expression() {
    let built = select_from("docs")
        .where_expr(Expression::new("data ? 'key'"))
        .eq("id", 4)
        .numbered()
        .build()
        .unwrap();
    assert_eq!(built.sql, "SELECT * FROM docs WHERE (data ? 'key') AND (id = $1)");
    assert_eq!(built.params, vec![Value::Int(4)]);
}

#[test]
fn test_inline_build_has_no_params() {
    let built = select(["id"])
        .column(alias("n", Expression::with_params("coalesce(nick, ?)", ["anon"])))
        .from("users")
        .where_expr(Expression::with_params("a = ? OR b = ?", [1, 2]))
        .build()
        .unwrap();
    assert_eq!(
        built.sql,
        "SELECT id, coalesce(nick, 'anon') AS n FROM users WHERE (a = 1 OR b = 2)"
    );
    assert!(built.params.is_empty());
}

#[test]
fn test_with_config() {
    let cfg = RenderConfig::new()
        .with_mode(RenderMode::Parameterized)
        .with_placeholder(PlaceholderStyle::Numbered);
    let built = delete()
        .from("users")
        .eq("id", 3)
        .with_config(cfg)
        .build()
        .unwrap();
    assert_eq!(built.sql, "DELETE FROM users WHERE (id = $1)");
    assert_eq!(built.params, vec![Value::Int(3)]);
}

#[test]
fn test_splice_predicate_in_select() {
    let active = select(["1"]).from("sessions").eq("sessions.user_id", 9);
    let sql = select(["id"])
        .from("users")
        .where_splice("EXISTS ({{?}})", active)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT id FROM users WHERE (EXISTS (SELECT 1 FROM sessions WHERE (sessions.user_id = 9)))"
    );
}

#[test]
fn test_full_select() {
    let removed = select(["*"])
        .from(alias("p", "permissions"))
        .and_where("p.removed_at", "IS", "null");
    let roles = select(["r.role_id"])
        .from(alias("r", "roles"))
        .is_null("r.removed_at");
    let qb = select(["r.role_id"])
        .column(alias("num", "count(*)"))
        .from(alias("u", "users"))
        .from(alias("ur", "user_roles"))
        .from(alias("up", removed))
        .join(alias("con", "contacts"), "con.contact_id = u.contact_id")
        .and_where_raw("u.user_id", "=", "ur.user_id")
        .and_where_raw("u.user_id", "=", "up.user_id")
        .or_where("u.role_id", "IN", roles)
        .is_not_null("u.username")
        .like("u.username", "%admin%")
        .between(
            "u.created_at",
            Utc.with_ymd_and_hms(2021, 1, 1, 5, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2022, 1, 9, 5, 0, 0).unwrap(),
        )
        .order(["u.user_id"])
        .group(["r.role_id"])
        .having("count(*)", ">=", 1)
        .explain();

    assert_eq!(
        qb.to_sql().unwrap(),
        "EXPLAIN SELECT r.role_id, count(*) AS num FROM users AS u, user_roles AS ur, \
         (SELECT * FROM permissions AS p WHERE (p.removed_at IS NULL)) AS up \
         INNER JOIN contacts AS con ON con.contact_id = u.contact_id \
         WHERE (u.user_id = ur.user_id) AND (u.user_id = up.user_id) \
         OR u.role_id IN (SELECT r.role_id FROM roles AS r WHERE r.removed_at IS NULL) \
         AND u.username IS NOT NULL AND u.username LIKE '%admin%' \
         AND u.created_at BETWEEN '2021-01-01T05:00:00.000Z' AND '2022-01-09T05:00:00.000Z' \
         GROUP BY r.role_id HAVING (count(*) >= 1) ORDER BY u.user_id"
    );
}
