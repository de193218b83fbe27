//! Example demonstrating sqlchain's statement builders.
//!
//! Run with:
//!   cargo run --example sql_builder -p sqlchain

use sqlchain::prelude::*;

#[derive(Debug)]
struct Filters {
    status: Option<String>,
    search: Option<String>,
    roles_any_of: Vec<String>,
    page: i64,
    per_page: i64,
}

fn build_list_users(filters: &Filters) -> sqlchain::SelectQb {
    let mut qb = select(["u.id", "u.name", "u.status"]).from(alias("u", "users"));

    if let Some(status) = &filters.status {
        qb = qb.eq("u.status", status.as_str());
    }
    if let Some(search) = &filters.search {
        qb = qb.like("u.name", format!("%{search}%"));
    }
    if !filters.roles_any_of.is_empty() {
        let roles = select(["r.id"])
            .from(alias("r", "roles"))
            .in_list("r.name", filters.roles_any_of.clone());
        qb = qb.in_list("u.role_id", roles);
    }

    qb.order_by("u.id DESC").paginate(filters.page, filters.per_page)
}

fn main() -> QbResult<()> {
    let filters = Filters {
        status: Some("active".to_string()),
        search: Some("ali".to_string()),
        roles_any_of: vec!["admin".to_string(), "owner".to_string()],
        page: 2,
        per_page: 20,
    };

    let qb = build_list_users(&filters);
    println!("inline:\n  {}", qb.to_sql()?);

    let built = qb.numbered().build()?;
    println!("numbered:\n  {}\n  params = {}", built.sql, serde_json::to_string(&built.params).unwrap_or_default());

    let insert = insert_into("users")
        .fields(["name", "status"])
        .values([row!["alice", "active"], row!["bob", Value::Null]])
        .returning(["id"])
        .parameterized()
        .build()?;
    println!("insert:\n  {}\n  params = {:?}", insert.sql, insert.params);

    let update = update("users")
        .set("status", "inactive")
        .set_raw("updated_at", "NOW()")
        .lt("last_login", Value::parse_date("2024-01-01")?)
        .to_sql()?;
    println!("update:\n  {update}");

    if let Err(err) = select(["id"]).build() {
        println!("error:\n  {err}");
    }

    Ok(())
}
