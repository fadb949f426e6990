use sqlx::Row;

fn database_url() -> String {
    dotenvy::dotenv().ok();

    if let Ok(url) = std::env::var("DATABASE_URL") {
        if !url.trim().is_empty() {
            return url;
        }
    }

    let server = std::env::var("POSTGRES_SERVER").unwrap_or_else(|_| "localhost".into());
    let port = std::env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".into());
    let user = std::env::var("POSTGRES_USER").unwrap_or_else(|_| "evaluations".into());
    let password = std::env::var("POSTGRES_PASSWORD").unwrap_or_default();
    let db = std::env::var("POSTGRES_DB").unwrap_or_else(|_| "evaluations_db".into());

    format!("postgresql://{user}:{password}@{server}:{port}/{db}")
}

// Needs a reachable Postgres; run with `cargo test -- --ignored`.
#[tokio::test]
#[ignore]
async fn migrations_apply_and_tables_exist() -> anyhow::Result<()> {
    let pool =
        sqlx::postgres::PgPoolOptions::new().max_connections(1).connect(&database_url()).await?;

    let migrations_dir =
        std::env::var("EVAL_MIGRATIONS_DIR").unwrap_or_else(|_| "migrations".to_string());
    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new(&migrations_dir)).await?;
    migrator.run(&pool).await?;

    let tables = [
        "users",
        "eval_groups",
        "group_permissions",
        "templates",
        "items",
        "evaluations",
        "assign_groups",
        "assign_hierarchy",
        "responses",
        "answers",
    ];

    for table in tables {
        let row = sqlx::query("SELECT to_regclass($1)::text").bind(table).fetch_one(&pool).await?;
        let regclass: Option<String> = row.try_get(0)?;
        assert!(regclass.is_some(), "expected table {table} to exist after migrations");
    }

    let states: Vec<String> =
        sqlx::query_scalar("SELECT unnest(enum_range(NULL::evaluationstate))::text")
            .fetch_all(&pool)
            .await?;
    assert_eq!(states, ["in_queue", "active", "due", "closed", "viewable"]);

    Ok(())
}
