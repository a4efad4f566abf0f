use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

fn database_url() -> String {
    dotenvy::dotenv().ok();

    std::env::var("SCHOOL_SMOKE_DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| "sqlite::memory:".to_string())
}

#[tokio::test]
async fn migrations_apply_and_tables_exist() -> anyhow::Result<()> {
    let options = SqliteConnectOptions::from_str(&database_url())?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().max_connections(1).connect_with(options).await?;

    let migrations_dir =
        std::env::var("SCHOOL_MIGRATIONS_DIR").unwrap_or_else(|_| "migrations".to_string());
    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new(&migrations_dir)).await?;
    migrator.run(&pool).await?;

    let tables = [
        "users",
        "students",
        "courses",
        "enrollments",
        "attendance",
        "assignments",
        "submissions",
        "notifications",
        "announcements",
    ];

    for table in tables {
        let found: Option<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(table)
                .fetch_optional(&pool)
                .await?;
        assert!(found.is_some(), "expected table {table} to exist after migrations");
    }

    let index: Option<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'index' AND name = 'uq_attendance_key'",
    )
    .fetch_optional(&pool)
    .await?;
    assert!(index.is_some(), "attendance key index should exist");

    Ok(())
}
