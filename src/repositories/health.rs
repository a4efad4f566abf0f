use sqlx::SqlitePool;

pub(crate) async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

pub(crate) async fn foreign_keys_enabled(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys").fetch_one(pool).await?;
    Ok(enabled == 1)
}
