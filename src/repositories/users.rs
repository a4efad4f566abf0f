use sqlx::SqlitePool;

use crate::db::models::User;

const COLUMNS: &str = "id, username, full_name, email, is_staff, created_at";

pub(crate) struct CreateUser<'a> {
    pub(crate) id: &'a str,
    pub(crate) username: &'a str,
    pub(crate) full_name: &'a str,
    pub(crate) email: Option<&'a str>,
    pub(crate) is_staff: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = ?"))
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn create(pool: &SqlitePool, params: CreateUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, username, full_name, email, is_staff, created_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.username)
    .bind(params.full_name)
    .bind(params.email)
    .bind(params.is_staff)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn set_staff(pool: &SqlitePool, id: &str, is_staff: bool) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET is_staff = ? WHERE id = ?")
        .bind(is_staff)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
