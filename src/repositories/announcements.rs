use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use time::PrimitiveDateTime;

use crate::db::models::Announcement;

const ANNOUNCEMENT_COLUMNS: &str =
    "id, title, content, created_by, target_class, is_active, priority, created_at, expires_at";

pub(crate) struct AnnouncementValues<'a> {
    pub(crate) title: &'a str,
    pub(crate) content: &'a str,
    pub(crate) target_class: Option<&'a str>,
    pub(crate) priority: i64,
    pub(crate) expires_at: Option<PrimitiveDateTime>,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    id: &str,
    values: &AnnouncementValues<'_>,
    created_by: Option<&str>,
    created_at: PrimitiveDateTime,
) -> Result<Announcement, sqlx::Error> {
    sqlx::query_as::<_, Announcement>(&format!(
        "INSERT INTO announcements (
            id, title, content, created_by, target_class, is_active, priority, created_at,
            expires_at
         ) VALUES (?,?,?,?,?,1,?,?,?)
         RETURNING {ANNOUNCEMENT_COLUMNS}",
    ))
    .bind(id)
    .bind(values.title)
    .bind(values.content)
    .bind(created_by)
    .bind(values.target_class)
    .bind(values.priority)
    .bind(created_at)
    .bind(values.expires_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &SqlitePool,
    id: &str,
    values: &AnnouncementValues<'_>,
) -> Result<Option<Announcement>, sqlx::Error> {
    sqlx::query_as::<_, Announcement>(&format!(
        "UPDATE announcements SET
            title = ?, content = ?, target_class = ?, priority = ?, expires_at = ?
         WHERE id = ?
         RETURNING {ANNOUNCEMENT_COLUMNS}",
    ))
    .bind(values.title)
    .bind(values.content)
    .bind(values.target_class)
    .bind(values.priority)
    .bind(values.expires_at)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<Announcement>, sqlx::Error> {
    sqlx::query_as::<_, Announcement>(&format!(
        "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Active announcements, highest priority then newest first. With a
/// `target_class`, only that class's and the global ones are returned.
pub(crate) async fn list_active(
    pool: &SqlitePool,
    target_class: Option<&str>,
) -> Result<Vec<Announcement>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements WHERE is_active = 1"
    ));
    if let Some(target_class) = target_class {
        builder.push(" AND (target_class IS NULL OR target_class = ");
        builder.push_bind(target_class.to_string());
        builder.push(")");
    }
    builder.push(" ORDER BY priority DESC, created_at DESC");

    builder.build_query_as::<Announcement>().fetch_all(pool).await
}

pub(crate) async fn set_active(
    pool: &SqlitePool,
    id: &str,
    is_active: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE announcements SET is_active = ? WHERE id = ?")
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
