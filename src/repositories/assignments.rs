use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use time::PrimitiveDateTime;

use crate::db::models::{Assignment, AssignmentView};

const ASSIGNMENT_COLUMNS: &str = "\
    id, course_id, title, description, due_date, total_marks, attachment, created_by, \
    created_at, updated_at, is_active";

const VIEW_SELECT: &str = "\
    SELECT a.id, a.course_id, a.title, a.description, a.due_date, a.total_marks, a.attachment, \
           a.created_by, a.created_at, a.updated_at, a.is_active, c.name AS course_name \
    FROM assignments a \
    JOIN courses c ON c.id = a.course_id";

pub(crate) struct CreateAssignment<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: &'a str,
    pub(crate) due_date: PrimitiveDateTime,
    pub(crate) total_marks: i64,
    pub(crate) attachment: Option<&'a str>,
    pub(crate) created_by: Option<&'a str>,
    pub(crate) created_at: PrimitiveDateTime,
}

pub(crate) struct UpdateAssignment<'a> {
    pub(crate) title: &'a str,
    pub(crate) description: &'a str,
    pub(crate) due_date: PrimitiveDateTime,
    pub(crate) total_marks: i64,
    pub(crate) attachment: Option<&'a str>,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateAssignment<'_>,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "INSERT INTO assignments (
            id, course_id, title, description, due_date, total_marks, attachment, created_by,
            created_at, updated_at, is_active
         ) VALUES (?,?,?,?,?,?,?,?,?,?,1)
         RETURNING {ASSIGNMENT_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.due_date)
    .bind(params.total_marks)
    .bind(params.attachment)
    .bind(params.created_by)
    .bind(params.created_at)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &SqlitePool,
    id: &str,
    params: UpdateAssignment<'_>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE assignments SET
            title = ?, description = ?, due_date = ?, total_marks = ?, attachment = ?,
            updated_at = ?
         WHERE id = ?",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.due_date)
    .bind(params.total_marks)
    .bind(params.attachment)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn find_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_view(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<AssignmentView>, sqlx::Error> {
    sqlx::query_as::<_, AssignmentView>(&format!("{VIEW_SELECT} WHERE a.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_active(
    pool: &SqlitePool,
    course_id: Option<&str>,
) -> Result<Vec<AssignmentView>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(VIEW_SELECT);
    builder.push(" WHERE a.is_active = 1");
    if let Some(course_id) = course_id {
        builder.push(" AND a.course_id = ");
        builder.push_bind(course_id.to_string());
    }
    builder.push(" ORDER BY a.due_date DESC");

    builder.build_query_as::<AssignmentView>().fetch_all(pool).await
}

pub(crate) async fn set_active(
    pool: &SqlitePool,
    id: &str,
    is_active: bool,
    now: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE assignments SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(is_active)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
