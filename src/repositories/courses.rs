use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use time::PrimitiveDateTime;

use crate::db::models::{Course, Student};
use crate::repositories::students::qualified_columns;

const COURSE_COLUMNS: &str = "\
    id, code, name, description, credits, teacher_id, semester, academic_year, is_active, \
    created_at, updated_at";

pub(crate) struct CourseValues<'a> {
    pub(crate) code: &'a str,
    pub(crate) name: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) credits: i64,
    pub(crate) teacher_id: Option<&'a str>,
    pub(crate) semester: Option<&'a str>,
    pub(crate) academic_year: Option<&'a str>,
    pub(crate) is_active: bool,
}

#[derive(Debug, Default)]
pub(crate) struct CourseFilter<'a> {
    pub(crate) search: Option<&'a str>,
    pub(crate) semester: Option<&'a str>,
    pub(crate) academic_year: Option<&'a str>,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    id: &str,
    values: &CourseValues<'_>,
    now: PrimitiveDateTime,
) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (
            id, code, name, description, credits, teacher_id, semester, academic_year,
            is_active, created_at, updated_at
         ) VALUES (?,?,?,?,?,?,?,?,?,?,?)
         RETURNING {COURSE_COLUMNS}",
    ))
    .bind(id)
    .bind(values.code)
    .bind(values.name)
    .bind(values.description)
    .bind(values.credits)
    .bind(values.teacher_id)
    .bind(values.semester)
    .bind(values.academic_year)
    .bind(values.is_active)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &SqlitePool,
    id: &str,
    values: &CourseValues<'_>,
    now: PrimitiveDateTime,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "UPDATE courses SET
            code = ?, name = ?, description = ?, credits = ?, teacher_id = ?, semester = ?,
            academic_year = ?, is_active = ?, updated_at = ?
         WHERE id = ?
         RETURNING {COURSE_COLUMNS}",
    ))
    .bind(values.code)
    .bind(values.name)
    .bind(values.description)
    .bind(values.credits)
    .bind(values.teacher_id)
    .bind(values.semester)
    .bind(values.academic_year)
    .bind(values.is_active)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM courses WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn code_owner(
    pool: &SqlitePool,
    code: &str,
    excluding: Option<&str>,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM courses WHERE code = ? AND id IS NOT ? LIMIT 1")
        .bind(code)
        .bind(excluding)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_active(
    pool: &SqlitePool,
    filter: &CourseFilter<'_>,
) -> Result<Vec<Course>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE is_active = 1"
    ));

    if let Some(search) = filter.search.map(str::trim).filter(|value| !value.is_empty()) {
        let pattern = super::contains_pattern(search);
        builder.push(" AND (code LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" ESCAPE '\\' OR name LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" ESCAPE '\\' OR description LIKE ");
        builder.push_bind(pattern);
        builder.push(" ESCAPE '\\')");
    }
    if let Some(semester) = filter.semester {
        builder.push(" AND semester = ");
        builder.push_bind(semester.to_string());
    }
    if let Some(academic_year) = filter.academic_year {
        builder.push(" AND academic_year = ");
        builder.push_bind(academic_year.to_string());
    }
    builder.push(" ORDER BY code ASC");

    builder.build_query_as::<Course>().fetch_all(pool).await
}

pub(crate) async fn set_active(
    pool: &SqlitePool,
    id: &str,
    is_active: bool,
    now: PrimitiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE courses SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(is_active)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Hard delete; enrollments, attendance, assignments and their submissions
/// go with it through the foreign keys.
pub(crate) async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn count_active_enrollments(
    pool: &SqlitePool,
    course_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE course_id = ? AND is_active = 1")
        .bind(course_id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn list_enrolled_students(
    pool: &SqlitePool,
    course_id: &str,
) -> Result<Vec<Student>, sqlx::Error> {
    let columns = qualified_columns("s");
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {columns} FROM students s
         JOIN enrollments e ON e.student_id = s.id
         WHERE e.course_id = ? AND e.is_active = 1
         ORDER BY s.name ASC, s.roll_number ASC"
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}
