use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use time::Date;

use crate::db::models::{Enrollment, EnrollmentView};

const ENROLLMENT_COLUMNS: &str =
    "id, student_id, course_id, enrollment_date, is_active, final_grade, final_marks";

const VIEW_SELECT: &str = "\
    SELECT e.id, e.student_id, e.course_id, e.enrollment_date, e.is_active, e.final_grade, \
           e.final_marks, s.name AS student_name, c.name AS course_name, c.code AS course_code \
    FROM enrollments e \
    JOIN students s ON s.id = e.student_id \
    JOIN courses c ON c.id = e.course_id";

pub(crate) struct CreateEnrollment<'a> {
    pub(crate) id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) enrollment_date: Date,
    pub(crate) is_active: bool,
    pub(crate) final_grade: Option<&'a str>,
    pub(crate) final_marks: Option<f64>,
}

pub(crate) struct UpdateEnrollment<'a> {
    pub(crate) is_active: bool,
    pub(crate) final_grade: Option<&'a str>,
    pub(crate) final_marks: Option<f64>,
}

#[derive(Debug, Default)]
pub(crate) struct EnrollmentFilter<'a> {
    pub(crate) student_id: Option<&'a str>,
    pub(crate) course_id: Option<&'a str>,
    pub(crate) is_active: Option<bool>,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateEnrollment<'_>,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "INSERT INTO enrollments (
            id, student_id, course_id, enrollment_date, is_active, final_grade, final_marks
         ) VALUES (?,?,?,?,?,?,?)
         RETURNING {ENROLLMENT_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.student_id)
    .bind(params.course_id)
    .bind(params.enrollment_date)
    .bind(params.is_active)
    .bind(params.final_grade)
    .bind(params.final_marks)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &SqlitePool,
    id: &str,
    params: UpdateEnrollment<'_>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE enrollments SET is_active = ?, final_grade = ?, final_marks = ? WHERE id = ?",
    )
    .bind(params.is_active)
    .bind(params.final_grade)
    .bind(params.final_marks)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn find_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_view(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<EnrollmentView>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentView>(&format!("{VIEW_SELECT} WHERE e.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn pair_exists(
    pool: &SqlitePool,
    student_id: &str,
    course_id: &str,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM enrollments WHERE student_id = ? AND course_id = ?")
            .bind(student_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

pub(crate) async fn list(
    pool: &SqlitePool,
    filter: &EnrollmentFilter<'_>,
) -> Result<Vec<EnrollmentView>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(VIEW_SELECT);
    builder.push(" WHERE 1 = 1");

    if let Some(student_id) = filter.student_id {
        builder.push(" AND e.student_id = ");
        builder.push_bind(student_id.to_string());
    }
    if let Some(course_id) = filter.course_id {
        builder.push(" AND e.course_id = ");
        builder.push_bind(course_id.to_string());
    }
    if let Some(is_active) = filter.is_active {
        builder.push(" AND e.is_active = ");
        builder.push_bind(is_active);
    }
    builder.push(" ORDER BY e.enrollment_date DESC, c.code ASC");

    builder.build_query_as::<EnrollmentView>().fetch_all(pool).await
}

/// Ids of students actively enrolled in `course_id`.
pub(crate) async fn active_student_ids(
    executor: impl sqlx::SqliteExecutor<'_>,
    course_id: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT student_id FROM enrollments WHERE course_id = ? AND is_active = 1")
        .bind(course_id)
        .fetch_all(executor)
        .await
}

pub(crate) async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM enrollments WHERE id = ?").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
