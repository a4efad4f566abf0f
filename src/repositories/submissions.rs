use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use time::PrimitiveDateTime;

use crate::db::models::{Submission, SubmissionView};

const SUBMISSION_COLUMNS: &str = "\
    id, assignment_id, student_id, submission_file, submission_text, submitted_at, \
    marks_obtained, feedback, graded_by, graded_at";

const VIEW_SELECT: &str = "\
    SELECT sub.id, sub.assignment_id, sub.student_id, sub.submission_file, sub.submission_text, \
           sub.submitted_at, sub.marks_obtained, sub.feedback, sub.graded_by, sub.graded_at, \
           s.name AS student_name, a.title AS assignment_title, \
           a.due_date AS assignment_due_date \
    FROM submissions sub \
    JOIN students s ON s.id = sub.student_id \
    JOIN assignments a ON a.id = sub.assignment_id";

pub(crate) struct CreateSubmission<'a> {
    pub(crate) id: &'a str,
    pub(crate) assignment_id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) submission_file: Option<&'a str>,
    pub(crate) submission_text: Option<&'a str>,
    pub(crate) submitted_at: PrimitiveDateTime,
}

pub(crate) struct GradeSubmission<'a> {
    pub(crate) marks_obtained: f64,
    pub(crate) feedback: Option<&'a str>,
    pub(crate) graded_by: Option<&'a str>,
    pub(crate) graded_at: PrimitiveDateTime,
}

#[derive(Debug, Default)]
pub(crate) struct SubmissionFilter<'a> {
    pub(crate) assignment_id: Option<&'a str>,
    pub(crate) student_id: Option<&'a str>,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateSubmission<'_>,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (
            id, assignment_id, student_id, submission_file, submission_text, submitted_at
         ) VALUES (?,?,?,?,?,?)
         RETURNING {SUBMISSION_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.assignment_id)
    .bind(params.student_id)
    .bind(params.submission_file)
    .bind(params.submission_text)
    .bind(params.submitted_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn grade(
    pool: &SqlitePool,
    id: &str,
    params: GradeSubmission<'_>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE submissions SET marks_obtained = ?, feedback = ?, graded_by = ?, graded_at = ?
         WHERE id = ?",
    )
    .bind(params.marks_obtained)
    .bind(params.feedback)
    .bind(params.graded_by)
    .bind(params.graded_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn pair_exists(
    pool: &SqlitePool,
    assignment_id: &str,
    student_id: &str,
) -> Result<bool, sqlx::Error> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM submissions WHERE assignment_id = ? AND student_id = ?")
            .bind(assignment_id)
            .bind(student_id)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

pub(crate) async fn find_view(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<SubmissionView>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionView>(&format!("{VIEW_SELECT} WHERE sub.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &SqlitePool,
    filter: &SubmissionFilter<'_>,
) -> Result<Vec<SubmissionView>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(VIEW_SELECT);
    builder.push(" WHERE 1 = 1");
    if let Some(assignment_id) = filter.assignment_id {
        builder.push(" AND sub.assignment_id = ");
        builder.push_bind(assignment_id.to_string());
    }
    if let Some(student_id) = filter.student_id {
        builder.push(" AND sub.student_id = ");
        builder.push_bind(student_id.to_string());
    }
    builder.push(" ORDER BY sub.submitted_at DESC");

    builder.build_query_as::<SubmissionView>().fetch_all(pool).await
}

pub(crate) async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM submissions").fetch_one(pool).await
}
