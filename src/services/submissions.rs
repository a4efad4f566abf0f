use sqlx::SqlitePool;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::SubmissionView;
use crate::repositories;
use crate::repositories::submissions::{CreateSubmission, GradeSubmission, SubmissionFilter};
use crate::services::actor::Actor;
use crate::services::error::RecordError;
use crate::services::students::optional_text;

#[derive(Debug, Clone, Default)]
pub(crate) struct SubmissionDraft {
    pub(crate) assignment_id: String,
    pub(crate) student_id: String,
    pub(crate) submission_text: Option<String>,
    pub(crate) submission_file: Option<String>,
    pub(crate) submitted_at: Option<PrimitiveDateTime>,
}

#[derive(Debug, Clone)]
pub(crate) struct GradeInput {
    pub(crate) marks_obtained: f64,
    pub(crate) feedback: Option<String>,
}

/// Strict create: a student submits each assignment at most once.
pub(crate) async fn create(
    pool: &SqlitePool,
    actor: &Actor,
    draft: SubmissionDraft,
) -> Result<SubmissionView, RecordError> {
    if repositories::assignments::find_by_id(pool, &draft.assignment_id).await?.is_none() {
        return Err(RecordError::NotFound("assignment"));
    }
    if !repositories::students::exists(pool, &draft.student_id).await? {
        return Err(RecordError::NotFound("student"));
    }
    if repositories::submissions::pair_exists(pool, &draft.assignment_id, &draft.student_id)
        .await?
    {
        return Err(RecordError::conflict(
            "student_id",
            "this student has already submitted this assignment",
        ));
    }

    let id = Uuid::new_v4().to_string();
    let submission_text = optional_text(draft.submission_text);
    let submission_file = optional_text(draft.submission_file);
    repositories::submissions::create(
        pool,
        CreateSubmission {
            id: &id,
            assignment_id: &draft.assignment_id,
            student_id: &draft.student_id,
            submission_file: submission_file.as_deref(),
            submission_text: submission_text.as_deref(),
            submitted_at: draft.submitted_at.unwrap_or_else(primitive_now_utc),
        },
    )
    .await
    .map_err(RecordError::from_store)?;

    tracing::info!(
        actor = %actor.label(),
        submission_id = %id,
        assignment_id = %draft.assignment_id,
        student_id = %draft.student_id,
        "Submission created"
    );
    get(pool, &id).await
}

pub(crate) async fn grade(
    pool: &SqlitePool,
    actor: &Actor,
    submission_id: &str,
    input: GradeInput,
) -> Result<SubmissionView, RecordError> {
    if !input.marks_obtained.is_finite() || input.marks_obtained < 0.0 {
        return Err(RecordError::validation("marks_obtained", "marks must not be negative"));
    }

    let feedback = optional_text(input.feedback);
    let graded = repositories::submissions::grade(
        pool,
        submission_id,
        GradeSubmission {
            marks_obtained: input.marks_obtained,
            feedback: feedback.as_deref(),
            graded_by: actor.user_id(),
            graded_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(RecordError::from_store)?;
    if !graded {
        return Err(RecordError::NotFound("submission"));
    }

    tracing::info!(
        actor = %actor.label(),
        submission_id = %submission_id,
        marks_obtained = input.marks_obtained,
        "Submission graded"
    );
    get(pool, submission_id).await
}

pub(crate) async fn get(pool: &SqlitePool, submission_id: &str) -> Result<SubmissionView, RecordError> {
    repositories::submissions::find_view(pool, submission_id)
        .await?
        .ok_or(RecordError::NotFound("submission"))
}

pub(crate) async fn list(
    pool: &SqlitePool,
    filter: &SubmissionFilter<'_>,
) -> Result<Vec<SubmissionView>, RecordError> {
    Ok(repositories::submissions::list(pool, filter).await?)
}
