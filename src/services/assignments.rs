use sqlx::SqlitePool;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::{AssignmentView, SubmissionView};
use crate::repositories;
use crate::repositories::assignments::{CreateAssignment, UpdateAssignment};
use crate::repositories::submissions::SubmissionFilter;
use crate::services::actor::Actor;
use crate::services::error::RecordError;
use crate::services::lifecycle::{Lifecycle, LifecycleKind};
use crate::services::students::optional_text;

pub(crate) const DEFAULT_TOTAL_MARKS: i64 = 100;

#[derive(Debug, Clone)]
pub(crate) struct AssignmentDraft {
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) due_date: PrimitiveDateTime,
    pub(crate) total_marks: Option<i64>,
    pub(crate) attachment: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct AssignmentPatch {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) due_date: Option<PrimitiveDateTime>,
    pub(crate) total_marks: Option<i64>,
    pub(crate) attachment: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct AssignmentDetail {
    pub(crate) assignment: AssignmentView,
    pub(crate) submissions: Vec<SubmissionView>,
}

fn validate_title(title: &str) -> Result<String, RecordError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(RecordError::validation("title", "title must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn validate_total_marks(total_marks: i64) -> Result<(), RecordError> {
    if total_marks <= 0 {
        return Err(RecordError::validation("total_marks", "total marks must be positive"));
    }
    Ok(())
}

pub(crate) async fn create(
    pool: &SqlitePool,
    actor: &Actor,
    draft: AssignmentDraft,
) -> Result<AssignmentView, RecordError> {
    let title = validate_title(&draft.title)?;
    let total_marks = draft.total_marks.unwrap_or(DEFAULT_TOTAL_MARKS);
    validate_total_marks(total_marks)?;

    if !repositories::courses::exists(pool, &draft.course_id).await? {
        return Err(RecordError::NotFound("course"));
    }

    let id = Uuid::new_v4().to_string();
    let attachment = optional_text(draft.attachment);
    repositories::assignments::create(
        pool,
        CreateAssignment {
            id: &id,
            course_id: &draft.course_id,
            title: &title,
            description: draft.description.trim(),
            due_date: draft.due_date,
            total_marks,
            attachment: attachment.as_deref(),
            created_by: actor.user_id(),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(RecordError::from_store)?;

    tracing::info!(
        actor = %actor.label(),
        assignment_id = %id,
        course_id = %draft.course_id,
        "Assignment created"
    );
    get(pool, &id).await
}

pub(crate) async fn update(
    pool: &SqlitePool,
    actor: &Actor,
    assignment_id: &str,
    patch: AssignmentPatch,
) -> Result<AssignmentView, RecordError> {
    let current = repositories::assignments::find_by_id(pool, assignment_id)
        .await?
        .ok_or(RecordError::NotFound("assignment"))?;

    let title = match patch.title {
        Some(title) => validate_title(&title)?,
        None => current.title,
    };
    let total_marks = patch.total_marks.unwrap_or(current.total_marks);
    validate_total_marks(total_marks)?;
    let description =
        patch.description.map(|value| value.trim().to_string()).unwrap_or(current.description);
    let attachment = patch.attachment.map_or(current.attachment, |v| optional_text(Some(v)));

    let updated = repositories::assignments::update(
        pool,
        assignment_id,
        UpdateAssignment {
            title: &title,
            description: &description,
            due_date: patch.due_date.unwrap_or(current.due_date),
            total_marks,
            attachment: attachment.as_deref(),
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(RecordError::from_store)?;
    if !updated {
        return Err(RecordError::NotFound("assignment"));
    }

    tracing::info!(actor = %actor.label(), assignment_id = %assignment_id, "Assignment updated");
    get(pool, assignment_id).await
}

pub(crate) async fn get(pool: &SqlitePool, assignment_id: &str) -> Result<AssignmentView, RecordError> {
    repositories::assignments::find_view(pool, assignment_id)
        .await?
        .ok_or(RecordError::NotFound("assignment"))
}

pub(crate) async fn detail(
    pool: &SqlitePool,
    assignment_id: &str,
) -> Result<AssignmentDetail, RecordError> {
    let assignment = get(pool, assignment_id).await?;
    let submissions = repositories::submissions::list(
        pool,
        &SubmissionFilter { assignment_id: Some(assignment_id), ..Default::default() },
    )
    .await?;
    Ok(AssignmentDetail { assignment, submissions })
}

pub(crate) async fn list(
    pool: &SqlitePool,
    course_id: Option<&str>,
) -> Result<Vec<AssignmentView>, RecordError> {
    Ok(repositories::assignments::list_active(pool, course_id).await?)
}

pub(crate) async fn transition(
    pool: &SqlitePool,
    actor: &Actor,
    assignment_id: &str,
    target: Lifecycle,
) -> Result<(), RecordError> {
    LifecycleKind::Assignment.ensure(target)?;

    let changed = repositories::assignments::set_active(
        pool,
        assignment_id,
        target == Lifecycle::Active,
        primitive_now_utc(),
    )
    .await?;
    if !changed {
        return Err(RecordError::NotFound("assignment"));
    }

    tracing::info!(
        actor = %actor.label(),
        assignment_id = %assignment_id,
        lifecycle = target.as_str(),
        "Assignment lifecycle changed"
    );
    Ok(())
}
