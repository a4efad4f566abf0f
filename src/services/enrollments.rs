use sqlx::SqlitePool;
use time::Date;
use uuid::Uuid;

use crate::core::time::today_utc;
use crate::db::models::EnrollmentView;
use crate::repositories;
use crate::repositories::enrollments::{CreateEnrollment, EnrollmentFilter, UpdateEnrollment};
use crate::services::actor::Actor;
use crate::services::error::RecordError;
use crate::services::students::optional_text;

#[derive(Debug, Clone, Default)]
pub(crate) struct EnrollmentDraft {
    pub(crate) student_id: String,
    pub(crate) course_id: String,
    pub(crate) enrollment_date: Option<Date>,
    pub(crate) final_grade: Option<String>,
    pub(crate) final_marks: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct EnrollmentPatch {
    pub(crate) is_active: Option<bool>,
    pub(crate) final_grade: Option<String>,
    pub(crate) final_marks: Option<f64>,
}

fn validate_final_marks(final_marks: Option<f64>) -> Result<(), RecordError> {
    match final_marks {
        Some(marks) if !marks.is_finite() || !(0.0..=100.0).contains(&marks) => Err(
            RecordError::validation("final_marks", "final marks must be between 0 and 100"),
        ),
        _ => Ok(()),
    }
}

fn validate_final_grade(final_grade: Option<&str>) -> Result<(), RecordError> {
    match final_grade {
        Some(grade) if grade.chars().count() > 2 => Err(RecordError::validation(
            "final_grade",
            "final grade must be at most 2 characters",
        )),
        _ => Ok(()),
    }
}

/// Strict create: any existing row for the pair, active or not, is a conflict.
pub(crate) async fn create(
    pool: &SqlitePool,
    actor: &Actor,
    draft: EnrollmentDraft,
) -> Result<EnrollmentView, RecordError> {
    let final_grade = optional_text(draft.final_grade);
    validate_final_grade(final_grade.as_deref())?;
    validate_final_marks(draft.final_marks)?;

    if !repositories::students::exists(pool, &draft.student_id).await? {
        return Err(RecordError::NotFound("student"));
    }
    if !repositories::courses::exists(pool, &draft.course_id).await? {
        return Err(RecordError::NotFound("course"));
    }
    if repositories::enrollments::pair_exists(pool, &draft.student_id, &draft.course_id).await? {
        return Err(RecordError::conflict(
            "course_id",
            "student is already enrolled in this course",
        ));
    }

    let id = Uuid::new_v4().to_string();
    repositories::enrollments::create(
        pool,
        CreateEnrollment {
            id: &id,
            student_id: &draft.student_id,
            course_id: &draft.course_id,
            enrollment_date: draft.enrollment_date.unwrap_or_else(today_utc),
            is_active: true,
            final_grade: final_grade.as_deref(),
            final_marks: draft.final_marks,
        },
    )
    .await
    .map_err(RecordError::from_store)?;

    tracing::info!(
        actor = %actor.label(),
        enrollment_id = %id,
        student_id = %draft.student_id,
        course_id = %draft.course_id,
        "Enrollment created"
    );

    get(pool, &id).await
}

pub(crate) async fn update(
    pool: &SqlitePool,
    actor: &Actor,
    enrollment_id: &str,
    patch: EnrollmentPatch,
) -> Result<EnrollmentView, RecordError> {
    let current = repositories::enrollments::find_by_id(pool, enrollment_id)
        .await?
        .ok_or(RecordError::NotFound("enrollment"))?;

    let final_grade = patch.final_grade.map_or(current.final_grade, |v| optional_text(Some(v)));
    let final_marks = patch.final_marks.or(current.final_marks);
    validate_final_grade(final_grade.as_deref())?;
    validate_final_marks(final_marks)?;

    let updated = repositories::enrollments::update(
        pool,
        enrollment_id,
        UpdateEnrollment {
            is_active: patch.is_active.unwrap_or(current.is_active),
            final_grade: final_grade.as_deref(),
            final_marks,
        },
    )
    .await
    .map_err(RecordError::from_store)?;

    if !updated {
        return Err(RecordError::NotFound("enrollment"));
    }

    tracing::info!(actor = %actor.label(), enrollment_id = %enrollment_id, "Enrollment updated");
    get(pool, enrollment_id).await
}

pub(crate) async fn get(pool: &SqlitePool, enrollment_id: &str) -> Result<EnrollmentView, RecordError> {
    repositories::enrollments::find_view(pool, enrollment_id)
        .await?
        .ok_or(RecordError::NotFound("enrollment"))
}

pub(crate) async fn list(
    pool: &SqlitePool,
    filter: &EnrollmentFilter<'_>,
) -> Result<Vec<EnrollmentView>, RecordError> {
    Ok(repositories::enrollments::list(pool, filter).await?)
}

/// Active enrollments of one student, for the "my courses" view.
pub(crate) async fn for_student(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<Vec<EnrollmentView>, RecordError> {
    if !repositories::students::exists(pool, student_id).await? {
        return Err(RecordError::NotFound("student"));
    }
    list(
        pool,
        &EnrollmentFilter { student_id: Some(student_id), is_active: Some(true), ..Default::default() },
    )
    .await
}

pub(crate) async fn delete(
    pool: &SqlitePool,
    actor: &Actor,
    enrollment_id: &str,
) -> Result<(), RecordError> {
    if !repositories::enrollments::delete(pool, enrollment_id).await? {
        return Err(RecordError::NotFound("enrollment"));
    }
    tracing::info!(actor = %actor.label(), enrollment_id = %enrollment_id, "Enrollment deleted");
    Ok(())
}
