use sqlx::SqlitePool;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::{AssignmentView, Course, EnrollmentView, Student};
use crate::repositories;
use crate::repositories::courses::{CourseFilter, CourseValues};
use crate::repositories::enrollments::EnrollmentFilter;
use crate::services::actor::Actor;
use crate::services::error::RecordError;
use crate::services::lifecycle::{Lifecycle, LifecycleKind};
use crate::services::students::optional_text;

pub(crate) const DEFAULT_CREDITS: i64 = 3;

#[derive(Debug, Clone, Default)]
pub(crate) struct CourseDraft {
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) credits: Option<i64>,
    pub(crate) teacher_id: Option<String>,
    pub(crate) semester: Option<String>,
    pub(crate) academic_year: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CoursePatch {
    pub(crate) code: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) credits: Option<i64>,
    pub(crate) teacher_id: Option<String>,
    pub(crate) semester: Option<String>,
    pub(crate) academic_year: Option<String>,
    pub(crate) is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub(crate) struct CourseDetail {
    pub(crate) course: Course,
    pub(crate) enrolled_students_count: i64,
    pub(crate) enrollments: Vec<EnrollmentView>,
    pub(crate) assignments: Vec<AssignmentView>,
}

fn required_text(field: &'static str, value: &str) -> Result<String, RecordError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordError::validation(field, format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn validate_credits(credits: i64) -> Result<(), RecordError> {
    if credits < 0 {
        return Err(RecordError::validation("credits", "credits must not be negative"));
    }
    Ok(())
}

async fn ensure_teacher(pool: &SqlitePool, teacher_id: Option<&str>) -> Result<(), RecordError> {
    let Some(teacher_id) = teacher_id else {
        return Ok(());
    };
    if !repositories::users::exists(pool, teacher_id).await? {
        return Err(RecordError::validation("teacher_id", "teacher does not exist"));
    }
    Ok(())
}

async fn ensure_code_free(
    pool: &SqlitePool,
    code: &str,
    excluding: Option<&str>,
) -> Result<(), RecordError> {
    if repositories::courses::code_owner(pool, code, excluding).await?.is_some() {
        return Err(RecordError::conflict("code", format!("course code {code} is already in use")));
    }
    Ok(())
}

/// The actor becomes the teacher unless one is named explicitly.
pub(crate) async fn create(
    pool: &SqlitePool,
    actor: &Actor,
    draft: CourseDraft,
) -> Result<Course, RecordError> {
    let code = required_text("code", &draft.code)?;
    let name = required_text("name", &draft.name)?;
    let credits = draft.credits.unwrap_or(DEFAULT_CREDITS);
    validate_credits(credits)?;

    let teacher_id = optional_text(draft.teacher_id).or_else(|| actor.user_id().map(String::from));
    ensure_teacher(pool, teacher_id.as_deref()).await?;
    ensure_code_free(pool, &code, None).await?;

    let description = optional_text(draft.description);
    let semester = optional_text(draft.semester);
    let academic_year = optional_text(draft.academic_year);
    let values = CourseValues {
        code: &code,
        name: &name,
        description: description.as_deref(),
        credits,
        teacher_id: teacher_id.as_deref(),
        semester: semester.as_deref(),
        academic_year: academic_year.as_deref(),
        is_active: true,
    };

    let course = repositories::courses::create(
        pool,
        &Uuid::new_v4().to_string(),
        &values,
        primitive_now_utc(),
    )
    .await
    .map_err(RecordError::from_store)?;

    tracing::info!(
        actor = %actor.label(),
        course_id = %course.id,
        code = %course.code,
        "Course created"
    );
    Ok(course)
}

pub(crate) async fn update(
    pool: &SqlitePool,
    actor: &Actor,
    course_id: &str,
    patch: CoursePatch,
) -> Result<Course, RecordError> {
    let current = get(pool, course_id).await?;

    let code = match patch.code {
        Some(code) => required_text("code", &code)?,
        None => current.code,
    };
    let name = match patch.name {
        Some(name) => required_text("name", &name)?,
        None => current.name,
    };
    let credits = patch.credits.unwrap_or(current.credits);
    validate_credits(credits)?;

    let teacher_id = match patch.teacher_id {
        Some(teacher_id) => optional_text(Some(teacher_id)),
        None => current.teacher_id,
    };
    ensure_teacher(pool, teacher_id.as_deref()).await?;
    ensure_code_free(pool, &code, Some(course_id)).await?;

    let description = patch.description.map_or(current.description, |v| optional_text(Some(v)));
    let semester = patch.semester.map_or(current.semester, |v| optional_text(Some(v)));
    let academic_year =
        patch.academic_year.map_or(current.academic_year, |v| optional_text(Some(v)));
    let values = CourseValues {
        code: &code,
        name: &name,
        description: description.as_deref(),
        credits,
        teacher_id: teacher_id.as_deref(),
        semester: semester.as_deref(),
        academic_year: academic_year.as_deref(),
        is_active: patch.is_active.unwrap_or(current.is_active),
    };

    let course = repositories::courses::update(pool, course_id, &values, primitive_now_utc())
        .await
        .map_err(RecordError::from_store)?
        .ok_or(RecordError::NotFound("course"))?;

    tracing::info!(actor = %actor.label(), course_id = %course.id, "Course updated");
    Ok(course)
}

pub(crate) async fn get(pool: &SqlitePool, course_id: &str) -> Result<Course, RecordError> {
    repositories::courses::find_by_id(pool, course_id)
        .await?
        .ok_or(RecordError::NotFound("course"))
}

pub(crate) async fn list(
    pool: &SqlitePool,
    filter: &CourseFilter<'_>,
) -> Result<Vec<(Course, i64)>, RecordError> {
    let courses = repositories::courses::list_active(pool, filter).await?;
    let mut rows = Vec::with_capacity(courses.len());
    for course in courses {
        let enrolled = repositories::courses::count_active_enrollments(pool, &course.id).await?;
        rows.push((course, enrolled));
    }
    Ok(rows)
}

pub(crate) async fn detail(pool: &SqlitePool, course_id: &str) -> Result<CourseDetail, RecordError> {
    let course = get(pool, course_id).await?;
    let enrolled_students_count =
        repositories::courses::count_active_enrollments(pool, course_id).await?;
    let enrollments = repositories::enrollments::list(
        pool,
        &EnrollmentFilter { course_id: Some(course_id), is_active: Some(true), ..Default::default() },
    )
    .await?;
    let assignments = repositories::assignments::list_active(pool, Some(course_id)).await?;

    Ok(CourseDetail { course, enrolled_students_count, enrollments, assignments })
}

pub(crate) async fn enrolled_students(
    pool: &SqlitePool,
    course_id: &str,
) -> Result<Vec<Student>, RecordError> {
    if !repositories::courses::exists(pool, course_id).await? {
        return Err(RecordError::NotFound("course"));
    }
    Ok(repositories::courses::list_enrolled_students(pool, course_id).await?)
}

/// `Archived` hides the course; `Deleted` purges it with every enrollment,
/// attendance record, assignment and submission under it.
pub(crate) async fn transition(
    pool: &SqlitePool,
    actor: &Actor,
    course_id: &str,
    target: Lifecycle,
) -> Result<(), RecordError> {
    LifecycleKind::Course.ensure(target)?;

    let changed = match target {
        Lifecycle::Active | Lifecycle::Archived => {
            repositories::courses::set_active(
                pool,
                course_id,
                target == Lifecycle::Active,
                primitive_now_utc(),
            )
            .await?
        }
        Lifecycle::Deleted => repositories::courses::delete(pool, course_id).await?,
    };

    if !changed {
        return Err(RecordError::NotFound("course"));
    }

    tracing::info!(
        actor = %actor.label(),
        course_id = %course_id,
        lifecycle = target.as_str(),
        "Course lifecycle changed"
    );
    Ok(())
}
