use sqlx::SqlitePool;
use time::Date;
use uuid::Uuid;

use crate::core::time::{primitive_now_utc, today_utc};
use crate::db::models::Student;
use crate::db::types::Gender;
use crate::repositories;
use crate::repositories::students::{StudentFilter, StudentSort, StudentValues};
use crate::services::actor::Actor;
use crate::services::error::RecordError;
use crate::services::lifecycle::{Lifecycle, LifecycleKind};
use crate::services::metrics::{grade_for_marks, percentage};
use crate::services::paging::PageWindow;

pub(crate) const DEFAULT_COUNTRY: &str = "India";

/// Input for a new student. `grade` is deliberately absent: it is always
/// derived from `marks`.
#[derive(Debug, Clone, Default)]
pub(crate) struct StudentDraft {
    pub(crate) name: String,
    pub(crate) roll_number: i64,
    pub(crate) email: String,
    pub(crate) phone: Option<String>,
    pub(crate) date_of_birth: Option<Date>,
    pub(crate) gender: Option<Gender>,
    pub(crate) address: Option<String>,
    pub(crate) city: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) postal_code: Option<String>,
    pub(crate) country: Option<String>,
    pub(crate) guardian_name: Option<String>,
    pub(crate) guardian_phone: Option<String>,
    pub(crate) guardian_email: Option<String>,
    pub(crate) guardian_relation: Option<String>,
    pub(crate) marks: f64,
    pub(crate) admission_date: Option<Date>,
    pub(crate) class_name: Option<String>,
    pub(crate) section: Option<String>,
    pub(crate) notes: Option<String>,
}

/// Partial update. For optional text fields an empty string clears the value.
#[derive(Debug, Clone, Default)]
pub(crate) struct StudentPatch {
    pub(crate) name: Option<String>,
    pub(crate) roll_number: Option<i64>,
    pub(crate) email: Option<String>,
    pub(crate) phone: Option<String>,
    pub(crate) date_of_birth: Option<Date>,
    pub(crate) gender: Option<Gender>,
    pub(crate) address: Option<String>,
    pub(crate) city: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) postal_code: Option<String>,
    pub(crate) country: Option<String>,
    pub(crate) guardian_name: Option<String>,
    pub(crate) guardian_phone: Option<String>,
    pub(crate) guardian_email: Option<String>,
    pub(crate) guardian_relation: Option<String>,
    pub(crate) marks: Option<f64>,
    pub(crate) admission_date: Option<Date>,
    pub(crate) class_name: Option<String>,
    pub(crate) section: Option<String>,
    pub(crate) notes: Option<String>,
    pub(crate) is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub(crate) struct StudentPage {
    pub(crate) students: Vec<Student>,
    pub(crate) window: PageWindow,
}

#[derive(Debug, Clone)]
pub(crate) struct StudentDetail {
    pub(crate) student: Student,
    pub(crate) attendance_percentage: f64,
    pub(crate) enrolled_courses_count: i64,
}

/// Owned form of every column a save writes, after normalisation.
struct Normalized {
    name: String,
    roll_number: i64,
    email: String,
    phone: Option<String>,
    date_of_birth: Option<Date>,
    gender: Option<Gender>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
    country: String,
    guardian_name: Option<String>,
    guardian_phone: Option<String>,
    guardian_email: Option<String>,
    guardian_relation: Option<String>,
    marks: f64,
    admission_date: Date,
    class_name: Option<String>,
    section: Option<String>,
    notes: Option<String>,
    is_active: bool,
}

impl Normalized {
    fn values(&self) -> StudentValues<'_> {
        StudentValues {
            name: &self.name,
            roll_number: self.roll_number,
            email: &self.email,
            phone: self.phone.as_deref(),
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            address: self.address.as_deref(),
            city: self.city.as_deref(),
            state: self.state.as_deref(),
            postal_code: self.postal_code.as_deref(),
            country: &self.country,
            guardian_name: self.guardian_name.as_deref(),
            guardian_phone: self.guardian_phone.as_deref(),
            guardian_email: self.guardian_email.as_deref(),
            guardian_relation: self.guardian_relation.as_deref(),
            marks: self.marks,
            grade: grade_for_marks(self.marks),
            admission_date: self.admission_date,
            class_name: self.class_name.as_deref(),
            section: self.section.as_deref(),
            notes: self.notes.as_deref(),
            is_active: self.is_active,
        }
    }
}

pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn patched_text(update: Option<String>, current: Option<String>) -> Option<String> {
    match update {
        Some(value) => optional_text(Some(value)),
        None => current,
    }
}

fn validate_marks(marks: f64) -> Result<(), RecordError> {
    if !marks.is_finite() {
        return Err(RecordError::validation("marks", "marks must be a number"));
    }
    if !(0.0..=100.0).contains(&marks) {
        return Err(RecordError::validation("marks", "marks must be between 0 and 100"));
    }
    Ok(())
}

async fn ensure_unique(
    pool: &SqlitePool,
    roll_number: i64,
    email: &str,
    excluding: Option<&str>,
) -> Result<(), RecordError> {
    if repositories::students::roll_number_owner(pool, roll_number, excluding).await?.is_some() {
        return Err(RecordError::conflict(
            "roll_number",
            format!("a student with roll number {roll_number} already exists"),
        ));
    }
    if repositories::students::email_owner(pool, email, excluding).await?.is_some() {
        return Err(RecordError::conflict(
            "email",
            format!("a student with email {email} already exists"),
        ));
    }
    Ok(())
}

pub(crate) async fn create(
    pool: &SqlitePool,
    actor: &Actor,
    draft: StudentDraft,
) -> Result<Student, RecordError> {
    validate_marks(draft.marks)?;

    let normalized = Normalized {
        name: draft.name.trim().to_string(),
        roll_number: draft.roll_number,
        email: draft.email.trim().to_string(),
        phone: optional_text(draft.phone),
        date_of_birth: draft.date_of_birth,
        gender: draft.gender,
        address: optional_text(draft.address),
        city: optional_text(draft.city),
        state: optional_text(draft.state),
        postal_code: optional_text(draft.postal_code),
        country: optional_text(draft.country).unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        guardian_name: optional_text(draft.guardian_name),
        guardian_phone: optional_text(draft.guardian_phone),
        guardian_email: optional_text(draft.guardian_email),
        guardian_relation: optional_text(draft.guardian_relation),
        marks: draft.marks,
        admission_date: draft.admission_date.unwrap_or_else(today_utc),
        class_name: optional_text(draft.class_name),
        section: optional_text(draft.section),
        notes: optional_text(draft.notes),
        is_active: true,
    };

    ensure_unique(pool, normalized.roll_number, &normalized.email, None).await?;

    let id = Uuid::new_v4().to_string();
    let student =
        repositories::students::create(pool, &id, &normalized.values(), primitive_now_utc())
            .await
            .map_err(RecordError::from_store)?;

    tracing::info!(
        actor = %actor.label(),
        student_id = %student.id,
        roll_number = student.roll_number,
        grade = student.grade.as_str(),
        "Student created"
    );

    Ok(student)
}

pub(crate) async fn update(
    pool: &SqlitePool,
    actor: &Actor,
    student_id: &str,
    patch: StudentPatch,
) -> Result<Student, RecordError> {
    let current = repositories::students::find_by_id(pool, student_id)
        .await?
        .ok_or(RecordError::NotFound("student"))?;

    let marks = patch.marks.unwrap_or(current.marks);
    validate_marks(marks)?;

    let normalized = Normalized {
        name: patch.name.map(|name| name.trim().to_string()).unwrap_or(current.name),
        roll_number: patch.roll_number.unwrap_or(current.roll_number),
        email: patch.email.map(|email| email.trim().to_string()).unwrap_or(current.email),
        phone: patched_text(patch.phone, current.phone),
        date_of_birth: patch.date_of_birth.or(current.date_of_birth),
        gender: patch.gender.or(current.gender),
        address: patched_text(patch.address, current.address),
        city: patched_text(patch.city, current.city),
        state: patched_text(patch.state, current.state),
        postal_code: patched_text(patch.postal_code, current.postal_code),
        country: optional_text(patch.country).unwrap_or(current.country),
        guardian_name: patched_text(patch.guardian_name, current.guardian_name),
        guardian_phone: patched_text(patch.guardian_phone, current.guardian_phone),
        guardian_email: patched_text(patch.guardian_email, current.guardian_email),
        guardian_relation: patched_text(patch.guardian_relation, current.guardian_relation),
        marks,
        admission_date: patch.admission_date.unwrap_or(current.admission_date),
        class_name: patched_text(patch.class_name, current.class_name),
        section: patched_text(patch.section, current.section),
        notes: patched_text(patch.notes, current.notes),
        is_active: patch.is_active.unwrap_or(current.is_active),
    };

    ensure_unique(pool, normalized.roll_number, &normalized.email, Some(student_id)).await?;

    let updated = repositories::students::update(
        pool,
        student_id,
        &normalized.values(),
        primitive_now_utc(),
    )
    .await
    .map_err(RecordError::from_store)?
    .ok_or(RecordError::NotFound("student"))?;

    tracing::info!(
        actor = %actor.label(),
        student_id = %updated.id,
        grade = updated.grade.as_str(),
        "Student updated"
    );

    Ok(updated)
}

pub(crate) async fn get(pool: &SqlitePool, student_id: &str) -> Result<Student, RecordError> {
    repositories::students::find_by_id(pool, student_id)
        .await?
        .ok_or(RecordError::NotFound("student"))
}

/// One page of active students matching `filter`.
pub(crate) async fn list(
    pool: &SqlitePool,
    filter: &StudentFilter<'_>,
    sort: StudentSort,
    page: Option<&str>,
    page_size: i64,
) -> Result<StudentPage, RecordError> {
    let total_count = repositories::students::count_active(pool, filter).await?;
    let window = PageWindow::resolve(page, page_size, total_count);
    let students = repositories::students::list_active(
        pool,
        filter,
        sort,
        window.offset(),
        window.page_size,
    )
    .await?;

    tracing::debug!(
        sort = sort.as_str(),
        page = window.page,
        total_count = window.total_count,
        "Students listed"
    );
    Ok(StudentPage { students, window })
}

pub(crate) async fn attendance_percentage(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<f64, RecordError> {
    let (total, present) = repositories::attendance::tally_for_student(pool, student_id).await?;
    Ok(percentage(present, total))
}

pub(crate) async fn detail(pool: &SqlitePool, student_id: &str) -> Result<StudentDetail, RecordError> {
    let student = get(pool, student_id).await?;
    let attendance_percentage = attendance_percentage(pool, student_id).await?;
    let enrolled_courses_count =
        repositories::students::count_active_enrollments(pool, student_id).await?;

    Ok(StudentDetail { student, attendance_percentage, enrolled_courses_count })
}

/// Moves a student to `target`. `Deleted` removes the row together with its
/// enrollments, attendance and submissions.
pub(crate) async fn transition(
    pool: &SqlitePool,
    actor: &Actor,
    student_id: &str,
    target: Lifecycle,
) -> Result<(), RecordError> {
    LifecycleKind::Student.ensure(target)?;

    let changed = match target {
        Lifecycle::Active | Lifecycle::Archived => {
            repositories::students::set_active(
                pool,
                student_id,
                target == Lifecycle::Active,
                primitive_now_utc(),
            )
            .await?
        }
        Lifecycle::Deleted => repositories::students::delete(pool, student_id).await?,
    };

    if !changed {
        return Err(RecordError::NotFound("student"));
    }

    tracing::info!(
        actor = %actor.label(),
        student_id = %student_id,
        lifecycle = target.as_str(),
        "Student lifecycle changed"
    );
    Ok(())
}

pub(crate) async fn bulk_delete(
    pool: &SqlitePool,
    actor: &Actor,
    student_ids: &[String],
) -> Result<u64, RecordError> {
    if student_ids.is_empty() {
        return Err(RecordError::validation("student_ids", "no students selected"));
    }

    let removed = repositories::students::delete_many(pool, student_ids).await?;

    tracing::info!(
        actor = %actor.label(),
        requested = student_ids.len(),
        removed,
        "Students bulk deleted"
    );
    Ok(removed)
}
