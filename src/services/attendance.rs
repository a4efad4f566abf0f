use std::collections::HashSet;

use sqlx::SqlitePool;
use time::Date;
use uuid::Uuid;

use crate::core::metrics::record_attendance_marks;
use crate::core::time::primitive_now_utc;
use crate::db::models::AttendanceView;
use crate::db::types::AttendanceStatus;
use crate::repositories;
use crate::repositories::attendance::{AttendanceFilter, AttendanceMark, MarkOutcome};
use crate::services::actor::Actor;
use crate::services::error::RecordError;
use crate::services::metrics::percentage;
use crate::services::paging::PageWindow;
use crate::services::students::optional_text;

#[derive(Debug, Clone)]
pub(crate) struct AttendanceInput {
    pub(crate) student_id: String,
    pub(crate) course_id: Option<String>,
    pub(crate) date: Date,
    pub(crate) status: AttendanceStatus,
    pub(crate) remarks: Option<String>,
}

/// One line of a course-wide marking sheet.
#[derive(Debug, Clone)]
pub(crate) struct CourseMarkEntry {
    pub(crate) student_id: String,
    pub(crate) status: AttendanceStatus,
    pub(crate) remarks: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CourseMarkSummary {
    pub(crate) created: u64,
    pub(crate) updated: u64,
    pub(crate) skipped: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct AttendancePage {
    pub(crate) records: Vec<AttendanceView>,
    pub(crate) window: PageWindow,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AttendanceReportRow {
    pub(crate) student_id: String,
    pub(crate) name: String,
    pub(crate) roll_number: i64,
    pub(crate) total: i64,
    pub(crate) present: i64,
    pub(crate) percentage: f64,
}

/// Records attendance for one student on one day. A second mark for the same
/// student, course and date overwrites the first.
pub(crate) async fn mark(
    pool: &SqlitePool,
    actor: &Actor,
    input: AttendanceInput,
) -> Result<(AttendanceView, MarkOutcome), RecordError> {
    if !repositories::students::exists(pool, &input.student_id).await? {
        return Err(RecordError::NotFound("student"));
    }
    let course_id = optional_text(input.course_id);
    if let Some(course_id) = course_id.as_deref() {
        if !repositories::courses::exists(pool, course_id).await? {
            return Err(RecordError::NotFound("course"));
        }
    }
    let remarks = optional_text(input.remarks);

    let mark = AttendanceMark {
        student_id: &input.student_id,
        course_id: course_id.as_deref(),
        date: input.date,
        status: input.status,
        remarks: remarks.as_deref(),
        marked_by: actor.user_id(),
    };

    let mut tx = crate::db::begin_write(pool).await?;
    let (row, outcome) = repositories::attendance::upsert(
        &mut tx,
        &Uuid::new_v4().to_string(),
        &mark,
        primitive_now_utc(),
    )
    .await
    .map_err(RecordError::from_store)?;
    tx.commit().await?;

    record_attendance_marks(outcome.as_str(), 1);
    tracing::info!(
        actor = %actor.label(),
        attendance_id = %row.id,
        student_id = %row.student_id,
        status = row.status.code(),
        outcome = outcome.as_str(),
        "Attendance marked"
    );

    let view = repositories::attendance::find_view(pool, &row.id)
        .await?
        .ok_or(RecordError::NotFound("attendance"))?;
    Ok((view, outcome))
}

/// Applies a marking sheet to a course for one date. Only students with an
/// active enrollment are written; other entries are counted as skipped. The
/// whole sheet commits or none of it does.
pub(crate) async fn mark_course(
    pool: &SqlitePool,
    actor: &Actor,
    course_id: &str,
    date: Date,
    entries: Vec<CourseMarkEntry>,
) -> Result<CourseMarkSummary, RecordError> {
    if !repositories::courses::exists(pool, course_id).await? {
        return Err(RecordError::NotFound("course"));
    }

    let mut tx = crate::db::begin_write(pool).await?;
    let enrolled: HashSet<String> =
        repositories::enrollments::active_student_ids(&mut *tx, course_id)
            .await?
            .into_iter()
            .collect();

    let now = primitive_now_utc();
    let mut summary = CourseMarkSummary::default();
    for entry in &entries {
        if !enrolled.contains(&entry.student_id) {
            summary.skipped += 1;
            continue;
        }

        let remarks = optional_text(entry.remarks.clone());
        let mark = AttendanceMark {
            student_id: &entry.student_id,
            course_id: Some(course_id),
            date,
            status: entry.status,
            remarks: remarks.as_deref(),
            marked_by: actor.user_id(),
        };
        let (_, outcome) =
            repositories::attendance::upsert(&mut tx, &Uuid::new_v4().to_string(), &mark, now)
                .await
                .map_err(RecordError::from_store)?;
        match outcome {
            MarkOutcome::Created => summary.created += 1,
            MarkOutcome::Updated => summary.updated += 1,
        }
    }
    tx.commit().await?;

    record_attendance_marks(MarkOutcome::Created.as_str(), summary.created);
    record_attendance_marks(MarkOutcome::Updated.as_str(), summary.updated);

    tracing::info!(
        actor = %actor.label(),
        course_id = %course_id,
        created = summary.created,
        updated = summary.updated,
        skipped = summary.skipped,
        "Course attendance marked"
    );
    Ok(summary)
}

pub(crate) async fn list(
    pool: &SqlitePool,
    filter: &AttendanceFilter<'_>,
    page: Option<&str>,
    page_size: i64,
) -> Result<AttendancePage, RecordError> {
    let total_count = repositories::attendance::count(pool, filter).await?;
    let window = PageWindow::resolve(page, page_size, total_count);
    let records =
        repositories::attendance::list(pool, filter, window.offset(), window.page_size).await?;
    Ok(AttendancePage { records, window })
}

pub(crate) async fn for_student(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<Vec<AttendanceView>, RecordError> {
    if !repositories::students::exists(pool, student_id).await? {
        return Err(RecordError::NotFound("student"));
    }
    Ok(repositories::attendance::list_for_student(pool, student_id).await?)
}

/// Per active student `(total, present, percentage)`, with the same zero rule
/// as the single-student percentage.
pub(crate) async fn report(pool: &SqlitePool) -> Result<Vec<AttendanceReportRow>, RecordError> {
    let tallies = repositories::attendance::tally_by_active_student(pool).await?;
    Ok(tallies
        .into_iter()
        .map(|tally| AttendanceReportRow {
            percentage: percentage(tally.present, tally.total),
            student_id: tally.student_id,
            name: tally.name,
            roll_number: tally.roll_number,
            total: tally.total,
            present: tally.present,
        })
        .collect())
}

pub(crate) async fn delete(
    pool: &SqlitePool,
    actor: &Actor,
    attendance_id: &str,
) -> Result<(), RecordError> {
    if !repositories::attendance::delete(pool, attendance_id).await? {
        return Err(RecordError::NotFound("attendance"));
    }
    tracing::info!(actor = %actor.label(), attendance_id = %attendance_id, "Attendance deleted");
    Ok(())
}
