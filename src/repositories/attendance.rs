use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use time::{Date, PrimitiveDateTime};

use crate::db::models::{Attendance, AttendanceTally, AttendanceView};
use crate::db::types::AttendanceStatus;

const ATTENDANCE_COLUMNS: &str =
    "id, student_id, course_id, date, status, remarks, marked_by, created_at";

const VIEW_SELECT: &str = "\
    SELECT a.id, a.student_id, a.course_id, a.date, a.status, a.remarks, a.marked_by, \
           a.created_at, s.name AS student_name, s.roll_number AS student_roll_number, \
           c.name AS course_name \
    FROM attendance a \
    JOIN students s ON s.id = a.student_id \
    LEFT JOIN courses c ON c.id = a.course_id";

/// The natural key plus the fields an upsert writes.
pub(crate) struct AttendanceMark<'a> {
    pub(crate) student_id: &'a str,
    pub(crate) course_id: Option<&'a str>,
    pub(crate) date: Date,
    pub(crate) status: AttendanceStatus,
    pub(crate) remarks: Option<&'a str>,
    pub(crate) marked_by: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkOutcome {
    Created,
    Updated,
}

impl MarkOutcome {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct AttendanceFilter<'a> {
    pub(crate) student_id: Option<&'a str>,
    pub(crate) course_id: Option<&'a str>,
    pub(crate) date: Option<Date>,
    pub(crate) status: Option<AttendanceStatus>,
}

async fn find_key(
    conn: &mut SqliteConnection,
    mark: &AttendanceMark<'_>,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT id FROM attendance WHERE student_id = ? AND course_id IS ? AND date = ?",
    )
    .bind(mark.student_id)
    .bind(mark.course_id)
    .bind(mark.date)
    .fetch_optional(conn)
    .await
}

async fn overwrite(
    conn: &mut SqliteConnection,
    id: &str,
    mark: &AttendanceMark<'_>,
) -> Result<Attendance, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(&format!(
        "UPDATE attendance SET status = ?, remarks = ?, marked_by = ?
         WHERE id = ?
         RETURNING {ATTENDANCE_COLUMNS}",
    ))
    .bind(mark.status)
    .bind(mark.remarks)
    .bind(mark.marked_by)
    .bind(id)
    .fetch_one(conn)
    .await
}

/// Writes the mark onto the row holding its key, creating the row when
/// there is none. The caller must hold the write lock (see
/// `db::begin_write`) so the lookup and the write see the same state.
pub(crate) async fn upsert(
    conn: &mut SqliteConnection,
    new_id: &str,
    mark: &AttendanceMark<'_>,
    now: PrimitiveDateTime,
) -> Result<(Attendance, MarkOutcome), sqlx::Error> {
    if let Some(existing_id) = find_key(&mut *conn, mark).await? {
        let row = overwrite(&mut *conn, &existing_id, mark).await?;
        return Ok((row, MarkOutcome::Updated));
    }

    let row = sqlx::query_as::<_, Attendance>(&format!(
        "INSERT INTO attendance (
            id, student_id, course_id, date, status, remarks, marked_by, created_at
         ) VALUES (?,?,?,?,?,?,?,?)
         RETURNING {ATTENDANCE_COLUMNS}",
    ))
    .bind(new_id)
    .bind(mark.student_id)
    .bind(mark.course_id)
    .bind(mark.date)
    .bind(mark.status)
    .bind(mark.remarks)
    .bind(mark.marked_by)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok((row, MarkOutcome::Created))
}

pub(crate) async fn find_view(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<AttendanceView>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceView>(&format!("{VIEW_SELECT} WHERE a.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &AttendanceFilter<'_>) {
    builder.push(" WHERE 1 = 1");
    if let Some(student_id) = filter.student_id {
        builder.push(" AND a.student_id = ");
        builder.push_bind(student_id.to_string());
    }
    if let Some(course_id) = filter.course_id {
        builder.push(" AND a.course_id = ");
        builder.push_bind(course_id.to_string());
    }
    if let Some(date) = filter.date {
        builder.push(" AND a.date = ");
        builder.push_bind(date);
    }
    if let Some(status) = filter.status {
        builder.push(" AND a.status = ");
        builder.push_bind(status);
    }
}

pub(crate) async fn count(
    pool: &SqlitePool,
    filter: &AttendanceFilter<'_>,
) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM attendance a");
    push_filters(&mut builder, filter);
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

pub(crate) async fn list(
    pool: &SqlitePool,
    filter: &AttendanceFilter<'_>,
    offset: i64,
    limit: i64,
) -> Result<Vec<AttendanceView>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(VIEW_SELECT);
    push_filters(&mut builder, filter);
    builder.push(" ORDER BY a.date DESC, a.created_at DESC LIMIT ");
    builder.push_bind(limit.max(1));
    builder.push(" OFFSET ");
    builder.push_bind(offset.max(0));

    builder.build_query_as::<AttendanceView>().fetch_all(pool).await
}

/// Every record, newest date first, for export.
pub(crate) async fn list_all(pool: &SqlitePool) -> Result<Vec<AttendanceView>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceView>(&format!(
        "{VIEW_SELECT} ORDER BY a.date DESC, s.roll_number ASC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_student(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<Vec<AttendanceView>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceView>(&format!(
        "{VIEW_SELECT} WHERE a.student_id = ? ORDER BY a.date DESC, a.created_at DESC"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// `(total, present)` for one student.
pub(crate) async fn tally_for_student(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<(i64, i64), sqlx::Error> {
    sqlx::query_as::<_, (i64, i64)>(
        "SELECT COUNT(*), COALESCE(SUM(CASE WHEN status = 'P' THEN 1 ELSE 0 END), 0)
         FROM attendance WHERE student_id = ?",
    )
    .bind(student_id)
    .fetch_one(pool)
    .await
}

/// `(total, present)` across every record in the table.
pub(crate) async fn tally_all(pool: &SqlitePool) -> Result<(i64, i64), sqlx::Error> {
    sqlx::query_as::<_, (i64, i64)>(
        "SELECT COUNT(*), COALESCE(SUM(CASE WHEN status = 'P' THEN 1 ELSE 0 END), 0)
         FROM attendance",
    )
    .fetch_one(pool)
    .await
}

/// One grouped pass producing a tally per active student, including
/// students with no records at all.
pub(crate) async fn tally_by_active_student(
    pool: &SqlitePool,
) -> Result<Vec<AttendanceTally>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceTally>(
        "SELECT s.id AS student_id, s.name, s.roll_number,
                COUNT(a.id) AS total,
                COALESCE(SUM(CASE WHEN a.status = 'P' THEN 1 ELSE 0 END), 0) AS present
         FROM students s
         LEFT JOIN attendance a ON a.student_id = s.id
         WHERE s.is_active = 1
         GROUP BY s.id, s.name, s.roll_number
         ORDER BY s.roll_number ASC",
    )
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM attendance WHERE id = ?").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
