use serde::{Deserialize, Serialize};
use time::Date;

use crate::core::time::{deserialize_option_date, format_date, format_primitive, today_utc};
use crate::db::models::AttendanceView;
use crate::db::types::AttendanceStatus;
use crate::services::attendance::{
    AttendanceInput, AttendanceReportRow, CourseMarkEntry, CourseMarkSummary,
};

fn default_status() -> AttendanceStatus {
    AttendanceStatus::Present
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttendanceCreate {
    #[serde(alias = "studentId", alias = "student")]
    pub(crate) student_id: String,
    #[serde(default, alias = "courseId", alias = "course")]
    pub(crate) course_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_date")]
    pub(crate) date: Option<Date>,
    #[serde(default = "default_status")]
    pub(crate) status: AttendanceStatus,
    #[serde(default)]
    pub(crate) remarks: Option<String>,
}

impl AttendanceCreate {
    pub(crate) fn into_input(self) -> AttendanceInput {
        AttendanceInput {
            student_id: self.student_id,
            course_id: self.course_id,
            date: self.date.unwrap_or_else(today_utc),
            status: self.status,
            remarks: self.remarks,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CourseMarkRequestEntry {
    #[serde(alias = "studentId", alias = "student")]
    pub(crate) student_id: String,
    #[serde(default = "default_status")]
    pub(crate) status: AttendanceStatus,
    #[serde(default)]
    pub(crate) remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CourseMarkRequest {
    #[serde(alias = "courseId", alias = "course")]
    pub(crate) course_id: String,
    #[serde(default, deserialize_with = "deserialize_option_date")]
    pub(crate) date: Option<Date>,
    #[serde(default)]
    pub(crate) entries: Vec<CourseMarkRequestEntry>,
}

impl CourseMarkRequest {
    pub(crate) fn into_parts(self) -> (String, Date, Vec<CourseMarkEntry>) {
        let entries = self
            .entries
            .into_iter()
            .map(|entry| CourseMarkEntry {
                student_id: entry.student_id,
                status: entry.status,
                remarks: entry.remarks,
            })
            .collect();
        (self.course_id, self.date.unwrap_or_else(today_utc), entries)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AttendanceListQuery {
    #[serde(default)]
    pub(crate) student: Option<String>,
    #[serde(default)]
    pub(crate) course: Option<String>,
    #[serde(default)]
    pub(crate) date: Option<String>,
    #[serde(default)]
    pub(crate) status: Option<String>,
    #[serde(default)]
    pub(crate) page: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttendanceResponse {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) student_roll_number: i64,
    pub(crate) course_id: Option<String>,
    pub(crate) course_name: Option<String>,
    pub(crate) date: String,
    pub(crate) status: AttendanceStatus,
    pub(crate) status_label: &'static str,
    pub(crate) remarks: Option<String>,
    pub(crate) marked_by: Option<String>,
    pub(crate) created_at: String,
}

impl AttendanceResponse {
    pub(crate) fn from_db(view: AttendanceView) -> Self {
        let record = view.attendance;
        Self {
            id: record.id,
            student_id: record.student_id,
            student_name: view.student_name,
            student_roll_number: view.student_roll_number,
            course_id: record.course_id,
            course_name: view.course_name,
            date: format_date(record.date),
            status: record.status,
            status_label: record.status.label(),
            remarks: record.remarks,
            marked_by: record.marked_by,
            created_at: format_primitive(record.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AttendanceMarkResponse {
    pub(crate) created: bool,
    pub(crate) attendance: AttendanceResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseMarkResponse {
    pub(crate) created: u64,
    pub(crate) updated: u64,
    pub(crate) skipped: u64,
}

impl From<CourseMarkSummary> for CourseMarkResponse {
    fn from(summary: CourseMarkSummary) -> Self {
        Self { created: summary.created, updated: summary.updated, skipped: summary.skipped }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AttendanceReportEntry {
    pub(crate) student_id: String,
    pub(crate) name: String,
    pub(crate) roll_number: i64,
    pub(crate) total: i64,
    pub(crate) present: i64,
    pub(crate) percentage: f64,
}

impl From<AttendanceReportRow> for AttendanceReportEntry {
    fn from(row: AttendanceReportRow) -> Self {
        Self {
            student_id: row.student_id,
            name: row.name,
            roll_number: row.roll_number,
            total: row.total,
            present: row.present,
            percentage: row.percentage,
        }
    }
}
