use serde::Serialize;
use sqlx::FromRow;
use time::{Date, PrimitiveDateTime};

use crate::db::types::{AttendanceStatus, Gender, Grade, NotificationType};

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) full_name: String,
    pub(crate) email: Option<String>,
    pub(crate) is_staff: bool,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct Student {
    pub(crate) id: String,
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
    pub(crate) country: String,
    pub(crate) guardian_name: Option<String>,
    pub(crate) guardian_phone: Option<String>,
    pub(crate) guardian_email: Option<String>,
    pub(crate) guardian_relation: Option<String>,
    pub(crate) marks: f64,
    pub(crate) grade: Grade,
    pub(crate) admission_date: Date,
    pub(crate) class_name: Option<String>,
    pub(crate) section: Option<String>,
    pub(crate) notes: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) credits: i64,
    pub(crate) teacher_id: Option<String>,
    pub(crate) semester: Option<String>,
    pub(crate) academic_year: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct Enrollment {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) course_id: String,
    pub(crate) enrollment_date: Date,
    pub(crate) is_active: bool,
    pub(crate) final_grade: Option<String>,
    pub(crate) final_marks: Option<f64>,
}

/// Enrollment joined with the names shown next to it.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct EnrollmentView {
    #[sqlx(flatten)]
    pub(crate) enrollment: Enrollment,
    pub(crate) student_name: String,
    pub(crate) course_name: String,
    pub(crate) course_code: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct Attendance {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) course_id: Option<String>,
    pub(crate) date: Date,
    pub(crate) status: AttendanceStatus,
    pub(crate) remarks: Option<String>,
    pub(crate) marked_by: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct AttendanceView {
    #[sqlx(flatten)]
    pub(crate) attendance: Attendance,
    pub(crate) student_name: String,
    pub(crate) student_roll_number: i64,
    pub(crate) course_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct Assignment {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) due_date: PrimitiveDateTime,
    pub(crate) total_marks: i64,
    pub(crate) attachment: Option<String>,
    pub(crate) created_by: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) is_active: bool,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct AssignmentView {
    #[sqlx(flatten)]
    pub(crate) assignment: Assignment,
    pub(crate) course_name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct Submission {
    pub(crate) id: String,
    pub(crate) assignment_id: String,
    pub(crate) student_id: String,
    pub(crate) submission_file: Option<String>,
    pub(crate) submission_text: Option<String>,
    pub(crate) submitted_at: PrimitiveDateTime,
    pub(crate) marks_obtained: Option<f64>,
    pub(crate) feedback: Option<String>,
    pub(crate) graded_by: Option<String>,
    pub(crate) graded_at: Option<PrimitiveDateTime>,
}

/// Submission plus what is needed to render it and derive `is_late`.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct SubmissionView {
    #[sqlx(flatten)]
    pub(crate) submission: Submission,
    pub(crate) student_name: String,
    pub(crate) assignment_title: String,
    pub(crate) assignment_due_date: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct Notification {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) notification_type: NotificationType,
    pub(crate) is_read: bool,
    pub(crate) link: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub(crate) struct Announcement {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) created_by: Option<String>,
    pub(crate) target_class: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) priority: i64,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) expires_at: Option<PrimitiveDateTime>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct AttendanceTally {
    pub(crate) student_id: String,
    pub(crate) name: String,
    pub(crate) roll_number: i64,
    pub(crate) total: i64,
    pub(crate) present: i64,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct GradeCount {
    pub(crate) grade: Grade,
    pub(crate) count: i64,
}
