use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use validator::Validate;

use crate::core::time::{deserialize_option_datetime_flexible, format_primitive};
use crate::db::models::SubmissionView;
use crate::services::metrics::is_late;
use crate::services::submissions::{GradeInput, SubmissionDraft};

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionCreate {
    #[serde(alias = "assignmentId", alias = "assignment")]
    pub(crate) assignment_id: String,
    #[serde(alias = "studentId", alias = "student")]
    pub(crate) student_id: String,
    #[serde(default, alias = "submissionText")]
    pub(crate) submission_text: Option<String>,
    #[serde(default, alias = "submissionFile")]
    pub(crate) submission_file: Option<String>,
    #[serde(
        default,
        alias = "submittedAt",
        deserialize_with = "deserialize_option_datetime_flexible"
    )]
    pub(crate) submitted_at: Option<PrimitiveDateTime>,
}

impl SubmissionCreate {
    pub(crate) fn into_draft(self) -> SubmissionDraft {
        SubmissionDraft {
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            submission_text: self.submission_text,
            submission_file: self.submission_file,
            submitted_at: self.submitted_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SubmissionGrade {
    #[serde(alias = "marksObtained")]
    #[validate(range(min = 0.0, message = "marks must not be negative"))]
    pub(crate) marks_obtained: f64,
    #[serde(default)]
    pub(crate) feedback: Option<String>,
}

impl SubmissionGrade {
    pub(crate) fn into_input(self) -> GradeInput {
        GradeInput { marks_obtained: self.marks_obtained, feedback: self.feedback }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SubmissionListQuery {
    #[serde(default)]
    pub(crate) assignment: Option<String>,
    #[serde(default)]
    pub(crate) student: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: String,
    pub(crate) assignment_id: String,
    pub(crate) assignment_title: String,
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) submission_file: Option<String>,
    pub(crate) submission_text: Option<String>,
    pub(crate) submitted_at: String,
    pub(crate) marks_obtained: Option<f64>,
    pub(crate) feedback: Option<String>,
    pub(crate) graded_by: Option<String>,
    pub(crate) graded_at: Option<String>,
    pub(crate) is_late: bool,
}

impl SubmissionResponse {
    pub(crate) fn from_db(view: SubmissionView) -> Self {
        let submission = view.submission;
        Self {
            is_late: is_late(submission.submitted_at, view.assignment_due_date),
            id: submission.id,
            assignment_id: submission.assignment_id,
            assignment_title: view.assignment_title,
            student_id: submission.student_id,
            student_name: view.student_name,
            submission_file: submission.submission_file,
            submission_text: submission.submission_text,
            submitted_at: format_primitive(submission.submitted_at),
            marks_obtained: submission.marks_obtained,
            feedback: submission.feedback,
            graded_by: submission.graded_by,
            graded_at: submission.graded_at.map(format_primitive),
        }
    }
}
