use serde::{Deserialize, Serialize};
use time::Date;
use validator::Validate;

use crate::core::time::{deserialize_option_date, format_date};
use crate::db::models::EnrollmentView;
use crate::services::enrollments::{EnrollmentDraft, EnrollmentPatch};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct EnrollmentCreate {
    #[serde(alias = "studentId", alias = "student")]
    pub(crate) student_id: String,
    #[serde(alias = "courseId", alias = "course")]
    pub(crate) course_id: String,
    #[serde(default, alias = "enrollmentDate", deserialize_with = "deserialize_option_date")]
    pub(crate) enrollment_date: Option<Date>,
    #[serde(default, alias = "finalGrade")]
    #[validate(length(max = 2, message = "final grade must be at most 2 characters"))]
    pub(crate) final_grade: Option<String>,
    #[serde(default, alias = "finalMarks")]
    #[validate(range(min = 0.0, max = 100.0, message = "final marks must be between 0 and 100"))]
    pub(crate) final_marks: Option<f64>,
}

impl EnrollmentCreate {
    pub(crate) fn into_draft(self) -> EnrollmentDraft {
        EnrollmentDraft {
            student_id: self.student_id,
            course_id: self.course_id,
            enrollment_date: self.enrollment_date,
            final_grade: self.final_grade,
            final_marks: self.final_marks,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct EnrollmentUpdate {
    #[serde(default, alias = "isActive")]
    pub(crate) is_active: Option<bool>,
    #[serde(default, alias = "finalGrade")]
    #[validate(length(max = 2, message = "final grade must be at most 2 characters"))]
    pub(crate) final_grade: Option<String>,
    #[serde(default, alias = "finalMarks")]
    #[validate(range(min = 0.0, max = 100.0, message = "final marks must be between 0 and 100"))]
    pub(crate) final_marks: Option<f64>,
}

impl EnrollmentUpdate {
    pub(crate) fn into_patch(self) -> EnrollmentPatch {
        EnrollmentPatch {
            is_active: self.is_active,
            final_grade: self.final_grade,
            final_marks: self.final_marks,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EnrollmentListQuery {
    #[serde(default)]
    pub(crate) student: Option<String>,
    #[serde(default)]
    pub(crate) course: Option<String>,
    #[serde(default)]
    pub(crate) is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentResponse {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) student_name: String,
    pub(crate) course_id: String,
    pub(crate) course_name: String,
    pub(crate) course_code: String,
    pub(crate) enrollment_date: String,
    pub(crate) is_active: bool,
    pub(crate) final_grade: Option<String>,
    pub(crate) final_marks: Option<f64>,
}

impl EnrollmentResponse {
    pub(crate) fn from_db(view: EnrollmentView) -> Self {
        let enrollment = view.enrollment;
        Self {
            id: enrollment.id,
            student_id: enrollment.student_id,
            student_name: view.student_name,
            course_id: enrollment.course_id,
            course_name: view.course_name,
            course_code: view.course_code,
            enrollment_date: format_date(enrollment.enrollment_date),
            is_active: enrollment.is_active,
            final_grade: enrollment.final_grade,
            final_marks: enrollment.final_marks,
        }
    }
}
