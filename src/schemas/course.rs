use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Course;
use crate::schemas::assignment::AssignmentResponse;
use crate::schemas::enrollment::EnrollmentResponse;
use crate::services::courses::{CourseDetail, CourseDraft, CoursePatch};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseCreate {
    #[validate(length(min = 1, max = 20, message = "code must be 1 to 20 characters"))]
    pub(crate) code: String,
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "credits must not be negative"))]
    pub(crate) credits: Option<i64>,
    #[serde(default, alias = "teacherId")]
    pub(crate) teacher_id: Option<String>,
    #[serde(default)]
    pub(crate) semester: Option<String>,
    #[serde(default, alias = "academicYear")]
    pub(crate) academic_year: Option<String>,
}

impl CourseCreate {
    pub(crate) fn into_draft(self) -> CourseDraft {
        CourseDraft {
            code: self.code,
            name: self.name,
            description: self.description,
            credits: self.credits,
            teacher_id: self.teacher_id,
            semester: self.semester,
            academic_year: self.academic_year,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 20, message = "code must be 1 to 20 characters"))]
    pub(crate) code: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "credits must not be negative"))]
    pub(crate) credits: Option<i64>,
    #[serde(default, alias = "teacherId")]
    pub(crate) teacher_id: Option<String>,
    #[serde(default)]
    pub(crate) semester: Option<String>,
    #[serde(default, alias = "academicYear")]
    pub(crate) academic_year: Option<String>,
    #[serde(default, alias = "isActive")]
    pub(crate) is_active: Option<bool>,
}

impl CourseUpdate {
    pub(crate) fn into_patch(self) -> CoursePatch {
        CoursePatch {
            code: self.code,
            name: self.name,
            description: self.description,
            credits: self.credits,
            teacher_id: self.teacher_id,
            semester: self.semester,
            academic_year: self.academic_year,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CourseListQuery {
    #[serde(default)]
    pub(crate) search: Option<String>,
    #[serde(default)]
    pub(crate) semester: Option<String>,
    #[serde(default)]
    pub(crate) academic_year: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CourseDeleteQuery {
    #[serde(default)]
    pub(crate) purge: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) credits: i64,
    pub(crate) teacher_id: Option<String>,
    pub(crate) semester: Option<String>,
    pub(crate) academic_year: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) enrolled_students_count: i64,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course, enrolled_students_count: i64) -> Self {
        Self {
            id: course.id,
            code: course.code,
            name: course.name,
            description: course.description,
            credits: course.credits,
            teacher_id: course.teacher_id,
            semester: course.semester,
            academic_year: course.academic_year,
            is_active: course.is_active,
            enrolled_students_count,
            created_at: format_primitive(course.created_at),
            updated_at: format_primitive(course.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseDetailResponse {
    #[serde(flatten)]
    pub(crate) course: CourseResponse,
    pub(crate) enrollments: Vec<EnrollmentResponse>,
    pub(crate) assignments: Vec<AssignmentResponse>,
}

impl CourseDetailResponse {
    pub(crate) fn from_detail(detail: CourseDetail) -> Self {
        Self {
            course: CourseResponse::from_db(detail.course, detail.enrolled_students_count),
            enrollments: detail.enrollments.into_iter().map(EnrollmentResponse::from_db).collect(),
            assignments: detail.assignments.into_iter().map(AssignmentResponse::from_db).collect(),
        }
    }
}
