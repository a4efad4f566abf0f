use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use validator::Validate;

use crate::core::time::{
    deserialize_datetime_flexible, deserialize_option_datetime_flexible, format_primitive,
    primitive_now_utc,
};
use crate::db::models::AssignmentView;
use crate::schemas::submission::SubmissionResponse;
use crate::services::assignments::{AssignmentDetail, AssignmentDraft, AssignmentPatch};
use crate::services::metrics::is_overdue;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssignmentCreate {
    #[serde(alias = "courseId", alias = "course")]
    pub(crate) course_id: String,
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(alias = "dueDate", deserialize_with = "deserialize_datetime_flexible")]
    pub(crate) due_date: PrimitiveDateTime,
    #[serde(default, alias = "totalMarks")]
    #[validate(range(min = 1, message = "total marks must be positive"))]
    pub(crate) total_marks: Option<i64>,
    #[serde(default)]
    pub(crate) attachment: Option<String>,
}

impl AssignmentCreate {
    pub(crate) fn into_draft(self) -> AssignmentDraft {
        AssignmentDraft {
            course_id: self.course_id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            total_marks: self.total_marks,
            attachment: self.attachment,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssignmentUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(
        default,
        alias = "dueDate",
        deserialize_with = "deserialize_option_datetime_flexible"
    )]
    pub(crate) due_date: Option<PrimitiveDateTime>,
    #[serde(default, alias = "totalMarks")]
    #[validate(range(min = 1, message = "total marks must be positive"))]
    pub(crate) total_marks: Option<i64>,
    #[serde(default)]
    pub(crate) attachment: Option<String>,
}

impl AssignmentUpdate {
    pub(crate) fn into_patch(self) -> AssignmentPatch {
        AssignmentPatch {
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            total_marks: self.total_marks,
            attachment: self.attachment,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AssignmentListQuery {
    #[serde(default)]
    pub(crate) course: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) course_name: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) due_date: String,
    pub(crate) total_marks: i64,
    pub(crate) attachment: Option<String>,
    pub(crate) created_by: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) is_overdue: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl AssignmentResponse {
    pub(crate) fn from_db(view: AssignmentView) -> Self {
        let assignment = view.assignment;
        Self {
            is_overdue: is_overdue(assignment.due_date, primitive_now_utc()),
            id: assignment.id,
            course_id: assignment.course_id,
            course_name: view.course_name,
            title: assignment.title,
            description: assignment.description,
            due_date: format_primitive(assignment.due_date),
            total_marks: assignment.total_marks,
            attachment: assignment.attachment,
            created_by: assignment.created_by,
            is_active: assignment.is_active,
            created_at: format_primitive(assignment.created_at),
            updated_at: format_primitive(assignment.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentDetailResponse {
    #[serde(flatten)]
    pub(crate) assignment: AssignmentResponse,
    pub(crate) submissions: Vec<SubmissionResponse>,
}

impl AssignmentDetailResponse {
    pub(crate) fn from_detail(detail: AssignmentDetail) -> Self {
        Self {
            assignment: AssignmentResponse::from_db(detail.assignment),
            submissions: detail.submissions.into_iter().map(SubmissionResponse::from_db).collect(),
        }
    }
}
