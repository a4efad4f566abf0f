use serde::{Deserialize, Serialize};
use time::Date;
use validator::Validate;

use crate::core::time::{deserialize_option_date, format_date, format_primitive};
use crate::db::models::Student;
use crate::db::types::{Gender, Grade};
use crate::services::students::{StudentDetail, StudentDraft, StudentPatch};

/// `grade` is not part of the payload; unknown keys are dropped, so a client
/// sending one has it ignored.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StudentCreate {
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub(crate) name: String,
    #[serde(alias = "rollNumber")]
    pub(crate) roll_number: i64,
    #[validate(email(message = "enter a valid email address"))]
    pub(crate) email: String,
    #[serde(default)]
    #[validate(length(max = 15, message = "phone must be at most 15 characters"))]
    pub(crate) phone: Option<String>,
    #[serde(default, alias = "dateOfBirth", deserialize_with = "deserialize_option_date")]
    pub(crate) date_of_birth: Option<Date>,
    #[serde(default)]
    pub(crate) gender: Option<Gender>,
    #[serde(default)]
    pub(crate) address: Option<String>,
    #[serde(default)]
    pub(crate) city: Option<String>,
    #[serde(default)]
    pub(crate) state: Option<String>,
    #[serde(default, alias = "postalCode")]
    pub(crate) postal_code: Option<String>,
    #[serde(default)]
    pub(crate) country: Option<String>,
    #[serde(default, alias = "guardianName")]
    pub(crate) guardian_name: Option<String>,
    #[serde(default, alias = "guardianPhone")]
    pub(crate) guardian_phone: Option<String>,
    #[serde(default, alias = "guardianEmail")]
    pub(crate) guardian_email: Option<String>,
    #[serde(default, alias = "guardianRelation")]
    pub(crate) guardian_relation: Option<String>,
    pub(crate) marks: f64,
    #[serde(default, alias = "admissionDate", deserialize_with = "deserialize_option_date")]
    pub(crate) admission_date: Option<Date>,
    #[serde(default, alias = "className")]
    pub(crate) class_name: Option<String>,
    #[serde(default)]
    pub(crate) section: Option<String>,
    #[serde(default)]
    pub(crate) notes: Option<String>,
}

impl StudentCreate {
    pub(crate) fn into_draft(self) -> StudentDraft {
        StudentDraft {
            name: self.name,
            roll_number: self.roll_number,
            email: self.email,
            phone: self.phone,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            address: self.address,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            country: self.country,
            guardian_name: self.guardian_name,
            guardian_phone: self.guardian_phone,
            guardian_email: self.guardian_email,
            guardian_relation: self.guardian_relation,
            marks: self.marks,
            admission_date: self.admission_date,
            class_name: self.class_name,
            section: self.section,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub(crate) struct StudentUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "name must be 1 to 100 characters"))]
    pub(crate) name: Option<String>,
    #[serde(default, alias = "rollNumber")]
    pub(crate) roll_number: Option<i64>,
    #[serde(default)]
    #[validate(email(message = "enter a valid email address"))]
    pub(crate) email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 15, message = "phone must be at most 15 characters"))]
    pub(crate) phone: Option<String>,
    #[serde(default, alias = "dateOfBirth", deserialize_with = "deserialize_option_date")]
    pub(crate) date_of_birth: Option<Date>,
    #[serde(default)]
    pub(crate) gender: Option<Gender>,
    #[serde(default)]
    pub(crate) address: Option<String>,
    #[serde(default)]
    pub(crate) city: Option<String>,
    #[serde(default)]
    pub(crate) state: Option<String>,
    #[serde(default, alias = "postalCode")]
    pub(crate) postal_code: Option<String>,
    #[serde(default)]
    pub(crate) country: Option<String>,
    #[serde(default, alias = "guardianName")]
    pub(crate) guardian_name: Option<String>,
    #[serde(default, alias = "guardianPhone")]
    pub(crate) guardian_phone: Option<String>,
    #[serde(default, alias = "guardianEmail")]
    pub(crate) guardian_email: Option<String>,
    #[serde(default, alias = "guardianRelation")]
    pub(crate) guardian_relation: Option<String>,
    #[serde(default)]
    pub(crate) marks: Option<f64>,
    #[serde(default, alias = "admissionDate", deserialize_with = "deserialize_option_date")]
    pub(crate) admission_date: Option<Date>,
    #[serde(default, alias = "className")]
    pub(crate) class_name: Option<String>,
    #[serde(default)]
    pub(crate) section: Option<String>,
    #[serde(default)]
    pub(crate) notes: Option<String>,
    #[serde(default, alias = "isActive")]
    pub(crate) is_active: Option<bool>,
}

impl StudentUpdate {
    pub(crate) fn into_patch(self) -> StudentPatch {
        StudentPatch {
            name: self.name,
            roll_number: self.roll_number,
            email: self.email,
            phone: self.phone,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            address: self.address,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            country: self.country,
            guardian_name: self.guardian_name,
            guardian_phone: self.guardian_phone,
            guardian_email: self.guardian_email,
            guardian_relation: self.guardian_relation,
            marks: self.marks,
            admission_date: self.admission_date,
            class_name: self.class_name,
            section: self.section,
            notes: self.notes,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StudentListQuery {
    #[serde(default)]
    pub(crate) search: Option<String>,
    #[serde(default)]
    pub(crate) grade: Option<String>,
    #[serde(default)]
    pub(crate) marks_min: Option<String>,
    #[serde(default)]
    pub(crate) marks_max: Option<String>,
    #[serde(default)]
    pub(crate) class_name: Option<String>,
    #[serde(default)]
    pub(crate) section: Option<String>,
    #[serde(default)]
    pub(crate) gender: Option<String>,
    #[serde(default)]
    pub(crate) sort: Option<String>,
    #[serde(default)]
    pub(crate) page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudentDeleteQuery {
    #[serde(default)]
    pub(crate) mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkDeleteRequest {
    #[serde(default, alias = "studentIds")]
    pub(crate) student_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) roll_number: i64,
    pub(crate) email: String,
    pub(crate) phone: Option<String>,
    pub(crate) date_of_birth: Option<String>,
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
    pub(crate) grade_label: &'static str,
    pub(crate) admission_date: String,
    pub(crate) class_name: Option<String>,
    pub(crate) section: Option<String>,
    pub(crate) notes: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl StudentResponse {
    pub(crate) fn from_db(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name,
            roll_number: student.roll_number,
            email: student.email,
            phone: student.phone,
            date_of_birth: student.date_of_birth.map(format_date),
            gender: student.gender,
            address: student.address,
            city: student.city,
            state: student.state,
            postal_code: student.postal_code,
            country: student.country,
            guardian_name: student.guardian_name,
            guardian_phone: student.guardian_phone,
            guardian_email: student.guardian_email,
            guardian_relation: student.guardian_relation,
            marks: student.marks,
            grade: student.grade,
            grade_label: student.grade.label(),
            admission_date: format_date(student.admission_date),
            class_name: student.class_name,
            section: student.section,
            notes: student.notes,
            is_active: student.is_active,
            created_at: format_primitive(student.created_at),
            updated_at: format_primitive(student.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentDetailResponse {
    #[serde(flatten)]
    pub(crate) student: StudentResponse,
    pub(crate) attendance_percentage: f64,
    pub(crate) enrolled_courses_count: i64,
}

impl StudentDetailResponse {
    pub(crate) fn from_detail(detail: StudentDetail) -> Self {
        Self {
            student: StudentResponse::from_db(detail.student),
            attendance_percentage: detail.attendance_percentage,
            enrolled_courses_count: detail.enrolled_courses_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ImportResponse {
    pub(crate) success_count: usize,
    pub(crate) error_count: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentReportResponse {
    pub(crate) student_id: String,
    pub(crate) title: &'static str,
    pub(crate) lines: Vec<crate::services::export::ReportLine>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_payload_ignores_grade_and_parses_dates() {
        let payload: StudentCreate = serde_json::from_value(serde_json::json!({
            "name": "Asha",
            "roll_number": 7,
            "email": "asha@example.com",
            "marks": 91.5,
            "grade": "F",
            "admission_date": "2024-06-01",
            "date_of_birth": ""
        }))
        .expect("payload");

        assert!(payload.validate().is_ok());
        assert_eq!(payload.date_of_birth, None);
        assert_eq!(payload.admission_date.map(format_date).as_deref(), Some("2024-06-01"));
    }

    #[test]
    fn create_payload_rejects_bad_email() {
        let payload: StudentCreate = serde_json::from_value(serde_json::json!({
            "name": "Asha",
            "roll_number": 7,
            "email": "not-an-email",
            "marks": 50
        }))
        .expect("payload");

        let errors = payload.validate().expect_err("invalid email");
        assert!(errors.field_errors().contains_key("email"));
    }
}
