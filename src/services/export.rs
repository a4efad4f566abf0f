use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::core::time::{format_date, format_export_timestamp};
use crate::db::models::Student;
use crate::repositories;
use crate::services::csv::write_row;
use crate::services::error::RecordError;
use crate::services::students;

const STUDENT_COLUMNS: [&str; 8] =
    ["Name", "Roll Number", "Email", "Phone", "Marks", "Grade", "City", "State"];
const ATTENDANCE_COLUMNS: [&str; 6] =
    ["Student", "Roll Number", "Course", "Date", "Status", "Remarks"];
pub(crate) const STUDENT_SHEET_NAME: &str = "Students";

/// A single worksheet rendered as JSON: a header row plus typed cells.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SheetTable {
    pub(crate) sheet: &'static str,
    pub(crate) columns: Vec<&'static str>,
    pub(crate) rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReportLine {
    pub(crate) label: &'static str,
    pub(crate) value: String,
}

/// Whole floats keep one decimal place, so 85 prints as `85.0`.
pub(crate) fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn header(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|column| column.to_string()).collect()
}

fn student_row(student: &Student) -> Vec<String> {
    vec![
        student.name.clone(),
        student.roll_number.to_string(),
        student.email.clone(),
        student.phone.clone().unwrap_or_default(),
        format_decimal(student.marks),
        student.grade.as_str().to_string(),
        student.city.clone().unwrap_or_default(),
        student.state.clone().unwrap_or_default(),
    ]
}

pub(crate) async fn students_csv(pool: &SqlitePool) -> Result<String, RecordError> {
    let students = repositories::students::list_all_active(pool).await?;

    let mut out = String::new();
    write_row(&mut out, &header(&STUDENT_COLUMNS));
    for student in &students {
        write_row(&mut out, &student_row(student));
    }

    tracing::debug!(rows = students.len(), "Student CSV exported");
    Ok(out)
}

pub(crate) async fn students_sheet(pool: &SqlitePool) -> Result<SheetTable, RecordError> {
    let students = repositories::students::list_all_active(pool).await?;

    let mut columns = STUDENT_COLUMNS.to_vec();
    columns.push("Created At");
    let rows = students
        .iter()
        .map(|student| {
            vec![
                Value::from(student.name.as_str()),
                Value::from(student.roll_number),
                Value::from(student.email.as_str()),
                Value::from(student.phone.as_deref().unwrap_or("")),
                Value::from(student.marks),
                Value::from(student.grade.as_str()),
                Value::from(student.city.as_deref().unwrap_or("")),
                Value::from(student.state.as_deref().unwrap_or("")),
                Value::from(format_export_timestamp(student.created_at)),
            ]
        })
        .collect();

    Ok(SheetTable { sheet: STUDENT_SHEET_NAME, columns, rows })
}

pub(crate) async fn attendance_csv(pool: &SqlitePool) -> Result<String, RecordError> {
    let records = repositories::attendance::list_all(pool).await?;

    let mut out = String::new();
    write_row(&mut out, &header(&ATTENDANCE_COLUMNS));
    for record in &records {
        write_row(
            &mut out,
            &[
                record.student_name.clone(),
                record.student_roll_number.to_string(),
                record.course_name.clone().unwrap_or_default(),
                format_date(record.attendance.date),
                record.attendance.status.label().to_string(),
                record.attendance.remarks.clone().unwrap_or_default(),
            ],
        );
    }

    tracing::debug!(rows = records.len(), "Attendance CSV exported");
    Ok(out)
}

pub(crate) async fn student_report(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<(Student, Vec<ReportLine>), RecordError> {
    let student = students::get(pool, student_id).await?;
    let attendance = students::attendance_percentage(pool, student_id).await?;

    let lines = vec![
        ReportLine { label: "Name", value: student.name.clone() },
        ReportLine { label: "Roll Number", value: student.roll_number.to_string() },
        ReportLine { label: "Email", value: student.email.clone() },
        ReportLine {
            label: "Phone",
            value: student.phone.clone().unwrap_or_else(|| "N/A".to_string()),
        },
        ReportLine {
            label: "Class",
            value: student.class_name.clone().unwrap_or_else(|| "N/A".to_string()),
        },
        ReportLine { label: "Marks", value: format!("{}%", format_decimal(student.marks)) },
        ReportLine { label: "Grade", value: student.grade.as_str().to_string() },
        ReportLine { label: "Attendance", value: format!("{}%", format_decimal(attendance)) },
    ];

    Ok((student, lines))
}

#[cfg(test)]
mod tests {
    use super::format_decimal;

    #[test]
    fn format_decimal_keeps_one_place_for_whole_numbers() {
        assert_eq!(format_decimal(85.0), "85.0");
        assert_eq!(format_decimal(72.5), "72.5");
        assert_eq!(format_decimal(0.0), "0.0");
        assert_eq!(format_decimal(66.67), "66.67");
    }
}
