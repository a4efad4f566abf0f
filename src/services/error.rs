use thiserror::Error;

/// Failure of a domain write or lookup.
#[derive(Debug, Error)]
pub(crate) enum RecordError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("{field}: {message}")]
    Conflict { field: &'static str, message: String },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl RecordError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { field, message: message.into() }
    }

    pub(crate) fn conflict(field: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict { field, message: message.into() }
    }

    pub(crate) fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } | Self::Conflict { field, .. } => Some(*field),
            Self::NotFound(_) | Self::Database(_) => None,
        }
    }

    /// Maps integrity violations raised by the store onto the same errors the
    /// pre-checks produce, so a lost race still names the field.
    pub(crate) fn from_store(err: sqlx::Error) -> Self {
        let sqlx::Error::Database(db_err) = &err else {
            return Self::Database(err);
        };

        let message = db_err.message().to_string();
        if db_err.is_unique_violation() {
            let field = unique_field(&message);
            return Self::conflict(field, format!("a record with this {field} already exists"));
        }
        if db_err.is_foreign_key_violation() {
            return Self::validation("reference", "referenced record does not exist");
        }
        if db_err.is_check_violation() {
            return Self::validation(check_field(&message), "value is out of the allowed range");
        }

        Self::Database(err)
    }
}

const KNOWN_FIELDS: &[&str] = &[
    "roll_number",
    "email",
    "code",
    "username",
    "marks",
    "final_marks",
    "marks_obtained",
    "credits",
    "total_marks",
    "grade",
    "gender",
    "status",
];

/// SQLite reports `UNIQUE constraint failed: students.email` for column
/// constraints and `... index 'uq_attendance_key'` for expression indexes.
fn unique_field(message: &str) -> &'static str {
    if message.contains("uq_attendance_key") {
        return "date";
    }
    if message.contains("enrollments.student_id") {
        return "course_id";
    }
    if message.contains("submissions.assignment_id") {
        return "student_id";
    }

    let columns = message.rsplit(':').next().unwrap_or_default();
    columns
        .split(',')
        .filter_map(|column| column.trim().rsplit('.').next())
        .find_map(|column| KNOWN_FIELDS.iter().find(|known| **known == column).copied())
        .unwrap_or("id")
}

fn check_field(message: &str) -> &'static str {
    // Longest names first so `final_marks` is not reported as `marks`.
    let mut candidates = KNOWN_FIELDS.to_vec();
    candidates.sort_by_key(|field| std::cmp::Reverse(field.len()));
    candidates.into_iter().find(|field| message.contains(field)).unwrap_or("value")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_field_reads_sqlite_messages() {
        assert_eq!(unique_field("UNIQUE constraint failed: students.email"), "email");
        assert_eq!(unique_field("UNIQUE constraint failed: students.roll_number"), "roll_number");
        assert_eq!(unique_field("UNIQUE constraint failed: courses.code"), "code");
        assert_eq!(
            unique_field(
                "UNIQUE constraint failed: enrollments.student_id, enrollments.course_id"
            ),
            "course_id"
        );
        assert_eq!(unique_field("UNIQUE constraint failed: index 'uq_attendance_key'"), "date");
        assert_eq!(unique_field("UNIQUE constraint failed: students.id"), "id");
    }

    #[test]
    fn check_field_prefers_longest_match() {
        assert_eq!(
            check_field("CHECK constraint failed: final_marks IS NULL OR (final_marks >= 0)"),
            "final_marks"
        );
        assert_eq!(check_field("CHECK constraint failed: marks >= 0 AND marks <= 100"), "marks");
        assert_eq!(check_field("CHECK constraint failed: something"), "value");
    }
}
