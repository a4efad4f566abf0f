use std::collections::HashMap;
use std::path::Path;

use sqlx::SqlitePool;
use thiserror::Error;

use crate::core::config::ImportSettings;
use crate::core::metrics::record_import_row;
use crate::services::actor::Actor;
use crate::services::csv::parse_records;
use crate::services::error::RecordError;
use crate::services::students::{self, StudentDraft};

const ACCEPTED_CONTENT_TYPES: &[&str] = &[
    "text/csv",
    "application/csv",
    "application/vnd.ms-excel",
    "text/plain",
    "application/octet-stream",
];

const BOM: char = '\u{feff}';

/// Failures that reject a whole upload before any row is written.
#[derive(Debug, Error)]
pub(crate) enum ImportError {
    #[error("please upload a CSV file")]
    UnsupportedFile(String),
    #[error("content type '{0}' is not accepted for CSV import")]
    UnsupportedType(String),
    #[error("file size exceeds {limit_mb}MB limit")]
    TooLarge { limit_mb: u64 },
    #[error("file is not valid UTF-8 text")]
    Decode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ImportSummary {
    pub(crate) success_count: usize,
    pub(crate) error_count: usize,
}

pub(crate) fn check_upload(
    filename: &str,
    content_type: Option<&str>,
    size: usize,
    settings: &ImportSettings,
) -> Result<(), ImportError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| ImportError::UnsupportedFile(filename.to_string()))?;
    if !settings.allowed_extensions.iter().any(|allowed| allowed == &extension) {
        return Err(ImportError::UnsupportedFile(filename.to_string()));
    }

    if let Some(content_type) = content_type {
        let mime = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        if !mime.is_empty() && !ACCEPTED_CONTENT_TYPES.contains(&mime.as_str()) {
            return Err(ImportError::UnsupportedType(mime));
        }
    }

    if size > settings.max_upload_bytes() {
        return Err(ImportError::TooLarge { limit_mb: settings.max_upload_size_mb });
    }

    Ok(())
}

pub(crate) fn decode(bytes: &[u8]) -> Result<&str, ImportError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ImportError::Decode)?;
    Ok(text.strip_prefix(BOM).unwrap_or(text))
}

/// Creates one student per data row, in file order. A failing row is counted
/// and skipped; rows already written stay written.
pub(crate) async fn import_students(
    pool: &SqlitePool,
    actor: &Actor,
    text: &str,
) -> ImportSummary {
    let mut records = parse_records(text).into_iter();
    let mut summary = ImportSummary::default();
    let Some(header) = records.next() else {
        return summary;
    };
    let header: Vec<String> = header.into_iter().map(|name| name.trim().to_string()).collect();

    for (index, record) in records.enumerate() {
        let row_number = index + 1;
        let row = RowValues::new(&header, &record);

        let outcome = match row.draft() {
            Ok(draft) => students::create(pool, actor, draft).await.map(|_| ()),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => {
                summary.success_count += 1;
                record_import_row("created");
            }
            Err(err) => {
                summary.error_count += 1;
                record_import_row("failed");
                tracing::warn!(
                    actor = %actor.label(),
                    row = row_number,
                    field = err.field().unwrap_or("-"),
                    error = %err,
                    "Student import row rejected"
                );
            }
        }
    }

    tracing::info!(
        actor = %actor.label(),
        success_count = summary.success_count,
        error_count = summary.error_count,
        "Student import finished"
    );
    summary
}

/// Header-keyed view of one record. Short records leave trailing columns
/// absent; surplus fields are ignored.
struct RowValues<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> RowValues<'a> {
    fn new(header: &'a [String], record: &'a [String]) -> Self {
        let values = header
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        Self { values }
    }

    fn text(&self, column: &str) -> String {
        self.values.get(column).map(|value| value.to_string()).unwrap_or_default()
    }

    fn number<T: std::str::FromStr + Default>(&self, column: &'static str) -> Result<T, RecordError> {
        let raw = self.values.get(column).map(|value| value.trim()).unwrap_or("");
        if raw.is_empty() {
            return Ok(T::default());
        }
        raw.parse::<T>()
            .map_err(|_| RecordError::validation(column, format!("'{raw}' is not a number")))
    }

    fn draft(&self) -> Result<StudentDraft, RecordError> {
        Ok(StudentDraft {
            name: self.text("name"),
            roll_number: self.number::<i64>("roll_number")?,
            email: self.text("email"),
            phone: Some(self.text("phone")),
            marks: self.number::<f64>("marks")?,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ImportSettings {
        ImportSettings { max_upload_size_mb: 1, allowed_extensions: vec!["csv".to_string()] }
    }

    #[test]
    fn check_upload_accepts_csv_with_any_case() {
        assert!(check_upload("roster.CSV", Some("text/csv; charset=utf-8"), 10, &settings()).is_ok());
        assert!(check_upload("roster.csv", None, 10, &settings()).is_ok());
    }

    #[test]
    fn check_upload_rejects_other_extensions_and_types() {
        assert!(matches!(
            check_upload("roster.xlsx", Some("text/csv"), 10, &settings()),
            Err(ImportError::UnsupportedFile(_))
        ));
        assert!(matches!(
            check_upload("roster", None, 10, &settings()),
            Err(ImportError::UnsupportedFile(_))
        ));
        assert!(matches!(
            check_upload("roster.csv", Some("image/png"), 10, &settings()),
            Err(ImportError::UnsupportedType(_))
        ));
    }

    #[test]
    fn check_upload_enforces_size_limit() {
        assert!(matches!(
            check_upload("roster.csv", None, 1024 * 1024 + 1, &settings()),
            Err(ImportError::TooLarge { limit_mb: 1 })
        ));
    }

    #[test]
    fn decode_strips_bom_and_rejects_invalid_utf8() {
        assert_eq!(decode("\u{feff}name\n".as_bytes()).expect("decode"), "name\n");
        assert!(matches!(decode(&[0xff, 0xfe, 0x00]), Err(ImportError::Decode)));
    }

    #[test]
    fn row_values_coerce_blank_numbers_to_zero() {
        let header = vec!["name".to_string(), "roll_number".to_string(), "marks".to_string()];
        let record = vec!["Asha".to_string(), " ".to_string()];
        let draft = RowValues::new(&header, &record).draft().expect("draft");
        assert_eq!(draft.name, "Asha");
        assert_eq!(draft.roll_number, 0);
        assert_eq!(draft.marks, 0.0);
        assert_eq!(draft.email, "");
    }

    #[test]
    fn row_values_reject_non_numeric_marks() {
        let header = vec!["roll_number".to_string(), "marks".to_string()];
        let record = vec!["7".to_string(), "eighty".to_string()];
        let err = RowValues::new(&header, &record).draft().expect_err("non numeric");
        assert_eq!(err.field(), Some("marks"));
    }
}
