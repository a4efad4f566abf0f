use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use validator::ValidationErrors;

use crate::services::error::RecordError;
use crate::services::student_import::ImportError;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    detail: String,
    field: Option<String>,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    BadRequest(String),
    Validation { field: String, message: String },
    NotFound(String),
    Conflict { field: String, message: String },
    UnsupportedMediaType(String),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }

    /// Reports the first failing field, by name, of a rejected payload.
    pub(crate) fn from_validation(errors: ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by(|left, right| left.0.cmp(right.0));

        let Some((field, details)) = fields.first() else {
            return Self::BadRequest(errors.to_string());
        };
        let message = details
            .iter()
            .find_map(|detail| detail.message.as_ref().map(|message| message.to_string()))
            .unwrap_or_else(|| format!("{field} is invalid"));
        Self::Validation { field: field.to_string(), message }
    }

    fn parts(self) -> (StatusCode, String, Option<String>) {
        match self {
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.to_string(), None),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            Self::Validation { field, message } => {
                (StatusCode::BAD_REQUEST, message, Some(field))
            }
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            Self::Conflict { field, message } => (StatusCode::CONFLICT, message, Some(field)),
            Self::UnsupportedMediaType(message) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, message, None)
            }
            Self::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, message, None)
            }
        }
    }
}

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Validation { field, message } => {
                Self::Validation { field: field.to_string(), message }
            }
            RecordError::Conflict { field, message } => {
                Self::Conflict { field: field.to_string(), message }
            }
            RecordError::NotFound(entity) => Self::NotFound(format!("{entity} not found")),
            RecordError::Database(err) => Self::internal(err, "Database operation failed"),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::UnsupportedType(_) => Self::UnsupportedMediaType(err.to_string()),
            ImportError::UnsupportedFile(_) | ImportError::TooLarge { .. } | ImportError::Decode => {
                Self::Validation { field: "csv_file".to_string(), message: err.to_string() }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail, field) = self.parts();
        (status, Json(ErrorResponse { status: status.as_u16(), detail, field })).into_response()
    }
}
