//! HTTP error responses.
//!
//! Every failed request that is not a plain webhook acknowledgement answers
//! with `{"error": <message>, "code": <CODE>}`, plus `details` when there is
//! something machine-readable to add, under the status of its code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rowcall_core::{RowcallError, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

// ============================================================================
// ERROR CODE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A field is present but its value is unusable.
    ValidationFailed,
    /// The body could not be parsed at all.
    InvalidInput,
    MissingField,
    /// Reading or writing the task list failed.
    StoreUnavailable,
    InternalError,
}

impl ErrorCode {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationFailed | ErrorCode::InvalidInput | ErrorCode::MissingField => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::StoreUnavailable | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "error")]
    pub message: String,
    pub code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            details: None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    /// Name the offending field in `details`.
    fn for_field(mut self, field: &str) -> Self {
        self.details = Some(json!({ "field": field }));
        self
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
        .for_field(field)
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreUnavailable, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::RequiredFieldMissing { field } => ApiError::missing_field(field),
            ValidationError::InvalidValue { field, .. } => {
                ApiError::new(ErrorCode::ValidationFailed, err.to_string()).for_field(field)
            }
        }
    }
}

impl From<RowcallError> for ApiError {
    fn from(err: RowcallError) -> Self {
        match err {
            RowcallError::Validation(e) => e.into(),
            RowcallError::Store(e) => ApiError::store_unavailable(e.to_string()),
            RowcallError::Provider(e) => ApiError::internal_error(e.to_string()),
            RowcallError::Config(e) => ApiError::internal_error(e.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
