//! API error types and error response payloads.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use outcurr_core::FacultyServiceError;
use serde::Serialize;

/// Error detail carried in every non-2xx JSON body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Stable error code identifier.
    pub error_code: String,
    /// Human readable message.
    pub message: String,
}

/// Error response wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body or parameters are invalid.
    #[error("{message}")]
    BadRequest { message: String },
    /// Bearer token missing or invalid.
    #[error("{message}")]
    Unauthorized { message: String },
    #[error("{message}")]
    NotFound { message: String },
    /// Path exists but not for this verb.
    #[error("{message}")]
    MethodNotAllowed { message: String },
    /// Request collides with stored state.
    #[error("{message}")]
    Conflict { message: String },
    /// Timed out waiting for the faculty store; nothing was written.
    #[error("{message}")]
    ServiceUnavailable { message: String },
    #[error("{message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status this error is surfaced as.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the payload.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            Self::Conflict { .. } => "CONFLICT",
            Self::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            Self::Internal { .. } => "INTERNAL",
        }
    }

    fn to_payload(&self) -> ApiErrorResponse {
        ApiErrorResponse {
            error: ApiErrorDetail {
                error_code: self.error_code().to_string(),
                message: self.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), axum::Json(self.to_payload())).into_response()
    }
}

impl From<FacultyServiceError> for ApiError {
    fn from(value: FacultyServiceError) -> Self {
        match value {
            FacultyServiceError::Validation(_) | FacultyServiceError::InvalidPage(_) => {
                Self::bad_request(value.to_string())
            }
            FacultyServiceError::NameTaken(_) => Self::Conflict {
                message: value.to_string(),
            },
            FacultyServiceError::FacultyNotFound(_) => Self::not_found(value.to_string()),
            FacultyServiceError::Repo(err) => {
                // Storage details stay in the log; callers get a generic message.
                error!("event=storage_failure module=api status=error error={err}");
                Self::internal("faculty store failure")
            }
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use outcurr_core::{FacultyValidationError, RepoError};

    #[test]
    fn service_errors_map_to_expected_statuses() {
        let cases = [
            (
                FacultyServiceError::Validation(FacultyValidationError::EmptyBatch),
                StatusCode::BAD_REQUEST,
            ),
            (
                FacultyServiceError::InvalidPage("size must be at least 1".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                FacultyServiceError::NameTaken("Law".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                FacultyServiceError::FacultyNotFound(999_999),
                StatusCode::NOT_FOUND,
            ),
            (
                FacultyServiceError::Repo(RepoError::InvalidData("bad row".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (service_error, expected) in cases {
            assert_eq!(ApiError::from(service_error).status(), expected);
        }
    }

    #[test]
    fn internal_errors_do_not_leak_storage_details() {
        let err = ApiError::from(FacultyServiceError::Repo(RepoError::InvalidData(
            "faculty 7 has invalid name".to_string(),
        )));
        assert!(!err.to_string().contains("faculty 7"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
