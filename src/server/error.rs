//! HTTP 錯誤回應

use crate::utils::error::DashError;
use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum AppError {
    Internal(String),
    BadRequest(String),
    NotFound(String),
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: bool,
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
        };

        let body = ErrorResponse {
            error: true,
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DashError> for AppError {
    fn from(err: DashError) -> Self {
        match err {
            DashError::InvalidFilterError { .. } | DashError::DateParseError { .. } => {
                AppError::BadRequest(err.to_string())
            }
            DashError::UnknownChartError { .. } => AppError::NotFound(err.to_string()),
            other => {
                tracing::error!("❌ Request failed: {}", other);
                AppError::Internal(other.user_friendly_message())
            }
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Invalid query parameters: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_error_mapping() {
        let bad = AppError::from(DashError::invalid_filter("age_min", "not a number"));
        assert!(matches!(bad, AppError::BadRequest(_)));

        let missing = AppError::from(DashError::UnknownChartError {
            name: "sales-funnel".to_string(),
        });
        assert!(matches!(missing, AppError::NotFound(msg) if msg.contains("sales-funnel")));

        let internal = AppError::from(DashError::ProcessingError {
            message: "boom".to_string(),
        });
        assert_eq!(
            internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
