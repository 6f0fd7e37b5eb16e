//! API error types

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lepasserelle::{ErrorKind, PipelineError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API error with HTTP status code
#[derive(Debug, Clone, Serialize, Error)]
pub struct ApiError {
    /// HTTP status code
    #[serde(skip)]
    pub status: StatusCode,

    /// Error message
    pub message: String,

    /// Error code for client handling
    pub code: String,
}

impl ApiError {
    /// Create a new API error with code
    pub fn with_code(
        status: StatusCode,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code(
            StatusCode::BAD_REQUEST,
            message,
            ErrorKind::InvalidInput.code(),
        )
    }

    /// 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_code(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            "INTERNAL_ERROR",
        )
    }
}

/// HTTP status for each pipeline failure kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::ScoringFailed => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::GenerationUnavailable | ErrorKind::GraphStoreUnavailable => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ErrorKind::NoJsonFound | ErrorKind::MalformedJson | ErrorKind::InvalidRoadmap => {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        let kind = err.kind();
        let status = status_for(kind);
        if status.is_server_error() {
            error!("Request failed [{}]: {}", kind, err);
        } else {
            warn!("Request rejected [{}]: {}", kind, err);
        }
        Self::with_code(status, err.detail(), kind.code())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        Self::bad_request(rejection.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{:?}] [{}] {}", self.status, self.code, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.message,
            "code": self.code,
        }));

        (self.status, body).into_response()
    }
}
