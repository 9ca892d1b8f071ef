/// Unified error handling module
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error payload returned to clients
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    /// HTTP status of the upstream NASA response, when one was received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or out-of-range request parameter
    #[error("{0}")]
    InvalidInput(String),

    /// No data available for an otherwise valid request
    #[error("{0}")]
    NotFound(String),

    /// Upstream NASA API answered with a non-2xx status
    #[error("{api} upstream error")]
    Upstream { api: &'static str, status: u16 },

    /// Upstream answered 2xx but the payload is not the documented shape
    #[error("{0}")]
    InvalidResponse(String),

    /// Network failure or body decode failure while talking upstream
    #[error("External API error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Re-decoding an already-fetched payload failed
    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Upstream { .. } => "UPSTREAM_ERROR",
            ApiError::InvalidResponse(_) => "INVALID_RESPONSE",
            ApiError::Transport(_) => "FETCH_FAILED",
            ApiError::Decode(_) => "DECODE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn http_status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { .. } | ApiError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let http_status = self.http_status();
        let (status, details) = match &self {
            ApiError::Upstream { status, .. } => (Some(*status), None),
            ApiError::Transport(e) => (None, Some(e.to_string())),
            ApiError::Decode(e) => (None, Some(e.to_string())),
            _ => (None, None),
        };

        if http_status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        } else {
            tracing::warn!(code = self.code(), error = %self, "request rejected");
        }

        let body = ErrorBody {
            error: self.to_string(),
            code: self.code(),
            status,
            details,
        };
        (http_status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
