use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

pub const RELAY_FAILURE_MESSAGE: &str = "Error proxying image";

/// The closed set of failure kinds callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    UpstreamFailure,
    UpstreamTimeout,
    RelayFailure,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    /// A client error like `Validation`, answered with 413.
    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    UpstreamFailure(String),

    #[error("{0}")]
    UpstreamTimeout(String),

    /// The detail is logged but never sent to the client.
    #[error("Error proxying image: {0}")]
    RelayFailure(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamFailure(message.into())
    }

    /// An upstream failure with the provider's own message appended when one
    /// was returned.
    pub fn upstream_with_detail(message: &str, detail: Option<&str>) -> Self {
        match detail.map(str::trim).filter(|d| !d.is_empty()) {
            Some(detail) => Self::UpstreamFailure(format!("{message}: {detail}")),
            None => Self::UpstreamFailure(message.to_string()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) | AppError::PayloadTooLarge(_) => ErrorKind::Validation,
            AppError::UpstreamFailure(_) => ErrorKind::UpstreamFailure,
            AppError::UpstreamTimeout(_) => ErrorKind::UpstreamTimeout,
            AppError::RelayFailure(_) => ErrorKind::RelayFailure,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        if let AppError::PayloadTooLarge(_) = self {
            return StatusCode::PAYLOAD_TOO_LARGE;
        }
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::UpstreamFailure | ErrorKind::UpstreamTimeout | ErrorKind::RelayFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Validation(message) | AppError::PayloadTooLarge(message) => {
                tracing::warn!("Rejected request: {}", message)
            }
            other => tracing::error!(kind = ?other.kind(), "Request failed: {}", other),
        }

        match self {
            AppError::RelayFailure(_) => (
                status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                RELAY_FAILURE_MESSAGE,
            )
                .into_response(),
            AppError::Validation(message)
            | AppError::PayloadTooLarge(message)
            | AppError::UpstreamFailure(message)
            | AppError::UpstreamTimeout(message) => {
                (status, Json(ErrorResponse::new(message))).into_response()
            }
        }
    }
}
