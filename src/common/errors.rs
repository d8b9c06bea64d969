//! Request-scoped errors. Each one is reported to the peer that caused it
//! and never ends the process.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::ui::web;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("multiple files found, only expected one file. start ruff with -m for multiple file uploads.")]
    MultipleFiles,

    #[error("upload stalled: no data received for {0} seconds")]
    Timeout(u64),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::MultipleFiles => StatusCode::BAD_REQUEST,
            AppError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            AppError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
            AppError::Io(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::MultipleFiles => "multiple_files",
            AppError::Timeout(_) => "timeout",
            AppError::Io(_) => "io",
            AppError::Internal(_) => "internal",
        }
    }

    /// Log the error and render its HTML page with `status` on the wire.
    ///
    /// Severity follows [`AppError::status`] even when the page goes out with
    /// a different status.
    pub fn into_page(self, status: StatusCode) -> Response {
        if self.status().is_server_error() {
            tracing::error!(kind = self.kind(), "request failed: {:#}", self);
        } else {
            tracing::warn!(kind = self.kind(), "request rejected: {}", self);
        }

        let body = web::render_error(&self.to_string());
        (status, web::hardening_headers(), axum::response::Html(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        self.into_page(status)
    }
}
