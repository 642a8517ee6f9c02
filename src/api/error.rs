//! HTTP error responses.
//!
//! Every failure becomes `{ "error": <message>, "kind": <tag> }` with a status
//! derived from the lifecycle error kind. Client mistakes are logged at
//! debug, server faults at warn or error.

use crate::jobs::{ErrorKind, LifecycleError};
use crate::types::ErrorBody;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    /// Worker task panicked or the transform semaphore closed.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Lifecycle(err) => match err.kind() {
                ErrorKind::InvalidCropSpec | ErrorKind::InvalidUpload => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::DecodeFailure
                | ErrorKind::UnsupportedFormat
                | ErrorKind::StorageFailure
                | ErrorKind::CleanupFailure => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Lifecycle(err) => err.kind().as_str(),
            ApiError::Internal(_) => "internal",
        }
    }

    fn log(&self) {
        let kind = self.kind();
        match self {
            ApiError::Lifecycle(err) if err.is_client_error() => {
                tracing::debug!(error = %self, kind, "Request rejected");
            }
            ApiError::Lifecycle(LifecycleError::CleanupFailure { .. }) => {
                tracing::warn!(error = %self, kind, "Request partially failed");
            }
            _ => {
                tracing::error!(error = %self, kind, "Request failed");
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
