use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use compose::ComposeError;
use stack_core::{Envelope, ErrorKind};
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a stack operation.
///
/// Every variant is answered with an error [`Envelope`] and HTTP 200; clients
/// inspect the envelope's `status`, never the transport status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error("Pull failed: {0}")]
    PullFailed(#[source] ComposeError),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Compose(err) => err.kind(),
            AppError::PullFailed(err @ (ComposeError::Timeout { .. } | ComposeError::Spawn { .. })) => {
                err.kind()
            }
            AppError::PullFailed(_) => ErrorKind::PullFailed,
            AppError::UnknownService(_) => ErrorKind::UnknownService,
            AppError::Io { .. } => ErrorKind::Io,
        }
    }

    pub fn to_envelope(&self) -> Envelope {
        Envelope::error(self.kind(), self.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::UnknownService(name) => {
                tracing::warn!(service = %name, "Rejected logs request for unknown service")
            }
            err => tracing::error!(kind = ?err.kind(), "Stack operation failed: {}", err),
        }

        (StatusCode::OK, Json(self.to_envelope())).into_response()
    }
}
