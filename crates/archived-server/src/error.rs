use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

use archived_protocol::{ErrorBody, ErrorCode};
use archived_store::StoreError;
use archived_types::TypeError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Request(#[from] TypeError),

    #[error("entry has no image: {0}")]
    NoImage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Store(e) => e.into(),
            Self::Request(e) => e.into(),
            Self::NoImage(_) => ErrorCode::NotFound,
            Self::Config(_) => ErrorCode::Config,
            Self::Io(_) => ErrorCode::Io,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status =
            StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(ErrorBody::new(code, self.to_string()))).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
