use serde::{Deserialize, Serialize};

use archived_store::StoreError;
use archived_types::TypeError;

/// Stable, machine-readable error classes reported to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MalformedName,
    InvalidName,
    NotFound,
    AlreadyExists,
    InvalidImageFormat,
    KindMismatch,
    MoveIntoSelf,
    RootPath,
    Config,
    Io,
    Internal,
}

impl ErrorCode {
    /// HTTP status used when this error is returned over HTTP.
    pub fn http_status(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::AlreadyExists => 409,
            Self::MalformedName
            | Self::InvalidName
            | Self::InvalidImageFormat
            | Self::KindMismatch
            | Self::MoveIntoSelf
            | Self::RootPath => 400,
            Self::Config | Self::Io | Self::Internal => 500,
        }
    }
}

impl From<&StoreError> for ErrorCode {
    fn from(err: &StoreError) -> Self {
        match err {
            StoreError::MalformedName { .. } => Self::MalformedName,
            StoreError::InvalidName { .. } => Self::InvalidName,
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::AlreadyExists(_) => Self::AlreadyExists,
            StoreError::InvalidImageFormat(_) => Self::InvalidImageFormat,
            StoreError::KindMismatch { .. } => Self::KindMismatch,
            StoreError::MoveIntoSelf(_) => Self::MoveIntoSelf,
            StoreError::RootPath => Self::RootPath,
            StoreError::Config(_) => Self::Config,
            StoreError::Io { .. } => Self::Io,
        }
    }
}

impl From<&TypeError> for ErrorCode {
    fn from(err: &TypeError) -> Self {
        match err {
            TypeError::MalformedName { .. } => Self::MalformedName,
            TypeError::InvalidName { .. } => Self::InvalidName,
            TypeError::InvalidImageFormat(_) => Self::InvalidImageFormat,
        }
    }
}

/// JSON body of every error response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&StoreError> for ErrorBody {
    fn from(err: &StoreError) -> Self {
        Self::new(err.into(), err.to_string())
    }
}
