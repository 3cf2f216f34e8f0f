use thiserror::Error;

/// Errors produced by name decoding and entry validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// A directory name does not follow the `<id>[.<tag>...].<kind>` grammar.
    #[error("malformed entry name {name:?}: {reason}")]
    MalformedName { name: String, reason: String },

    /// An id or tag cannot be used to build a new entry name.
    #[error("invalid entry name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// An image format outside the supported set, or image data without one.
    #[error("invalid image format: {0}")]
    InvalidImageFormat(String),
}
