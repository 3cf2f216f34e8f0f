use std::io;
use std::path::{Path, PathBuf};

use archived_types::{EntryKind, TypeError};

/// Errors from archive operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A directory name does not decode where a decodable one was required.
    #[error("malformed entry name {name:?}: {reason}")]
    MalformedName { name: String, reason: String },

    /// The id or a tag of a new entry breaks the naming rules.
    #[error("invalid entry name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Nothing exists at the resolved path.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The target of a create or move is already taken.
    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Image format outside the supported set.
    #[error("invalid image format: {0}")]
    InvalidImageFormat(String),

    /// The operation would put an entry where a different kind is required.
    #[error("expected a {expected}, found a {found}")]
    KindMismatch { expected: EntryKind, found: EntryKind },

    /// A container cannot be moved below itself.
    #[error("cannot move {} into its own subtree", .0.display())]
    MoveIntoSelf(PathBuf),

    /// Move and Delete cannot target the archive root.
    #[error("operation not permitted on the archive root")]
    RootPath,

    /// The archive root is unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Any other filesystem failure.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Classify a filesystem error raised while operating on `path`.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::AlreadyExists => Self::AlreadyExists(path),
            _ => Self::Io { path, source },
        }
    }

    /// Rewrite the filesystem path carried by this error relative to `root`,
    /// so it can be shown to clients without exposing the host layout. The
    /// root itself becomes `.`; paths outside `root` are kept.
    pub fn relative_to(self, root: &Path) -> Self {
        let strip = |path: PathBuf| match path.strip_prefix(root).ok().map(Path::to_path_buf) {
            Some(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
            Some(rel) => rel,
            None => path,
        };
        match self {
            Self::NotFound(path) => Self::NotFound(strip(path)),
            Self::AlreadyExists(path) => Self::AlreadyExists(strip(path)),
            Self::MoveIntoSelf(path) => Self::MoveIntoSelf(strip(path)),
            Self::Io { path, source } => Self::Io {
                path: strip(path),
                source,
            },
            other => other,
        }
    }
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::MalformedName { name, reason } => Self::MalformedName { name, reason },
            TypeError::InvalidName { name, reason } => Self::InvalidName { name, reason },
            TypeError::InvalidImageFormat(msg) => Self::InvalidImageFormat(msg),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
