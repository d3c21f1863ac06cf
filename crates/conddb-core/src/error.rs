use conddb_backend::BackendError;
use thiserror::Error;

/// Everything a conditions query can fail with.
#[derive(Debug, Error)]
pub enum CondDbError {
    /// Malformed caller input, detected before touching the backend.
    #[error("usage error: {0}")]
    Usage(String),

    #[error("revision not found: {spec}")]
    RevisionNotFound { spec: String },

    /// The revision names a blob, or a label over anything but a checkpoint.
    #[error("revision {spec:?} has an unusable type: {found}")]
    InvalidRevisionType { spec: String, found: String },

    #[error("path not found: {path}")]
    PathNotFound { path: String },

    #[error("path {path:?} is a directory and directory content is not allowed")]
    DirectoryNotAllowed { path: String },

    #[error("connection is pinned to tag {pinned:?}, cannot query tag {requested:?}")]
    TagMismatch { pinned: String, requested: String },

    /// The connection was used after `close()`.
    #[error("{operation} called on a closed connection")]
    Lifecycle { operation: &'static str },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl CondDbError {
    /// Process exit status for a command that failed with this error.
    ///
    /// Native backend errors exit with their own code truncated to a status
    /// byte; every other kind has a fixed code. `0` is never returned.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 1,
            Self::RevisionNotFound { .. } => 2,
            Self::InvalidRevisionType { .. } => 3,
            Self::PathNotFound { .. } => 4,
            Self::DirectoryNotAllowed { .. } => 5,
            Self::TagMismatch { .. } => 6,
            Self::Lifecycle { .. } => 7,
            Self::Backend(BackendError::Native { code, .. }) => match code.rem_euclid(256) {
                0 | 1 => 8,
                status => status,
            },
            Self::Backend(_) => 8,
        }
    }
}

pub type CondDbResult<T> = Result<T, CondDbError>;
