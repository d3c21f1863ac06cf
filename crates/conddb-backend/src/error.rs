use conddb_refs::RefError;
use conddb_store::{ObjectKind, StoreError};
use conddb_types::{ObjectId, TypeError};

/// Errors reported by a backend.
///
/// Native errors keep the backend's own class, code and message verbatim so
/// operators can match them against the backend's documentation.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Error raised by the native object database.
    #[error("{class} error ({code}): {message}")]
    Native {
        class: String,
        code: i32,
        message: String,
    },

    /// The repository could not be opened.
    #[error("cannot open repository at {location}: {reason}")]
    Connect { location: String, reason: String },

    /// A referenced object does not exist.
    #[error("object not found: {0}")]
    MissingObject(ObjectId),

    /// An object was read as the wrong kind.
    #[error("object {id} is a {actual}, expected a {expected}")]
    WrongKind {
        id: ObjectId,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    /// The native store reported an object kind outside the known set.
    #[error("unrecognized object kind for {id}: {kind}")]
    UnrecognizedKind { id: ObjectId, kind: String },

    /// A tree entry carries a mode outside the known set.
    #[error("unrecognized tree entry {name:?} with mode {mode:o}")]
    UnrecognizedEntry { name: String, mode: u32 },

    /// A short id matched more than one object.
    #[error("ambiguous revision {spec:?}: {candidates} objects match")]
    Ambiguous { spec: String, candidates: usize },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("ref error: {0}")]
    Ref(#[from] RefError),

    #[error("invalid object id: {0}")]
    Id(#[from] TypeError),
}

impl BackendError {
    /// Short class name of the error, for diagnostics.
    pub fn class(&self) -> &str {
        match self {
            Self::Native { class, .. } => class,
            Self::Connect { .. } => "repository",
            Self::MissingObject(_) | Self::WrongKind { .. } | Self::UnrecognizedKind { .. } => {
                "object"
            }
            Self::UnrecognizedEntry { .. } => "tree",
            Self::Ambiguous { .. } => "revparse",
            Self::Store(_) => "store",
            Self::Ref(_) => "reference",
            Self::Id(_) => "id",
        }
    }

    /// Native error code; `-1` for errors without one.
    pub fn code(&self) -> i32 {
        match self {
            Self::Native { code, .. } => *code,
            _ => -1,
        }
    }
}

/// Result alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
