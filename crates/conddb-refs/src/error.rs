use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefError {
    #[error("{name:?} is not a usable ref name: {reason}")]
    InvalidName { name: String, reason: String },

    /// Tags are written once; moving one is refused.
    #[error("tag {name} already exists")]
    TagImmutable { name: String },

    #[error("ref table lock poisoned: {0}")]
    Poisoned(String),
}

pub type Result<T> = std::result::Result<T, RefError>;
