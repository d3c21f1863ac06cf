//! Failures of the object store layer.

use conddb_types::ObjectId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no object {0} in store")]
    NotFound(ObjectId),

    /// A payload could not be encoded to, or decoded from, JSON.
    #[error("cannot encode or decode object payload: {0}")]
    Serialization(String),

    /// The payload exists but is not the object the caller asked for.
    #[error("object {id} is unreadable: {reason}")]
    CorruptObject { id: ObjectId, reason: String },

    #[error("refusing to store an object whose id is null")]
    NullObjectId,
}

pub type StoreResult<T> = Result<T, StoreError>;
