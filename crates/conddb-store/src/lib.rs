//! Content-addressed storage for conditions snapshots.
//!
//! Payloads are kept as [`StoredObject`]s keyed by a BLAKE3 [`ObjectId`]
//! computed by [`ContentHasher`]. Four kinds exist: [`Blob`] for condition
//! payloads, [`Tree`] for directories, [`CommitObject`] for checkpoints and
//! [`TagObject`] for annotated labels. Typed objects encode to JSON.
//!
//! [`ObjectStore`] is the storage seam; [`InMemoryObjectStore`] is the only
//! implementation, used by the in-memory backend.
//!
//! [`ObjectId`]: conddb_types::ObjectId

pub mod error;
pub mod hasher;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use hasher::ContentHasher;
pub use memory::InMemoryObjectStore;
pub use object::{
    Blob, CommitObject, EntryKind, EntryMode, ObjectKind, StoredObject, TagObject, Tree,
    TreeEntry,
};
pub use traits::ObjectStore;
