//! Object-store backends for the conditions database.
//!
//! The query core never touches storage directly. Everything it needs from
//! a version-controlled object graph is captured by the [`Backend`] trait:
//! resolve a revision string, classify an object, read a checkpoint or a
//! label, list a tree, read a leaf. Backends never mutate history on behalf
//! of the core.
//!
//! # Backends
//!
//! - [`MemoryBackend`] -- content-addressed in-memory store plus refs; also
//!   exposes a write side ([`SnapshotBuilder`], commits, tags) for building
//!   histories in tests and embeddings
//! - [`GitBackend`] -- an on-disk git repository read through libgit2
//!
//! # Process-wide runtime
//!
//! [`RuntimeGuard`] reference-counts the process-wide backend runtime so it
//! is initialized before the first connection and torn down after the last.

pub mod builder;
pub mod error;
pub mod git;
pub mod memory;
pub mod runtime;
pub mod traits;

pub use builder::SnapshotBuilder;
pub use error::{BackendError, BackendResult};
pub use git::GitBackend;
pub use memory::MemoryBackend;
pub use runtime::RuntimeGuard;
pub use traits::{Backend, Checkpoint, Connect, Label};

// Re-export the object model the trait speaks in.
pub use conddb_store::{EntryKind, EntryMode, ObjectKind, TreeEntry};
