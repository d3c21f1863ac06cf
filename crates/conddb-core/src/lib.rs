//! Query core of the conditions database.
//!
//! A query names a revision (branch, tag or object id), a path inside the
//! snapshot that revision resolves to, and optionally a point in time. The
//! core turns that into content plus the Interval Of Validity over which
//! the content holds.
//!
//! # Components
//!
//! - [`RevisionResolver`] -- revision specifier to snapshot, peeling one
//!   label level
//! - [`TreeWalker`] -- deterministic pre-order traversal into a [`PathIndex`]
//! - [`ContentResolver`] -- on-demand path lookup with a [`DirectoryPolicy`]
//!   for paths that are not leaves
//! - [`IntervalIndex`] -- intervals of validity and change boundaries along
//!   first-parent history
//! - [`Connection`] -- owns one backend handle and orchestrates the above
//! - [`ResourceDb`] -- tag-pinned, leaf-only facade over a connection
//!
//! # Example
//!
//! ```
//! use conddb_backend::{MemoryBackend, SnapshotBuilder};
//! use conddb_core::{Connection, Content};
//! use conddb_types::{ConditionKey, Iov};
//!
//! let backend = MemoryBackend::new();
//! let mut snap = SnapshotBuilder::new();
//! snap.file("tracker/gas/pressure", "1013");
//! backend.commit("main", &snap, 50, "initial").unwrap();
//! snap.file("tracker/gas/pressure", "990");
//! backend.commit("main", &snap, 200, "update").unwrap();
//!
//! let conn = Connection::with_backend(backend, Some("main".into()));
//! let value = conn.get(&ConditionKey::path("tracker/gas/pressure").at(100)).unwrap();
//! assert_eq!(value.content, Content::Leaf(b"1013".to_vec()));
//! assert_eq!(value.iov, Iov::new(50, 200).unwrap());
//! ```

pub mod config;
pub mod connection;
pub mod content;
pub mod error;
pub mod interval;
pub mod resolver;
pub mod resource;
pub mod walker;

#[cfg(test)]
mod testing;

pub use config::{ConnectionConfig, DirectoryMode};
pub use connection::{Connection, Value};
pub use content::{
    locate, Content, ContentResolver, Directory, DirectoryPolicy, JsonDirectories,
    ListDirectories, Located, RejectDirectories,
};
pub use error::{CondDbError, CondDbResult};
pub use interval::{Change, IntervalIndex, Validity};
pub use resolver::{Revision, RevisionKind, RevisionResolver};
pub use resource::ResourceDb;
pub use walker::{PathIndex, TreeWalker};
