use conddb_store::{ObjectKind, TreeEntry};
use conddb_types::{ObjectId, TimePoint};

use crate::error::BackendResult;

/// A checkpoint as seen by the query core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    /// The checkpoint's own id.
    pub id: ObjectId,
    /// Root tree of the snapshot it records.
    pub snapshot: ObjectId,
    /// Parent checkpoints, first parent first.
    pub parents: Vec<ObjectId>,
    /// Position on the time axis.
    pub time: TimePoint,
}

impl Checkpoint {
    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }
}

/// An annotated label as seen by the query core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    /// The single object this label points at.
    pub target: ObjectId,
}

/// Read-only access to a version-controlled object graph.
///
/// Every returned value is owned: nothing handed out borrows from backend
/// handles, so callers may hold results across later calls.
pub trait Backend: Send {
    /// Where this backend reads from, for logs and diagnostics.
    fn location(&self) -> &str;

    /// Resolve a revision specifier to an object id.
    ///
    /// Returns `Ok(None)` if the specifier names nothing.
    fn resolve_revision(&self, spec: &str) -> BackendResult<Option<ObjectId>>;

    /// The kind of an existing object.
    fn kind_of(&self, id: &ObjectId) -> BackendResult<ObjectKind>;

    /// Read a checkpoint (commit) object.
    fn read_checkpoint(&self, id: &ObjectId) -> BackendResult<Checkpoint>;

    /// Read a label (annotated tag) object.
    fn read_label(&self, id: &ObjectId) -> BackendResult<Label>;

    /// Immediate children of a tree, in backend order.
    fn list_children(&self, tree: &ObjectId) -> BackendResult<Vec<TreeEntry>>;

    /// Content of a leaf object.
    fn read_leaf(&self, id: &ObjectId) -> BackendResult<Vec<u8>>;
}

/// Backends that can be opened from a location string.
pub trait Connect: Backend + Sized {
    fn connect(location: &str) -> BackendResult<Self>;
}
