//! Revision specifier to snapshot resolution.

use std::fmt;

use conddb_backend::{Backend, Checkpoint, ObjectKind};
use conddb_types::ObjectId;

use crate::error::{CondDbError, CondDbResult};

/// What a revision specifier named, before any peeling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevisionKind {
    /// A commit: one snapshot plus a place in history.
    Checkpoint,
    /// A tree used directly as a snapshot.
    Snapshot,
    /// An annotated tag pointing at one other object.
    Label,
    /// Anything else, typically a leaf.
    Other(ObjectKind),
}

impl From<ObjectKind> for RevisionKind {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Commit => Self::Checkpoint,
            ObjectKind::Tree => Self::Snapshot,
            ObjectKind::Tag => Self::Label,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for RevisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkpoint => write!(f, "checkpoint"),
            Self::Snapshot => write!(f, "snapshot"),
            Self::Label => write!(f, "label"),
            Self::Other(kind) => write!(f, "{kind}"),
        }
    }
}

/// A revision resolved far enough to read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Revision {
    /// A checkpoint, carrying its history links.
    Checkpoint(Checkpoint),
    /// A bare snapshot with no history.
    Snapshot(ObjectId),
}

impl Revision {
    /// Root tree of the resolved snapshot.
    pub fn snapshot(&self) -> ObjectId {
        match self {
            Self::Checkpoint(cp) => cp.snapshot,
            Self::Snapshot(id) => *id,
        }
    }
}

/// Turns revision specifiers into snapshots.
///
/// A checkpoint yields its snapshot, a snapshot yields itself, and a label
/// is peeled exactly one level: its target must be a checkpoint.
pub struct RevisionResolver<'b, B: ?Sized> {
    backend: &'b B,
}

impl<'b, B: Backend + ?Sized> RevisionResolver<'b, B> {
    pub fn new(backend: &'b B) -> Self {
        Self { backend }
    }

    fn lookup(&self, spec: &str) -> CondDbResult<ObjectId> {
        self.backend
            .resolve_revision(spec)?
            .ok_or_else(|| CondDbError::RevisionNotFound {
                spec: spec.to_string(),
            })
    }

    /// Kind of the object `spec` names, without peeling.
    pub fn inspect(&self, spec: &str) -> CondDbResult<RevisionKind> {
        let id = self.lookup(spec)?;
        Ok(self.backend.kind_of(&id)?.into())
    }

    /// Resolve `spec` to a checkpoint or a bare snapshot.
    pub fn resolve_revision(&self, spec: &str) -> CondDbResult<Revision> {
        let id = self.lookup(spec)?;
        let kind = RevisionKind::from(self.backend.kind_of(&id)?);
        tracing::debug!(spec, %id, %kind, "resolved revision");
        match kind {
            RevisionKind::Checkpoint => Ok(Revision::Checkpoint(self.backend.read_checkpoint(&id)?)),
            RevisionKind::Snapshot => Ok(Revision::Snapshot(id)),
            RevisionKind::Label => {
                let label = self.backend.read_label(&id)?;
                match RevisionKind::from(self.backend.kind_of(&label.target)?) {
                    RevisionKind::Checkpoint => Ok(Revision::Checkpoint(
                        self.backend.read_checkpoint(&label.target)?,
                    )),
                    target => Err(CondDbError::InvalidRevisionType {
                        spec: spec.to_string(),
                        found: format!("label {:?} points at a {target}; labels must point at a checkpoint", label.name),
                    }),
                }
            }
            RevisionKind::Other(_) => Err(CondDbError::InvalidRevisionType {
                spec: spec.to_string(),
                found: format!("it names a {kind}"),
            }),
        }
    }

    /// Resolve `spec` to the root tree of its snapshot.
    pub fn resolve(&self, spec: &str) -> CondDbResult<ObjectId> {
        Ok(self.resolve_revision(spec)?.snapshot())
    }
}
