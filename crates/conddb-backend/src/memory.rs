//! In-memory backend: a content-addressed object store plus a ref table.
//!
//! Besides the read contract it offers a small write side (blobs, trees,
//! commits, tags, branches) so tests and embedders can assemble histories.

use conddb_refs::{InMemoryRefStore, Ref, RefStore};
use conddb_store::{
    Blob, CommitObject, InMemoryObjectStore, ObjectKind, ObjectStore, StoredObject, TagObject,
    Tree, TreeEntry,
};
use conddb_types::{ObjectId, TimePoint};

use crate::builder::SnapshotBuilder;
use crate::error::{BackendError, BackendResult};
use crate::traits::{Backend, Checkpoint, Label};

/// Shortest hex prefix accepted as an abbreviated object id.
const MIN_ABBREV: usize = 4;

/// A [`Backend`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    objects: InMemoryObjectStore,
    refs: InMemoryRefStore,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &InMemoryObjectStore {
        &self.objects
    }

    pub fn refs(&self) -> &InMemoryRefStore {
        &self.refs
    }

    fn read_object(&self, id: &ObjectId) -> BackendResult<StoredObject> {
        self.objects
            .read(id)?
            .ok_or(BackendError::MissingObject(*id))
    }

    fn read_as(&self, id: &ObjectId, expected: ObjectKind) -> BackendResult<StoredObject> {
        let obj = self.read_object(id)?;
        if obj.kind != expected {
            return Err(BackendError::WrongKind {
                id: *id,
                expected,
                actual: obj.kind,
            });
        }
        Ok(obj)
    }

    // ---- Write side ----

    pub fn write_blob(&self, data: &[u8]) -> BackendResult<ObjectId> {
        Ok(self.objects.write(&Blob::new(data.to_vec()).to_stored_object())?)
    }

    pub fn write_tree(&self, entries: Vec<TreeEntry>) -> BackendResult<ObjectId> {
        Ok(self.objects.write(&Tree::new(entries).to_stored_object()?)?)
    }

    pub fn write_snapshot(&self, snapshot: &SnapshotBuilder) -> BackendResult<ObjectId> {
        Ok(snapshot.write_to(&self.objects)?)
    }

    pub fn write_commit(
        &self,
        tree: ObjectId,
        parents: Vec<ObjectId>,
        time: TimePoint,
        message: &str,
    ) -> BackendResult<ObjectId> {
        let commit = CommitObject {
            tree,
            parents,
            time,
            message: message.to_string(),
        };
        Ok(self.objects.write(&commit.to_stored_object()?)?)
    }

    /// Record `snapshot` as a new checkpoint on `branch` at `time`.
    ///
    /// The branch's current tip, if any, becomes the first parent; the
    /// branch is created or advanced to the new checkpoint.
    pub fn commit(
        &self,
        branch: &str,
        snapshot: &SnapshotBuilder,
        time: TimePoint,
        message: &str,
    ) -> BackendResult<ObjectId> {
        let tree = self.write_snapshot(snapshot)?;
        let parent = self
            .refs
            .read_ref(&format!("refs/heads/{branch}"))?
            .map(|r| r.target());
        let id = self.write_commit(tree, parent.into_iter().collect(), time, message)?;
        self.set_branch(branch, id)?;
        tracing::debug!(branch, %id, time, "recorded checkpoint");
        Ok(id)
    }

    pub fn set_branch(&self, name: &str, target: ObjectId) -> BackendResult<()> {
        self.refs.write_ref(&Ref::Branch {
            name: name.to_string(),
            target,
        })?;
        Ok(())
    }

    pub fn set_head(&self, branch: &str) -> BackendResult<()> {
        Ok(self.refs.set_head(branch)?)
    }

    /// Create a lightweight tag pointing straight at `target`.
    pub fn tag_lightweight(&self, name: &str, target: ObjectId) -> BackendResult<()> {
        self.refs.write_ref(&Ref::Tag {
            name: name.to_string(),
            target,
        })?;
        Ok(())
    }

    /// Create an annotated tag object for `target` and a ref naming it.
    pub fn tag_annotated(
        &self,
        name: &str,
        target: ObjectId,
        message: &str,
    ) -> BackendResult<ObjectId> {
        let tag = TagObject {
            name: name.to_string(),
            target,
            target_kind: self.kind_of(&target)?,
            message: message.to_string(),
        };
        let id = self.objects.write(&tag.to_stored_object()?)?;
        self.tag_lightweight(name, id)?;
        Ok(id)
    }
}

impl Backend for MemoryBackend {
    fn location(&self) -> &str {
        "memory"
    }

    fn resolve_revision(&self, spec: &str) -> BackendResult<Option<ObjectId>> {
        if let Some(id) = self.refs.lookup(spec)? {
            return Ok(Some(id));
        }
        let is_hex = spec.len() >= MIN_ABBREV && spec.chars().all(|c| c.is_ascii_hexdigit());
        if !is_hex {
            return Ok(None);
        }
        let matches = self.objects.ids_with_prefix(&spec.to_ascii_lowercase());
        match matches.as_slice() {
            [] => Ok(None),
            [id] => Ok(Some(*id)),
            _ => Err(BackendError::Ambiguous {
                spec: spec.to_string(),
                candidates: matches.len(),
            }),
        }
    }

    fn kind_of(&self, id: &ObjectId) -> BackendResult<ObjectKind> {
        Ok(self.read_object(id)?.kind)
    }

    fn read_checkpoint(&self, id: &ObjectId) -> BackendResult<Checkpoint> {
        let commit = CommitObject::from_stored_object(&self.read_as(id, ObjectKind::Commit)?)?;
        Ok(Checkpoint {
            id: *id,
            snapshot: commit.tree,
            parents: commit.parents,
            time: commit.time,
        })
    }

    fn read_label(&self, id: &ObjectId) -> BackendResult<Label> {
        let tag = TagObject::from_stored_object(&self.read_as(id, ObjectKind::Tag)?)?;
        Ok(Label {
            name: tag.name,
            target: tag.target,
        })
    }

    fn list_children(&self, tree: &ObjectId) -> BackendResult<Vec<TreeEntry>> {
        let tree = Tree::from_stored_object(&self.read_as(tree, ObjectKind::Tree)?)?;
        Ok(tree.entries)
    }

    fn read_leaf(&self, id: &ObjectId) -> BackendResult<Vec<u8>> {
        let blob = Blob::from_stored_object(&self.read_as(id, ObjectKind::Blob)?)?;
        Ok(blob.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conddb_store::EntryKind;

    fn backend_with_history() -> (MemoryBackend, ObjectId, ObjectId) {
        let backend = MemoryBackend::new();
        let mut snap = SnapshotBuilder::new();
        snap.file("tracker/gas/pressure", "1013");
        let first = backend.commit("main", &snap, 50, "initial").unwrap();
        snap.file("tracker/gas/pressure", "990");
        let second = backend.commit("main", &snap, 200, "update").unwrap();
        (backend, first, second)
    }

    // ---- Revision resolution ----

    #[test]
    fn branch_resolves_to_tip() {
        let (backend, _, second) = backend_with_history();
        assert_eq!(backend.resolve_revision("main").unwrap(), Some(second));
        assert_eq!(backend.resolve_revision("nope").unwrap(), None);
    }

    #[test]
    fn head_resolves_through_branch() {
        let (backend, _, second) = backend_with_history();
        backend.set_head("main").unwrap();
        assert_eq!(backend.resolve_revision("HEAD").unwrap(), Some(second));
    }

    #[test]
    fn full_and_abbreviated_hex_ids_resolve() {
        let (backend, first, _) = backend_with_history();
        let hex = first.to_hex();
        assert_eq!(backend.resolve_revision(&hex).unwrap(), Some(first));
        assert_eq!(backend.resolve_revision(&hex[..16]).unwrap(), Some(first));
        assert_eq!(
            backend.resolve_revision(&hex[..16].to_uppercase()).unwrap(),
            Some(first)
        );
    }

    #[test]
    fn too_short_prefix_is_not_an_id() {
        let (backend, first, _) = backend_with_history();
        assert_eq!(backend.resolve_revision(&first.to_hex()[..3]).unwrap(), None);
    }

    // ---- Object reads ----

    #[test]
    fn checkpoint_links_to_parent() {
        let (backend, first, second) = backend_with_history();
        let cp = backend.read_checkpoint(&second).unwrap();
        assert_eq!(cp.time, 200);
        assert_eq!(cp.first_parent(), Some(&first));
        assert!(backend.read_checkpoint(&first).unwrap().parents.is_empty());
        assert_eq!(backend.kind_of(&cp.snapshot).unwrap(), ObjectKind::Tree);
    }

    #[test]
    fn reading_wrong_kind_is_reported() {
        let (backend, first, _) = backend_with_history();
        let err = backend.read_label(&first).unwrap_err();
        assert!(matches!(
            err,
            BackendError::WrongKind {
                expected: ObjectKind::Tag,
                actual: ObjectKind::Commit,
                ..
            }
        ));
    }

    #[test]
    fn missing_object_is_reported() {
        let backend = MemoryBackend::new();
        let id = ObjectId::from_bytes(b"ghost");
        assert!(matches!(
            backend.kind_of(&id),
            Err(BackendError::MissingObject(x)) if x == id
        ));
    }

    #[test]
    fn tree_listing_and_leaf_content() {
        let (backend, _, second) = backend_with_history();
        let root = backend.read_checkpoint(&second).unwrap().snapshot;
        let children = backend.list_children(&root).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "tracker");
        assert_eq!(children[0].kind(), EntryKind::Subtree);

        let tracker = backend.list_children(&children[0].object_id).unwrap();
        let gas = backend.list_children(&tracker[0].object_id).unwrap();
        assert_eq!(backend.read_leaf(&gas[0].object_id).unwrap(), b"990");
    }

    // ---- Tags ----

    #[test]
    fn annotated_tag_records_target() {
        let (backend, first, _) = backend_with_history();
        let tag_id = backend.tag_annotated("v1.0.0", first, "release").unwrap();
        assert_eq!(backend.resolve_revision("v1.0.0").unwrap(), Some(tag_id));
        assert_eq!(backend.kind_of(&tag_id).unwrap(), ObjectKind::Tag);
        let label = backend.read_label(&tag_id).unwrap();
        assert_eq!(label.name, "v1.0.0");
        assert_eq!(label.target, first);
    }

    #[test]
    fn lightweight_tag_points_straight_at_target() {
        let (backend, first, _) = backend_with_history();
        backend.tag_lightweight("calib-2024", first).unwrap();
        assert_eq!(backend.resolve_revision("calib-2024").unwrap(), Some(first));
    }
}
