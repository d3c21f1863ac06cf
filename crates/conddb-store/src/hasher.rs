//! Object ids: BLAKE3 over a per-kind prefix followed by the payload.

use conddb_types::ObjectId;

use crate::object::ObjectKind;

/// Computes ids for payloads of one object kind.
///
/// The prefix differs per kind, so a blob and a tree holding the same
/// bytes never share an id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHasher {
    kind: ObjectKind,
}

impl ContentHasher {
    pub const fn of(kind: ObjectKind) -> Self {
        Self { kind }
    }

    pub fn prefix(&self) -> &'static str {
        match self.kind {
            ObjectKind::Blob => "conddb-blob-v1",
            ObjectKind::Tree => "conddb-tree-v1",
            ObjectKind::Commit => "conddb-commit-v1",
            ObjectKind::Tag => "conddb-tag-v1",
        }
    }

    pub fn id_of(&self, payload: &[u8]) -> ObjectId {
        let digest = blake3::Hasher::new()
            .update(self.prefix().as_bytes())
            .update(b":")
            .update(payload)
            .finalize();
        ObjectId::from_hash(*digest.as_bytes())
    }

    /// True when `payload` hashes to `id` under this kind.
    pub fn matches(&self, payload: &[u8], id: &ObjectId) -> bool {
        self.id_of(payload) == *id
    }
}
