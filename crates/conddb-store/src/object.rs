//! Typed objects and their stored form.
//!
//! Every typed object converts to a [`StoredObject`]: a kind tag plus the
//! payload bytes. Blobs store their bytes as-is; trees, commits and tags
//! store JSON.

use std::fmt;

use conddb_types::{ObjectId, TimePoint};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::hasher::ContentHasher;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Blob,
    Tree,
    /// A checkpoint.
    Commit,
    /// An annotated label.
    Tag,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        })
    }
}

/// The unit the store keeps: kind, payload and payload length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub kind: ObjectKind,
    pub data: Vec<u8>,
    pub size: u64,
}

impl StoredObject {
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        Self {
            kind,
            size: data.len() as u64,
            data,
        }
    }

    /// The id this object is stored under.
    pub fn compute_id(&self) -> ObjectId {
        ContentHasher::of(self.kind).id_of(&self.data)
    }

    fn require(&self, wanted: ObjectKind) -> StoreResult<&[u8]> {
        if self.kind == wanted {
            Ok(&self.data)
        } else {
            Err(StoreError::CorruptObject {
                id: self.compute_id(),
                reason: format!("wanted a {wanted}, found a {}", self.kind),
            })
        }
    }

    fn decode_json<T: DeserializeOwned>(&self, wanted: ObjectKind) -> StoreResult<T> {
        let bytes = self.require(wanted)?;
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn encode_json<T: Serialize>(kind: ObjectKind, value: &T) -> StoreResult<Self> {
        serde_json::to_vec(value)
            .map(|data| Self::new(kind, data))
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// A condition payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Blob, self.data.clone())
    }

    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.require(ObjectKind::Blob).map(|bytes| Self::new(bytes.to_vec()))
    }
}

/// Tree entry mode, using git's octal values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMode {
    Regular,
    Executable,
    Symlink,
    Directory,
    /// A commit in some other repository.
    Gitlink,
}

impl EntryMode {
    const TABLE: [(Self, u32); 5] = [
        (Self::Regular, 0o100644),
        (Self::Executable, 0o100755),
        (Self::Symlink, 0o120000),
        (Self::Directory, 0o040000),
        (Self::Gitlink, 0o160000),
    ];

    pub fn mode_bits(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Directory => 0o040000,
            Self::Gitlink => 0o160000,
        }
    }

    pub fn from_mode_bits(bits: u32) -> Option<Self> {
        Self::TABLE
            .iter()
            .find_map(|(mode, known)| (*known == bits).then_some(*mode))
    }

    /// Symlinks and executables are leaves like any regular file.
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Directory => EntryKind::Subtree,
            Self::Gitlink => EntryKind::ExternalLink,
            Self::Regular | Self::Executable | Self::Symlink => EntryKind::Leaf,
        }
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06o}", self.mode_bits())
    }
}

/// How a walk treats an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntryKind {
    Leaf,
    Subtree,
    /// Reported, never followed.
    ExternalLink,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Leaf => "leaf",
            Self::Subtree => "subtree",
            Self::ExternalLink => "link",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeEntry {
    pub mode: EntryMode,
    pub name: String,
    pub object_id: ObjectId,
}

impl TreeEntry {
    pub fn new(mode: EntryMode, name: impl Into<String>, object_id: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            object_id,
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.mode.kind()
    }
}

/// One directory level. Entries are kept sorted by name, so equal
/// directories hash equal regardless of insertion order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        StoredObject::encode_json(ObjectKind::Tree, self)
    }

    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.decode_json(ObjectKind::Tree)
    }

    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A checkpoint: one root tree at one point in time.
///
/// Interval queries follow `parents[0]` only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitObject {
    pub tree: ObjectId,
    pub parents: Vec<ObjectId>,
    pub time: TimePoint,
    pub message: String,
}

impl CommitObject {
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        StoredObject::encode_json(ObjectKind::Commit, self)
    }

    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.decode_json(ObjectKind::Commit)
    }

    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }
}

/// An annotated label. `target_kind` is recorded when the label is made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagObject {
    pub name: String,
    pub target: ObjectId,
    pub target_kind: ObjectKind,
    pub message: String,
}

impl TagObject {
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        StoredObject::encode_json(ObjectKind::Tag, self)
    }

    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        obj.decode_json(ObjectKind::Tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(mode: EntryMode, name: &str) -> TreeEntry {
        TreeEntry::new(mode, name, ObjectId::from_bytes(name.as_bytes()))
    }

    #[test]
    fn blob_keeps_raw_bytes() {
        let stored = Blob::new(b"1013.25".to_vec()).to_stored_object();
        assert_eq!(stored.data, b"1013.25");
        assert_eq!(stored.size, 7);
        assert_eq!(Blob::from_stored_object(&stored).unwrap().data, b"1013.25");
    }

    #[test]
    fn decoding_the_wrong_kind_is_corrupt() {
        let stored = StoredObject::new(ObjectKind::Tree, b"[]".to_vec());
        assert!(matches!(
            Blob::from_stored_object(&stored),
            Err(StoreError::CorruptObject { .. })
        ));
        let commit = CommitObject {
            tree: ObjectId::null(),
            parents: vec![],
            time: 0,
            message: String::new(),
        };
        assert!(matches!(
            Tree::from_stored_object(&commit.to_stored_object().unwrap()),
            Err(StoreError::CorruptObject { .. })
        ));
    }

    #[test]
    fn garbage_json_is_a_serialization_error() {
        let stored = StoredObject::new(ObjectKind::Tree, b"{not json".to_vec());
        assert!(matches!(
            Tree::from_stored_object(&stored),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn tree_order_is_by_name() {
        let tree = Tree::new(vec![
            entry(EntryMode::Regular, "temperature"),
            entry(EntryMode::Directory, "gas"),
            entry(EntryMode::Gitlink, "external"),
        ]);
        let names: Vec<&str> = tree.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["external", "gas", "temperature"]);
        assert_eq!(
            Tree::new(tree.entries.iter().rev().cloned().collect()).to_stored_object().unwrap(),
            tree.to_stored_object().unwrap()
        );
    }

    #[test]
    fn entries_with_one_name_keep_insertion_order() {
        let regular = entry(EntryMode::Regular, "pressure");
        let executable = entry(EntryMode::Executable, "pressure");
        assert_ne!(regular, executable);
        let tree = Tree::new(vec![
            executable.clone(),
            entry(EntryMode::Directory, "gas"),
            regular.clone(),
        ]);
        assert_eq!(tree.entries[1], executable);
        assert_eq!(tree.entries[2], regular);
    }

    #[test]
    fn tree_lookup() {
        let tree = Tree::new(vec![
            entry(EntryMode::Regular, "pressure"),
            entry(EntryMode::Directory, "gas"),
        ]);
        assert_eq!(tree.get("gas").unwrap().kind(), EntryKind::Subtree);
        assert_eq!(
            tree.get("pressure").unwrap().object_id,
            ObjectId::from_bytes(b"pressure")
        );
        assert!(tree.get("missing").is_none());
        assert_eq!(tree.len(), 2);
        assert!(Tree::empty().is_empty());
    }

    #[test]
    fn mode_bits() {
        for (mode, bits) in EntryMode::TABLE {
            assert_eq!(mode.mode_bits(), bits);
            assert_eq!(EntryMode::from_mode_bits(bits), Some(mode));
        }
        assert_eq!(EntryMode::from_mode_bits(0o100664), None);
        assert_eq!(EntryMode::Directory.to_string(), "040000");
        assert_eq!(EntryMode::Regular.to_string(), "100644");
    }

    #[test]
    fn entry_kinds() {
        assert_eq!(EntryMode::Executable.kind(), EntryKind::Leaf);
        assert_eq!(EntryMode::Symlink.kind(), EntryKind::Leaf);
        assert_eq!(EntryMode::Directory.kind(), EntryKind::Subtree);
        assert_eq!(EntryMode::Gitlink.kind(), EntryKind::ExternalLink);
        assert_eq!(EntryKind::ExternalLink.to_string(), "link");
    }

    #[test]
    fn commit_keeps_first_parent() {
        let commit = CommitObject {
            tree: ObjectId::from_bytes(b"root"),
            parents: vec![ObjectId::from_bytes(b"main"), ObjectId::from_bytes(b"merged")],
            time: 50,
            message: "calibration".into(),
        };
        let back = CommitObject::from_stored_object(&commit.to_stored_object().unwrap()).unwrap();
        assert_eq!(back, commit);
        assert_eq!(back.first_parent(), Some(&ObjectId::from_bytes(b"main")));
    }

    #[test]
    fn tag_records_target_kind() {
        let tag = TagObject {
            name: "v1.0.0".into(),
            target: ObjectId::from_bytes(b"tree"),
            target_kind: ObjectKind::Tree,
            message: "snapshot only".into(),
        };
        let back = TagObject::from_stored_object(&tag.to_stored_object().unwrap()).unwrap();
        assert_eq!(back.target_kind, ObjectKind::Tree);
        assert_eq!(back, tag);
    }

    #[test]
    fn same_bytes_different_kind_different_id() {
        let blob = StoredObject::new(ObjectKind::Blob, b"[]".to_vec());
        let tree = StoredObject::new(ObjectKind::Tree, b"[]".to_vec());
        assert_ne!(blob.compute_id(), tree.compute_id());
        assert_eq!(ObjectKind::Commit.to_string(), "commit");
    }
}
