//! Declarative construction of snapshot trees.
//!
//! A [`SnapshotBuilder`] holds a full hierarchy keyed by `/`-separated paths
//! and writes it into an [`ObjectStore`] as nested trees, bottom-up. It is
//! the write side used to build histories for the in-memory backend.

use std::collections::BTreeMap;

use conddb_store::{Blob, EntryMode, ObjectStore, StoreResult, Tree, TreeEntry};
use conddb_types::ObjectId;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Node {
    File(Vec<u8>),
    Link(ObjectId),
    Dir(BTreeMap<String, Node>),
}

/// A mutable description of one snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapshotBuilder {
    root: BTreeMap<String, Node>,
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content of a leaf, creating intermediate directories.
    ///
    /// Any leaf standing where a directory is needed is replaced.
    pub fn file(&mut self, path: &str, content: impl Into<Vec<u8>>) -> &mut Self {
        self.insert(path, Node::File(content.into()));
        self
    }

    /// Place an external link (e.g. a submodule commit) at `path`.
    pub fn link(&mut self, path: &str, target: ObjectId) -> &mut Self {
        self.insert(path, Node::Link(target));
        self
    }

    /// Remove a leaf, link or whole directory, pruning parents left empty.
    pub fn remove(&mut self, path: &str) -> &mut Self {
        let parts = segments(path);
        if !parts.is_empty() {
            remove_in(&mut self.root, &parts);
        }
        self
    }

    fn insert(&mut self, path: &str, node: Node) {
        let parts = segments(path);
        let Some((last, dirs)) = parts.split_last() else {
            return;
        };
        let mut level = &mut self.root;
        for dir in dirs {
            let slot = level
                .entry((*dir).to_string())
                .or_insert_with(|| Node::Dir(BTreeMap::new()));
            if !matches!(slot, Node::Dir(_)) {
                *slot = Node::Dir(BTreeMap::new());
            }
            level = match slot {
                Node::Dir(children) => children,
                _ => unreachable!("slot was just made a directory"),
            };
        }
        level.insert((*last).to_string(), node);
    }

    /// Write every tree and blob into `store`, returning the root tree id.
    pub fn write_to(&self, store: &dyn ObjectStore) -> StoreResult<ObjectId> {
        write_dir(store, &self.root)
    }
}

fn remove_in(level: &mut BTreeMap<String, Node>, parts: &[&str]) {
    match parts {
        [] => {}
        [last] => {
            level.remove(*last);
        }
        [first, rest @ ..] => {
            if let Some(Node::Dir(children)) = level.get_mut(*first) {
                remove_in(children, rest);
                if children.is_empty() {
                    level.remove(*first);
                }
            }
        }
    }
}

fn write_dir(store: &dyn ObjectStore, level: &BTreeMap<String, Node>) -> StoreResult<ObjectId> {
    let mut entries = Vec::with_capacity(level.len());
    for (name, node) in level {
        let entry = match node {
            Node::File(data) => {
                let id = store.write(&Blob::new(data.clone()).to_stored_object())?;
                TreeEntry::new(EntryMode::Regular, name.clone(), id)
            }
            Node::Link(target) => TreeEntry::new(EntryMode::Gitlink, name.clone(), *target),
            Node::Dir(children) => {
                TreeEntry::new(EntryMode::Directory, name.clone(), write_dir(store, children)?)
            }
        };
        entries.push(entry);
    }
    store.write(&Tree::new(entries).to_stored_object()?)
}
