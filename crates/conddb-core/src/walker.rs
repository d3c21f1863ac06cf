//! Recursive snapshot traversal and the flat path index it produces.

use std::collections::BTreeMap;

use conddb_backend::{Backend, EntryKind, TreeEntry};
use conddb_types::ObjectId;

use crate::error::CondDbResult;

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// Every leaf reachable from one snapshot, keyed by full path.
///
/// Ordered by path string. External links and subtrees never appear.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathIndex {
    entries: BTreeMap<String, ObjectId>,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Object id of the leaf at `path`.
    pub fn get(&self, path: &str) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    /// Paths in index order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObjectId)> {
        self.entries.iter().map(|(path, id)| (path.as_str(), id))
    }

    fn insert(&mut self, path: String, id: ObjectId) {
        self.entries.insert(path, id);
    }
}

/// Depth-first, pre-order traversal of a snapshot.
///
/// Children are visited in name order regardless of backend order, so two
/// walks of the same snapshot see the same sequence. Subtrees are entered,
/// external links are reported but never followed.
pub struct TreeWalker<'b, B: ?Sized> {
    backend: &'b B,
}

impl<'b, B: Backend + ?Sized> TreeWalker<'b, B> {
    pub fn new(backend: &'b B) -> Self {
        Self { backend }
    }

    /// Index `snapshot`, logging each visited entry.
    pub fn walk(&self, snapshot: &ObjectId) -> CondDbResult<PathIndex> {
        self.walk_with(snapshot, &mut (), |_, path, entry| {
            match entry.kind() {
                EntryKind::ExternalLink => {
                    tracing::warn!(path, target = %entry.object_id, "skipping external link")
                }
                kind => tracing::trace!(path, %kind, id = %entry.object_id, "visit"),
            }
            Ok(())
        })
    }

    /// Index `snapshot`, handing each entry to `visit` with its full path.
    ///
    /// `acc` is threaded through every call. An error from `visit` aborts
    /// the walk and is returned as is.
    pub fn walk_with<A, F>(
        &self,
        snapshot: &ObjectId,
        acc: &mut A,
        mut visit: F,
    ) -> CondDbResult<PathIndex>
    where
        F: FnMut(&mut A, &str, &TreeEntry) -> CondDbResult<()>,
    {
        let mut index = PathIndex::new();
        self.descend(snapshot, "", &mut index, acc, &mut visit)?;
        tracing::debug!(%snapshot, leaves = index.len(), "walked snapshot");
        Ok(index)
    }

    fn descend<A, F>(
        &self,
        tree: &ObjectId,
        prefix: &str,
        index: &mut PathIndex,
        acc: &mut A,
        visit: &mut F,
    ) -> CondDbResult<()>
    where
        F: FnMut(&mut A, &str, &TreeEntry) -> CondDbResult<()>,
    {
        let mut children = self.backend.list_children(tree)?;
        children.sort_by(|a, b| a.name.cmp(&b.name));
        for entry in &children {
            let path = format!("{prefix}{}", entry.name);
            visit(acc, &path, entry)?;
            match entry.kind() {
                EntryKind::Leaf => index.insert(path, entry.object_id),
                EntryKind::Subtree => {
                    let nested = format!("{path}{SEPARATOR}");
                    self.descend(&entry.object_id, &nested, index, acc, visit)?;
                }
                EntryKind::ExternalLink => {}
            }
        }
        Ok(())
    }
}
