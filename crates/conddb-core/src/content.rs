//! On-demand path lookup inside a snapshot, with a pluggable policy for
//! paths that land on something other than a leaf.

use std::fmt;

use conddb_backend::{Backend, EntryKind, TreeEntry};
use conddb_types::ObjectId;

use crate::error::{CondDbError, CondDbResult};
use crate::walker::SEPARATOR;

/// What a path resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    /// Bytes of a leaf, or rendered by a directory policy.
    Leaf(Vec<u8>),
    /// Immediate children of a directory.
    Listing(Vec<TreeEntry>),
}

impl Content {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Leaf(bytes) => Some(bytes),
            Self::Listing(_) => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Leaf(bytes) => Some(bytes),
            Self::Listing(_) => None,
        }
    }
}

/// The entry a path points at inside one snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Located {
    pub kind: EntryKind,
    pub id: ObjectId,
}

/// A non-leaf path handed to a [`DirectoryPolicy`].
pub struct Directory<'a> {
    pub path: &'a str,
    pub kind: EntryKind,
    pub id: ObjectId,
    lister: &'a dyn Fn() -> CondDbResult<Vec<TreeEntry>>,
}

impl Directory<'_> {
    /// Immediate children, listed on demand. An external link has none.
    pub fn children(&self) -> CondDbResult<Vec<TreeEntry>> {
        (self.lister)()
    }
}

/// Decides what a query returns when its path names a subtree or an
/// external link instead of a leaf.
pub trait DirectoryPolicy: fmt::Debug + Send + Sync {
    fn convert(&self, dir: &Directory<'_>) -> CondDbResult<Content>;
}

/// Refuse directory content. The default.
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectDirectories;

impl DirectoryPolicy for RejectDirectories {
    fn convert(&self, dir: &Directory<'_>) -> CondDbResult<Content> {
        Err(CondDbError::DirectoryNotAllowed {
            path: dir.path.to_string(),
        })
    }
}

/// Return the immediate children as a structured listing.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListDirectories;

impl DirectoryPolicy for ListDirectories {
    fn convert(&self, dir: &Directory<'_>) -> CondDbResult<Content> {
        Ok(Content::Listing(dir.children()?))
    }
}

/// Render the immediate children as a JSON document:
/// `{"dirs": [...], "files": [...], "links": [...]}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonDirectories;

impl DirectoryPolicy for JsonDirectories {
    fn convert(&self, dir: &Directory<'_>) -> CondDbResult<Content> {
        let (mut dirs, mut files, mut links) = (Vec::new(), Vec::new(), Vec::new());
        for entry in dir.children()? {
            match entry.kind() {
                EntryKind::Subtree => dirs.push(entry.name),
                EntryKind::Leaf => files.push(entry.name),
                EntryKind::ExternalLink => links.push(entry.name),
            }
        }
        let doc = serde_json::json!({ "dirs": dirs, "files": files, "links": links });
        Ok(Content::Leaf(doc.to_string().into_bytes()))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty())
}

/// Find the entry at `path` by descending one subtree per segment.
///
/// Empty segments are ignored, so the empty path names the root itself.
/// Returns `Ok(None)` when a segment is missing or the descent hits a leaf
/// or link before the last segment.
pub fn locate<B: Backend + ?Sized>(
    backend: &B,
    snapshot: &ObjectId,
    path: &str,
) -> CondDbResult<Option<Located>> {
    let mut current = Located {
        kind: EntryKind::Subtree,
        id: *snapshot,
    };
    for segment in segments(path) {
        if current.kind != EntryKind::Subtree {
            return Ok(None);
        }
        let children = backend.list_children(&current.id)?;
        match children.into_iter().find(|e| e.name == segment) {
            Some(entry) => {
                current = Located {
                    kind: entry.kind(),
                    id: entry.object_id,
                }
            }
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

/// Fetches the content at a path, applying a [`DirectoryPolicy`] to
/// non-leaf entries.
pub struct ContentResolver<'b, B: ?Sized> {
    backend: &'b B,
    policy: &'b dyn DirectoryPolicy,
}

impl<'b, B: Backend + ?Sized> ContentResolver<'b, B> {
    pub fn new(backend: &'b B, policy: &'b dyn DirectoryPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn resolve(&self, snapshot: &ObjectId, path: &str) -> CondDbResult<Content> {
        let found = locate(self.backend, snapshot, path)?.ok_or_else(|| {
            CondDbError::PathNotFound {
                path: path.to_string(),
            }
        })?;
        tracing::debug!(path, kind = %found.kind, id = %found.id, "located path");
        match found.kind {
            EntryKind::Leaf => Ok(Content::Leaf(self.backend.read_leaf(&found.id)?)),
            kind => {
                let lister = || -> CondDbResult<Vec<TreeEntry>> {
                    match kind {
                        EntryKind::Subtree => Ok(self.backend.list_children(&found.id)?),
                        _ => Ok(Vec::new()),
                    }
                };
                self.policy.convert(&Directory {
                    path,
                    kind,
                    id: found.id,
                    lister: &lister,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::RevisionResolver;
    use crate::testing::{conditions, Conditions};
    use crate::walker::TreeWalker;

    fn tip(fx: &Conditions) -> ObjectId {
        RevisionResolver::new(&fx.backend).resolve("main").unwrap()
    }

    fn resolve_with(
        fx: &Conditions,
        policy: &dyn DirectoryPolicy,
        path: &str,
    ) -> CondDbResult<Content> {
        ContentResolver::new(&fx.backend, policy).resolve(&tip(fx), path)
    }

    // ---- Leaves ----

    #[test]
    fn leaf_bytes_are_returned() {
        let fx = conditions();
        let content = resolve_with(&fx, &RejectDirectories, "tracker/gas/pressure").unwrap();
        assert_eq!(content, Content::Leaf(b"990".to_vec()));
        assert_eq!(content.as_bytes(), Some(&b"990"[..]));
    }

    #[test]
    fn redundant_separators_are_ignored() {
        let fx = conditions();
        let content = resolve_with(&fx, &RejectDirectories, "/tracker//gas/pressure").unwrap();
        assert_eq!(content.into_bytes(), Some(b"990".to_vec()));
    }

    #[test]
    fn missing_segments_are_not_found() {
        let fx = conditions();
        for path in ["tracker/gas/humidity", "calorimeter", "README/inside"] {
            assert!(
                matches!(
                    resolve_with(&fx, &RejectDirectories, path),
                    Err(CondDbError::PathNotFound { .. })
                ),
                "{path}"
            );
        }
    }

    // ---- Directory policies ----

    #[test]
    fn subtree_rejected_by_default() {
        let fx = conditions();
        let err = resolve_with(&fx, &RejectDirectories, "tracker/gas").unwrap_err();
        assert!(matches!(err, CondDbError::DirectoryNotAllowed { path } if path == "tracker/gas"));
    }

    #[test]
    fn link_and_root_count_as_directories() {
        let fx = conditions();
        for path in ["external", ""] {
            assert!(matches!(
                resolve_with(&fx, &RejectDirectories, path),
                Err(CondDbError::DirectoryNotAllowed { .. })
            ));
        }
    }

    #[test]
    fn listing_matches_backend_children() {
        let fx = conditions();
        let gas = locate(&fx.backend, &tip(&fx), "tracker/gas").unwrap().unwrap();
        let expected = fx.backend.list_children(&gas.id).unwrap();
        let content = resolve_with(&fx, &ListDirectories, "tracker/gas").unwrap();
        assert_eq!(content, Content::Listing(expected));
        assert_eq!(content.as_bytes(), None);
    }

    #[test]
    fn link_lists_as_empty() {
        let fx = conditions();
        let content = resolve_with(&fx, &ListDirectories, "external").unwrap();
        assert_eq!(content, Content::Listing(Vec::new()));
    }

    #[test]
    fn json_policy_groups_children_by_kind() {
        let fx = conditions();
        let content = resolve_with(&fx, &JsonDirectories, "").unwrap();
        let doc: serde_json::Value = serde_json::from_slice(content.as_bytes().unwrap()).unwrap();
        assert_eq!(
            doc,
            serde_json::json!({
                "dirs": ["tracker"],
                "files": ["README"],
                "links": ["external"],
            })
        );
    }

    #[test]
    fn policies_agree_on_leaves() {
        let fx = conditions();
        let policies: [&dyn DirectoryPolicy; 3] =
            [&RejectDirectories, &ListDirectories, &JsonDirectories];
        for policy in policies {
            assert_eq!(
                resolve_with(&fx, policy, "README").unwrap(),
                Content::Leaf(b"conditions".to_vec())
            );
        }
    }

    // ---- Index consistency ----

    #[test]
    fn index_sizes_match_individual_lookups() {
        let fx = conditions();
        let root = tip(&fx);
        let index = TreeWalker::new(&fx.backend).walk(&root).unwrap();
        let resolver = ContentResolver::new(&fx.backend, &RejectDirectories);

        let by_index: usize = index
            .iter()
            .map(|(_, id)| fx.backend.read_leaf(id).unwrap().len())
            .sum();
        let by_path: usize = index
            .paths()
            .map(|p| resolver.resolve(&root, p).unwrap().into_bytes().unwrap().len())
            .sum();
        assert_eq!(by_index, by_path);
        assert_eq!(by_index, "conditions".len() + "990".len() + "295".len());
    }
}
