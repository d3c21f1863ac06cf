//! Git repositories read through libgit2.

use git2::{ErrorCode, ObjectType, Oid, Repository};

use conddb_store::{EntryMode, ObjectKind, TreeEntry};
use conddb_types::ObjectId;

use crate::error::{BackendError, BackendResult};
use crate::traits::{Backend, Checkpoint, Connect, Label};

/// Group-writable blobs written by old git versions.
const LEGACY_BLOB_MODE: u32 = 0o100664;

impl From<git2::Error> for BackendError {
    fn from(err: git2::Error) -> Self {
        BackendError::Native {
            class: format!("{:?}", err.class()),
            code: err.raw_code(),
            message: err.message().to_string(),
        }
    }
}

fn to_id(oid: Oid) -> BackendResult<ObjectId> {
    Ok(ObjectId::from_slice(oid.as_bytes())?)
}

/// An on-disk git repository.
pub struct GitBackend {
    repo: Repository,
    location: String,
}

impl std::fmt::Debug for GitBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitBackend")
            .field("location", &self.location)
            .finish()
    }
}

impl GitBackend {
    /// Open the repository at `location` (work tree or bare `.git` dir).
    pub fn open(location: &str) -> BackendResult<Self> {
        let repo = Repository::open(location).map_err(|e| BackendError::Connect {
            location: location.to_string(),
            reason: e.message().to_string(),
        })?;
        tracing::debug!(location, bare = repo.is_bare(), "opened git repository");
        Ok(Self {
            repo,
            location: location.to_string(),
        })
    }

    /// Wrap an already-open repository.
    pub fn from_repository(repo: Repository) -> Self {
        let location = repo.path().display().to_string();
        Self { repo, location }
    }

    fn oid(&self, id: &ObjectId) -> BackendResult<Oid> {
        Oid::from_bytes(id.as_slice()).map_err(|_| BackendError::MissingObject(*id))
    }

    fn find(&self, id: &ObjectId) -> BackendResult<git2::Object<'_>> {
        match self.repo.find_object(self.oid(id)?, None) {
            Ok(obj) => Ok(obj),
            Err(e) if e.code() == ErrorCode::NotFound => Err(BackendError::MissingObject(*id)),
            Err(e) => Err(e.into()),
        }
    }

    fn wrong_kind(
        &self,
        id: &ObjectId,
        expected: ObjectKind,
        actual: Option<ObjectType>,
    ) -> BackendError {
        match map_kind(id, actual) {
            Ok(actual) => BackendError::WrongKind {
                id: *id,
                expected,
                actual,
            },
            Err(e) => e,
        }
    }
}

fn map_kind(id: &ObjectId, kind: Option<ObjectType>) -> BackendResult<ObjectKind> {
    match kind {
        Some(ObjectType::Blob) => Ok(ObjectKind::Blob),
        Some(ObjectType::Tree) => Ok(ObjectKind::Tree),
        Some(ObjectType::Commit) => Ok(ObjectKind::Commit),
        Some(ObjectType::Tag) => Ok(ObjectKind::Tag),
        other => Err(BackendError::UnrecognizedKind {
            id: *id,
            kind: other.map_or_else(|| "unknown".to_string(), |k| k.str().to_string()),
        }),
    }
}

impl Connect for GitBackend {
    fn connect(location: &str) -> BackendResult<Self> {
        Self::open(location)
    }
}

impl Backend for GitBackend {
    fn location(&self) -> &str {
        &self.location
    }

    fn resolve_revision(&self, spec: &str) -> BackendResult<Option<ObjectId>> {
        match self.repo.revparse_single(spec) {
            Ok(obj) => Ok(Some(to_id(obj.id())?)),
            Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => {
                tracing::trace!(spec, error = %e.message(), "revision not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn kind_of(&self, id: &ObjectId) -> BackendResult<ObjectKind> {
        map_kind(id, self.find(id)?.kind())
    }

    fn read_checkpoint(&self, id: &ObjectId) -> BackendResult<Checkpoint> {
        let commit = self
            .find(id)?
            .into_commit()
            .map_err(|obj| self.wrong_kind(id, ObjectKind::Commit, obj.kind()))?;
        let parents = commit
            .parent_ids()
            .map(to_id)
            .collect::<BackendResult<Vec<_>>>()?;
        Ok(Checkpoint {
            id: *id,
            snapshot: to_id(commit.tree_id())?,
            parents,
            // Pre-epoch commit times clamp to the start of the time axis.
            time: u64::try_from(commit.time().seconds()).unwrap_or(0),
        })
    }

    fn read_label(&self, id: &ObjectId) -> BackendResult<Label> {
        let tag = self
            .find(id)?
            .into_tag()
            .map_err(|obj| self.wrong_kind(id, ObjectKind::Tag, obj.kind()))?;
        Ok(Label {
            name: String::from_utf8_lossy(tag.name_bytes()).into_owned(),
            target: to_id(tag.target_id())?,
        })
    }

    fn list_children(&self, tree: &ObjectId) -> BackendResult<Vec<TreeEntry>> {
        let tree = self
            .find(tree)?
            .into_tree()
            .map_err(|obj| self.wrong_kind(tree, ObjectKind::Tree, obj.kind()))?;
        let mut children = Vec::with_capacity(tree.len());
        for entry in tree.iter() {
            let name = String::from_utf8_lossy(entry.name_bytes()).into_owned();
            // `filemode()` normalizes unknown modes to regular files.
            let bits = u32::try_from(entry.filemode_raw()).unwrap_or(u32::MAX);
            let mode = match bits {
                LEGACY_BLOB_MODE => EntryMode::Regular,
                _ => EntryMode::from_mode_bits(bits)
                    .ok_or(BackendError::UnrecognizedEntry { name: name.clone(), mode: bits })?,
            };
            children.push(TreeEntry::new(mode, name, to_id(entry.id())?));
        }
        Ok(children)
    }

    fn read_leaf(&self, id: &ObjectId) -> BackendResult<Vec<u8>> {
        let blob = self
            .find(id)?
            .into_blob()
            .map_err(|obj| self.wrong_kind(id, ObjectKind::Blob, obj.kind()))?;
        Ok(blob.content().to_vec())
    }
}
