//! Tag-pinned, leaf-only access for consumers that just want files.

use conddb_backend::{Backend, Connect};
use conddb_types::ConditionKey;

use crate::connection::Connection;
use crate::content::{Content, RejectDirectories};
use crate::error::{CondDbError, CondDbResult};
use crate::walker::PathIndex;

/// A read-only view of one tag: untimed leaf lookups and the path index.
///
/// Directories are refused and no other tag can be queried. The
/// underlying connection closes when the `ResourceDb` is dropped.
#[derive(Debug)]
pub struct ResourceDb<B: Backend> {
    conn: Connection<B>,
    tag: String,
}

impl<B: Backend + Connect> ResourceDb<B> {
    pub fn open(location: &str, tag: impl Into<String>) -> CondDbResult<Self> {
        let tag = tag.into();
        let conn = Connection::open(location, Some(tag.clone()))?;
        Self::from_connection(conn, tag)
    }
}

impl<B: Backend> ResourceDb<B> {
    pub fn with_backend(backend: B, tag: impl Into<String>) -> CondDbResult<Self> {
        let tag = tag.into();
        Self::from_connection(Connection::with_backend(backend, Some(tag.clone())), tag)
    }

    fn from_connection(conn: Connection<B>, tag: String) -> CondDbResult<Self> {
        let conn = conn.with_directory_policy(RejectDirectories).pinned()?;
        Ok(Self { conn, tag })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Bytes of the leaf at `path`.
    pub fn get(&self, path: &str) -> CondDbResult<Vec<u8>> {
        match self.conn.get(&ConditionKey::new(self.tag.as_str(), path))?.content {
            Content::Leaf(bytes) => Ok(bytes),
            Content::Listing(_) => Err(CondDbError::DirectoryNotAllowed {
                path: path.to_string(),
            }),
        }
    }

    pub fn index(&self) -> CondDbResult<PathIndex> {
        self.conn.index(None)
    }

    pub fn close(&mut self) {
        self.conn.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::conditions;
    use conddb_backend::{GitBackend, MemoryBackend};

    fn resources(tag: &str) -> ResourceDb<MemoryBackend> {
        ResourceDb::with_backend(conditions().backend, tag).unwrap()
    }

    #[test]
    fn reads_leaves_of_its_tag() {
        let db = resources("v1.0.0");
        assert_eq!(db.tag(), "v1.0.0");
        assert_eq!(db.get("tracker/gas/pressure").unwrap(), b"1015");
        assert_eq!(db.get("README").unwrap(), b"conditions");
    }

    #[test]
    fn refuses_directories() {
        let db = resources("main");
        for path in ["tracker", "tracker/gas", "external"] {
            assert!(matches!(
                db.get(path),
                Err(CondDbError::DirectoryNotAllowed { .. })
            ));
        }
    }

    #[test]
    fn index_covers_every_readable_path() {
        let db = resources("main");
        let index = db.index().unwrap();
        assert_eq!(index.len(), 3);
        for path in index.paths() {
            assert!(db.get(path).is_ok(), "{path}");
        }
    }

    #[test]
    fn unknown_tag_surfaces_on_first_query() {
        let db = resources("nope");
        assert!(matches!(
            db.get("README"),
            Err(CondDbError::RevisionNotFound { .. })
        ));
    }

    #[test]
    fn closed_resources_fail() {
        let mut db = resources("main");
        db.close();
        assert!(matches!(db.get("README"), Err(CondDbError::Lifecycle { .. })));
        assert!(matches!(db.index(), Err(CondDbError::Lifecycle { .. })));
    }

    #[test]
    fn missing_repository_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let result = ResourceDb::<GitBackend>::open(missing.to_str().unwrap(), "main");
        assert!(matches!(result, Err(CondDbError::Backend(_))));
    }
}
