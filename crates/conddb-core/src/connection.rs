//! A query session over one backend handle.

use conddb_backend::{Backend, Connect, RuntimeGuard, TreeEntry};
use conddb_types::{ConditionKey, Iov, TimePoint};

use crate::config::ConnectionConfig;
use crate::content::{Content, ContentResolver, DirectoryPolicy, RejectDirectories};
use crate::error::{CondDbError, CondDbResult};
use crate::interval::IntervalIndex;
use crate::resolver::{RevisionKind, RevisionResolver};
use crate::walker::{PathIndex, TreeWalker};

/// Result of a conditions query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Value {
    pub content: Content,
    /// Where the content is valid. Untimed queries report the full range.
    pub iov: Iov,
}

struct Live<B> {
    backend: B,
    // Dropped after the backend.
    _runtime: RuntimeGuard,
}

/// A connection to one conditions repository.
///
/// Owns exactly one backend handle, released by [`close`](Self::close) or
/// on drop, whichever comes first. Every query after that fails with
/// [`CondDbError::Lifecycle`].
///
/// The connection may carry a default tag used when a key names none. A
/// *pinned* connection additionally refuses keys naming any other tag.
pub struct Connection<B: Backend> {
    live: Option<Live<B>>,
    location: String,
    default_tag: Option<String>,
    pinned: bool,
    policy: Box<dyn DirectoryPolicy>,
}

impl<B: Backend + Connect> Connection<B> {
    /// Connect to the repository at `location`.
    pub fn open(location: &str, default_tag: Option<String>) -> CondDbResult<Self> {
        let runtime = RuntimeGuard::acquire();
        let backend = B::connect(location)?;
        Ok(Self::assemble(backend, runtime, default_tag))
    }

    /// Connect as described by `config`.
    pub fn from_config(config: &ConnectionConfig) -> CondDbResult<Self> {
        let location = config.repository.to_string_lossy();
        let mut conn = Self::open(&location, config.default_tag.clone())?;
        conn.policy = config.directory_policy.policy();
        Ok(conn)
    }
}

impl<B: Backend> Connection<B> {
    /// Wrap an already-open backend.
    pub fn with_backend(backend: B, default_tag: Option<String>) -> Self {
        Self::assemble(backend, RuntimeGuard::acquire(), default_tag)
    }

    fn assemble(backend: B, runtime: RuntimeGuard, default_tag: Option<String>) -> Self {
        let location = backend.location().to_string();
        tracing::info!(%location, default_tag = ?default_tag, "opened conditions connection");
        Self {
            live: Some(Live {
                backend,
                _runtime: runtime,
            }),
            location,
            default_tag,
            pinned: false,
            policy: Box::new(RejectDirectories),
        }
    }

    /// Replace the policy for queries that land on directories.
    pub fn with_directory_policy(mut self, policy: impl DirectoryPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Refuse every tag except the default one.
    pub fn pinned(mut self) -> CondDbResult<Self> {
        if self.default_tag.is_none() {
            return Err(CondDbError::Usage(
                "cannot pin a connection without a default tag".into(),
            ));
        }
        self.pinned = true;
        Ok(self)
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn default_tag(&self) -> Option<&str> {
        self.default_tag.as_deref()
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn is_open(&self) -> bool {
        self.live.is_some()
    }

    fn backend(&self, operation: &'static str) -> CondDbResult<&B> {
        self.live
            .as_ref()
            .map(|live| &live.backend)
            .ok_or(CondDbError::Lifecycle { operation })
    }

    /// The tag a query should use, honoring the default and the pin.
    fn effective_tag<'a>(&'a self, requested: Option<&'a str>) -> CondDbResult<&'a str> {
        match (requested, self.default_tag.as_deref()) {
            (Some(tag), Some(pinned)) if self.pinned && tag != pinned => {
                Err(CondDbError::TagMismatch {
                    pinned: pinned.to_string(),
                    requested: tag.to_string(),
                })
            }
            (Some(tag), _) | (None, Some(tag)) => Ok(tag),
            (None, None) => Err(CondDbError::Usage(
                "no tag given and the connection has no default tag".into(),
            )),
        }
    }

    /// Content of `key.path` under `key.tag`, at `key.time` if given.
    pub fn get(&self, key: &ConditionKey) -> CondDbResult<Value> {
        let backend = self.backend("get")?;
        let tag = self.effective_tag(key.tag.as_deref())?;
        tracing::debug!(tag, path = %key.path, time = ?key.time, "get");
        match key.time {
            Some(time) => {
                IntervalIndex::new(backend).value_at(tag, &key.path, time, self.policy.as_ref())
            }
            None => {
                let snapshot = RevisionResolver::new(backend).resolve(tag)?;
                let content =
                    ContentResolver::new(backend, self.policy.as_ref()).resolve(&snapshot, &key.path)?;
                Ok(Value {
                    content,
                    iov: Iov::full(),
                })
            }
        }
    }

    /// Every leaf path in the snapshot `tag` resolves to.
    pub fn index(&self, tag: Option<&str>) -> CondDbResult<PathIndex> {
        let backend = self.backend("index")?;
        let tag = self.effective_tag(tag)?;
        let snapshot = RevisionResolver::new(backend).resolve(tag)?;
        TreeWalker::new(backend).walk(&snapshot)
    }

    /// Walk the snapshot `tag` resolves to, reporting every entry.
    pub fn walk_with<A, F>(&self, tag: Option<&str>, acc: &mut A, visit: F) -> CondDbResult<PathIndex>
    where
        F: FnMut(&mut A, &str, &TreeEntry) -> CondDbResult<()>,
    {
        let backend = self.backend("walk")?;
        let tag = self.effective_tag(tag)?;
        let snapshot = RevisionResolver::new(backend).resolve(tag)?;
        TreeWalker::new(backend).walk_with(&snapshot, acc, visit)
    }

    /// Kind of the object `tag` names, before peeling.
    pub fn inspect(&self, tag: Option<&str>) -> CondDbResult<RevisionKind> {
        let backend = self.backend("inspect")?;
        RevisionResolver::new(backend).inspect(self.effective_tag(tag)?)
    }

    /// Times in `[t0, t1)` at which the content of `path` changes.
    pub fn boundaries(
        &self,
        tag: Option<&str>,
        path: &str,
        t0: TimePoint,
        t1: TimePoint,
    ) -> CondDbResult<Vec<TimePoint>> {
        let backend = self.backend("boundaries")?;
        let tag = self.effective_tag(tag)?;
        IntervalIndex::new(backend).boundaries(tag, path, t0, t1)
    }

    /// Release the backend handle. Safe to call more than once.
    pub fn close(&mut self) {
        if self.live.take().is_some() {
            tracing::info!(location = %self.location, "closed conditions connection");
        }
    }
}

impl<B: Backend> Drop for Connection<B> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<B: Backend> std::fmt::Debug for Connection<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("location", &self.location)
            .field("open", &self.is_open())
            .field("default_tag", &self.default_tag)
            .field("pinned", &self.pinned)
            .field("policy", &self.policy)
            .finish()
    }
}
