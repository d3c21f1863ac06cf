use conddb_types::ObjectId;

use crate::error::Result;
use crate::types::{Head, Ref};

/// Storage for refs and HEAD, keyed by canonical name (`refs/heads/main`).
pub trait RefStore: Send + Sync {
    fn read_ref(&self, name: &str) -> Result<Option<Ref>>;

    /// Creates or moves a branch, or creates a tag. An existing tag is
    /// never overwritten.
    fn write_ref(&self, reference: &Ref) -> Result<()>;

    /// `(canonical name, ref)` pairs under `prefix`, ordered by name.
    fn list_refs(&self, prefix: &str) -> Result<Vec<(String, Ref)>>;

    fn head(&self) -> Result<Option<Head>>;

    fn set_head(&self, branch: &str) -> Result<()>;

    fn set_head_detached(&self, target: ObjectId) -> Result<()>;

    fn branches(&self) -> Result<Vec<(String, Ref)>> {
        self.list_refs("refs/heads/")
    }

    fn tags(&self) -> Result<Vec<(String, Ref)>> {
        self.list_refs("refs/tags/")
    }

    /// Object named by a short or full ref name.
    ///
    /// `HEAD` is followed through its branch. Anything else is tried as
    /// given, then under `refs/`, `refs/tags/` and `refs/heads/`, so a tag
    /// shadows a branch of the same name.
    fn lookup(&self, name: &str) -> Result<Option<ObjectId>> {
        if name == "HEAD" {
            let head = self.head()?;
            if let Some(Head::Detached(target)) = &head {
                return Ok(Some(*target));
            }
            return match head.and_then(|h| h.branch_ref()) {
                Some(branch) => Ok(self.read_ref(&branch)?.map(|r| r.target())),
                None => Ok(None),
            };
        }
        for prefix in ["", "refs/", "refs/tags/", "refs/heads/"] {
            let candidate = format!("{prefix}{name}");
            if let Some(found) = self.read_ref(&candidate)? {
                tracing::trace!(name, %candidate, "ref lookup");
                return Ok(Some(found.target()));
            }
        }
        Ok(None)
    }
}
