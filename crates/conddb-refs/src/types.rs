//! Branches, tags and HEAD.

use conddb_types::ObjectId;
use serde::{Deserialize, Serialize};

const HEADS: &str = "refs/heads/";
const TAGS: &str = "refs/tags/";

/// A named entry point into history.
///
/// A branch names the checkpoint at its tip and may move. A tag is written
/// once; it names a checkpoint (lightweight) or a tag object (annotated).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ref {
    Branch { name: String, target: ObjectId },
    Tag { name: String, target: ObjectId },
}

impl Ref {
    fn parts(&self) -> (&'static str, &str, ObjectId) {
        match self {
            Ref::Branch { name, target } => (HEADS, name, *target),
            Ref::Tag { name, target } => (TAGS, name, *target),
        }
    }

    /// Full name under `refs/`, e.g. `refs/tags/v1.0.0`.
    pub fn canonical_name(&self) -> String {
        let (namespace, name, _) = self.parts();
        format!("{namespace}{name}")
    }

    pub fn short_name(&self) -> &str {
        self.parts().1
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Ref::Branch { .. })
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, Ref::Tag { .. })
    }

    pub fn target(&self) -> ObjectId {
        self.parts().2
    }
}

/// HEAD names a branch, or is detached at an object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Head {
    Symbolic(String),
    Detached(ObjectId),
}

impl Head {
    /// Canonical ref HEAD follows, if it is symbolic.
    pub fn branch_ref(&self) -> Option<String> {
        match self {
            Head::Symbolic(branch) => Some(format!("{HEADS}{branch}")),
            Head::Detached(_) => None,
        }
    }
}
