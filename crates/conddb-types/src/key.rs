use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::TimePoint;

/// Coordinates of a conditions query: `(tag, path, time?)`.
///
/// The tag may be omitted when the connection carries a default tag. An
/// omitted time asks for the content at the tag itself, without consulting
/// history.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConditionKey {
    /// Revision specifier (branch, tag, or object id).
    pub tag: Option<String>,
    /// Root-relative, `/`-separated path.
    pub path: String,
    /// Query time, if this is a timed query.
    pub time: Option<TimePoint>,
}

impl ConditionKey {
    /// An untimed key with an explicit tag.
    pub fn new(tag: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            path: path.into(),
            time: None,
        }
    }

    /// An untimed key that relies on the connection's default tag.
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            tag: None,
            path: path.into(),
            time: None,
        }
    }

    /// Attach a query time.
    pub fn at(mut self, time: TimePoint) -> Self {
        self.time = Some(time);
        self
    }
}

impl fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tag.as_deref().unwrap_or("<default>"), self.path)?;
        if let Some(t) = self.time {
            write!(f, "@{t}")?;
        }
        Ok(())
    }
}
