//! Intervals of validity and change boundaries along a line of history.
//!
//! The history of a revision is the first-parent chain of checkpoints that
//! ends at the checkpoint the revision resolves to. For a fixed path, each
//! checkpoint contributes the path's state, the `(kind, id)` of its entry or
//! nothing. A boundary is a checkpoint time at which that state differs from
//! the state before it:
//!
//! - checkpoints are ordered oldest first; a time lower than an earlier
//!   checkpoint's is raised to the running maximum
//! - checkpoints sharing a time collapse to the state after the last one
//! - creation, deletion, modification and kind change are all boundaries

use std::collections::HashSet;

use conddb_backend::{Backend, BackendError, Checkpoint};
use conddb_types::{Iov, ObjectId, TimePoint};

use crate::content::{locate, ContentResolver, DirectoryPolicy, Located};
use crate::error::{CondDbError, CondDbResult};
use crate::resolver::{Revision, RevisionResolver};
use crate::Value;

/// One boundary in a path's history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Change {
    /// Effective checkpoint time.
    pub time: TimePoint,
    /// State of the path from `time` on; `None` once deleted.
    pub state: Option<Located>,
    /// A snapshot holding that state.
    pub snapshot: ObjectId,
}

/// Where a point query's content lives and how long it stays valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Validity {
    pub iov: Iov,
    pub snapshot: ObjectId,
}

/// Answers point (`iov_at`) and range (`boundaries`) queries for a path.
pub struct IntervalIndex<'b, B: ?Sized> {
    backend: &'b B,
}

impl<'b, B: Backend + ?Sized> IntervalIndex<'b, B> {
    pub fn new(backend: &'b B) -> Self {
        Self { backend }
    }

    /// First-parent chain ending at `tip`, oldest first.
    fn lineage(&self, tip: Checkpoint) -> CondDbResult<Vec<Checkpoint>> {
        let mut seen = HashSet::new();
        let mut chain = Vec::new();
        let mut next = Some(tip);
        while let Some(cp) = next.take() {
            if !seen.insert(cp.id) {
                tracing::warn!(checkpoint = %cp.id, "history loops back on itself, stopping");
                break;
            }
            if let Some(parent) = cp.first_parent() {
                next = Some(self.backend.read_checkpoint(parent)?);
            }
            chain.push(cp);
        }
        chain.reverse();
        Ok(chain)
    }

    /// Every boundary of `path` along the history of `revision`.
    pub fn changes(&self, revision: &Revision, path: &str) -> CondDbResult<Vec<Change>> {
        let tip = match revision {
            Revision::Checkpoint(cp) => cp.clone(),
            Revision::Snapshot(_) => return Ok(Vec::new()),
        };

        // (time, state, snapshot), one per distinct effective time.
        let mut timeline: Vec<(TimePoint, Option<Located>, ObjectId)> = Vec::new();
        let mut clock = 0;
        let mut last_snapshot: Option<(ObjectId, Option<Located>)> = None;
        for cp in self.lineage(tip)? {
            if cp.time < clock {
                tracing::warn!(checkpoint = %cp.id, time = cp.time, clamped = clock, "checkpoint time goes backwards");
            }
            clock = clock.max(cp.time);
            let state = match last_snapshot {
                Some((snapshot, state)) if snapshot == cp.snapshot => state,
                _ => locate(self.backend, &cp.snapshot, path)?,
            };
            last_snapshot = Some((cp.snapshot, state));
            match timeline.last_mut() {
                Some(last) if last.0 == clock => *last = (clock, state, cp.snapshot),
                _ => timeline.push((clock, state, cp.snapshot)),
            }
        }

        let mut changes = Vec::new();
        let mut previous = None;
        for (time, state, snapshot) in timeline {
            if state != previous {
                changes.push(Change {
                    time,
                    state,
                    snapshot,
                });
                previous = state;
            }
        }
        Ok(changes)
    }

    /// The interval of validity containing `time` for `path` under `spec`.
    pub fn iov_at(&self, spec: &str, path: &str, time: TimePoint) -> CondDbResult<Validity> {
        if time == Iov::MAX {
            return Err(CondDbError::Usage(format!(
                "time {time} is reserved as the open upper bound"
            )));
        }
        let revision = RevisionResolver::new(self.backend).resolve_revision(spec)?;
        let not_found = || CondDbError::PathNotFound {
            path: path.to_string(),
        };

        if let Revision::Snapshot(snapshot) = revision {
            locate(self.backend, &snapshot, path)?.ok_or_else(not_found)?;
            return Ok(Validity {
                iov: Iov::full(),
                snapshot,
            });
        }

        let changes = self.changes(&revision, path)?;
        let current = changes.partition_point(|c| c.time <= time);
        let Some(change) = current.checked_sub(1).map(|i| changes[i]) else {
            return Err(not_found());
        };
        if change.state.is_none() {
            return Err(not_found());
        }
        let until = changes.get(current).map_or(Iov::MAX, |next| next.time);
        let iov = Iov::new(change.time, until).map_err(BackendError::from)?;
        tracing::debug!(spec, path, time, %iov, "computed interval of validity");
        Ok(Validity {
            iov,
            snapshot: change.snapshot,
        })
    }

    /// Content of `path` at `time`, with its interval of validity.
    pub fn value_at(
        &self,
        spec: &str,
        path: &str,
        time: TimePoint,
        policy: &dyn DirectoryPolicy,
    ) -> CondDbResult<Value> {
        let validity = self.iov_at(spec, path, time)?;
        let content = ContentResolver::new(self.backend, policy).resolve(&validity.snapshot, path)?;
        Ok(Value {
            content,
            iov: validity.iov,
        })
    }

    /// Times in `[t0, t1)` at which the content of `path` changes.
    ///
    /// Strictly increasing. A change at `t0` is included, one at `t1` is
    /// not. A bare snapshot has no history and therefore no boundaries.
    pub fn boundaries(
        &self,
        spec: &str,
        path: &str,
        t0: TimePoint,
        t1: TimePoint,
    ) -> CondDbResult<Vec<TimePoint>> {
        if t0 > t1 {
            return Err(CondDbError::Usage(format!(
                "range start {t0} is after range end {t1}"
            )));
        }
        let revision = RevisionResolver::new(self.backend).resolve_revision(spec)?;
        if t0 == t1 {
            return Ok(Vec::new());
        }
        Ok(self
            .changes(&revision, path)?
            .into_iter()
            .map(|c| c.time)
            .filter(|t| (t0..t1).contains(t))
            .collect())
    }
}
