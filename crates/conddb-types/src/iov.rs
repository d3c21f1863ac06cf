use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::time::TimePoint;

/// Interval Of Validity: the half-open range `[since, until)` during which a
/// condition's value is constant.
///
/// Invariant: `since < until`. An `until` of [`Iov::MAX`] means "valid
/// through the present, no known future change".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IovBounds")]
pub struct Iov {
    since: TimePoint,
    until: TimePoint,
}

impl Iov {
    /// Smallest representable time point.
    pub const MIN: TimePoint = 0;
    /// Open upper bound; never a valid query time.
    pub const MAX: TimePoint = TimePoint::MAX;

    /// Create an interval, rejecting empty or inverted ranges.
    pub fn new(since: TimePoint, until: TimePoint) -> Result<Self, TypeError> {
        if since >= until {
            return Err(TypeError::EmptyInterval { since, until });
        }
        Ok(Self { since, until })
    }

    /// The whole time domain, `[MIN, MAX)`.
    pub const fn full() -> Self {
        Self {
            since: Self::MIN,
            until: Self::MAX,
        }
    }

    pub fn since(&self) -> TimePoint {
        self.since
    }

    pub fn until(&self) -> TimePoint {
        self.until
    }

    /// Returns `true` if `t` lies in `[since, until)`.
    pub fn contains(&self, t: TimePoint) -> bool {
        self.since <= t && t < self.until
    }

    /// Returns `true` if no change is known after `since`.
    pub fn is_open_ended(&self) -> bool {
        self.until == Self::MAX
    }

    /// Intersection of two intervals, or `None` when they do not overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        Self::new(self.since.max(other.since), self.until.min(other.until)).ok()
    }
}

#[derive(Deserialize)]
struct IovBounds {
    since: TimePoint,
    until: TimePoint,
}

impl TryFrom<IovBounds> for Iov {
    type Error = TypeError;

    fn try_from(bounds: IovBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.since, bounds.until)
    }
}

impl Default for Iov {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Debug for Iov {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iov({self})")
    }
}

impl fmt::Display for Iov {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_open_ended() {
            write!(f, "[{}, MAX)", self.since)
        } else {
            write!(f, "[{}, {})", self.since, self.until)
        }
    }
}
