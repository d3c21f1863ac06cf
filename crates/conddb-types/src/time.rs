use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in time, as an unsigned tick counter.
///
/// The system never interprets ticks: whether one tick is a second, a
/// microsecond or a nanosecond is a convention between the caller and
/// whoever wrote the history. The domain is `[0, u64::MAX)`; `u64::MAX`
/// itself is reserved as the open upper bound of an [`Iov`](crate::Iov).
pub type TimePoint = u64;

const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 60.0 * 60.0;

/// Conventional interpretations of a [`TimePoint`] tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    Seconds,
    Microseconds,
    Nanoseconds,
    Picoseconds,
}

impl TimeUnit {
    /// All units, coarsest first.
    pub const ALL: [TimeUnit; 4] = [
        TimeUnit::Seconds,
        TimeUnit::Microseconds,
        TimeUnit::Nanoseconds,
        TimeUnit::Picoseconds,
    ];

    /// Ticks per second under this interpretation.
    pub fn ticks_per_second(&self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Microseconds => 1e6,
            Self::Nanoseconds => 1e9,
            Self::Picoseconds => 1e12,
        }
    }

    /// How many years the full tick range covers under this interpretation.
    pub fn span_years(&self) -> f64 {
        TimePoint::MAX as f64 / (SECONDS_PER_YEAR * self.ticks_per_second())
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds => write!(f, "seconds"),
            Self::Microseconds => write!(f, "microseconds"),
            Self::Nanoseconds => write!(f, "nanoseconds"),
            Self::Picoseconds => write!(f, "picoseconds"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_span_is_hundreds_of_billions_of_years() {
        let years = TimeUnit::Seconds.span_years();
        assert!(years > 5.8e11 && years < 5.9e11, "got {years}");
    }

    #[test]
    fn finer_units_cover_shorter_spans() {
        for pair in TimeUnit::ALL.windows(2) {
            assert!(pair[0].span_years() > pair[1].span_years());
        }
    }

    #[test]
    fn nanoseconds_still_cover_centuries() {
        assert!(TimeUnit::Nanoseconds.span_years() > 500.0);
    }

    #[test]
    fn display_names() {
        assert_eq!(TimeUnit::Picoseconds.to_string(), "picoseconds");
    }
}
