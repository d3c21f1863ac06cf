use thiserror::Error;

/// Malformed input to one of the value types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("not a hex object id: {0}")]
    InvalidHex(String),

    #[error("object ids hold 1 to {max} bytes, got {actual}")]
    InvalidLength { max: usize, actual: usize },

    #[error("interval [{since}, {until}) is empty")]
    EmptyInterval { since: u64, until: u64 },
}
