//! Errors reported by the durable stores.

use std::fmt;
use thiserror::Error;

/// The uniquely-constrained mapping field that rejected an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Original,
    Short,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => f.write_str("original"),
            Self::Short => f.write_str("short"),
        }
    }
}

/// Failure of a counter or mapping store operation.
///
/// Messages may carry driver detail and are meant for logs only; they are
/// never rendered to HTTP callers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached, or the operation timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// An insert collided with an existing mapping.
    #[error("duplicate key on `{0}`")]
    DuplicateKey(UniqueField),

    /// The named counter has no record to increment.
    #[error("counter `{0}` does not exist")]
    CounterMissing(String),

    /// Any other query or decoding failure.
    #[error("store query failed: {0}")]
    Query(String),
}
