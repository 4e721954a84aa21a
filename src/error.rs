//! Error types for the CRDT core.

use thiserror::Error;

/// Result type for WOOT sequence operations.
pub type SequenceResult<T> = Result<T, SequenceError>;

/// Errors raised by [`crate::sequence::WSeq`] local operations.
///
/// These are the only fatal errors the sequence engine raises; inability to
/// make progress during `apply_pending` because prerequisites are missing
/// is not an error (see [`crate::sequence::WSeq::apply_pending`]).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    /// A local generate (insert or delete) referenced a visible index that
    /// does not exist.
    #[error("index {index} out of range: sequence has {visible_len} visible element(s)")]
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The number of visible elements at the time of the request.
        visible_len: usize,
    },
}

/// Result type for causal-graph yarn operations.
pub type YarnResult<T> = Result<T, YarnError>;

/// Errors raised by [`crate::causal_graph::Yarn`] and [`crate::causal_graph::CausalGraph`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum YarnError {
    /// `Yarn::merge` was called with a yarn belonging to a different site.
    #[error("cannot merge yarns from different sites")]
    SiteMismatch,

    /// Iteration was attempted past the end of an empty yarn.
    #[error("iterator exhausted on empty yarn")]
    EmptyIterator,

    /// A mutation that the append-only yarn does not support (other than
    /// the explicit, destructive `remove` escape hatch) was attempted.
    #[error("unsupported mutation on append-only yarn: {op}")]
    UnsupportedMutation {
        /// Name of the attempted operation, for diagnostics.
        op: &'static str,
    },
}
