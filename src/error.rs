//! Crate-level error type.
use thiserror::Error as ThisError;

use crate::surfel::SurfelId;

pub type Result<T, E = ReductionError> = std::result::Result<T, E>;

/// Faults recognized by the reduction core.
///
/// Numerical degeneracies are *not* represented here — they never reach
/// the caller as an `Err`. A degenerate contraction is dropped in place
/// and counted on [`crate::reduction::ReductionStats`].
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum ReductionError {
    /// A precondition of [`crate::reduction::create_lod`] was violated:
    /// empty input, `target_count >= total_input_count`, or `neighbors == 0`.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A data-structure invariant was violated: the contraction index lost
    /// bidirectional consistency, or a queue slot pointed at a retired
    /// contraction. This should be unreachable; surfaced with the offending
    /// ids to aid debugging. Checked only in debug builds (`debug_assert!`).
    #[error("internal invariant violated between {a:?} and {b:?}: {detail}")]
    InvariantViolation {
        a: SurfelId,
        b: SurfelId,
        detail: String,
    },
}
