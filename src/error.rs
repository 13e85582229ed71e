//! Failure outcomes of construction and growth.

use thiserror::Error;

/// Why a table could not be built or could not grow.
///
/// Both variants mean the same thing to an `insert` caller: the table cannot
/// take more entries right now and is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// Backing storage for a generation could not be obtained.
    #[error("failed to allocate a generation of {capacity} slots")]
    AllocationFailure { capacity: usize },
    /// The growth sequence has no entry at `index`.
    #[error("growth sequence exhausted at generation {index}")]
    GrowthExhausted { index: usize },
}
