//! Best-basis extraction from an ordered candidate set.

use super::candidates::{CandidateSet, LowerBound};
use super::engine::EliminationEngine;
use crate::basis::Basis;
use tracing::{debug, warn};

/// Result of one extraction.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Accepted operators, highest bias first. At most `min(n, batch_size)`.
    pub basis: Basis,
    /// Bias and position of the last accepted operator, or the input bound
    /// when nothing was accepted.
    pub lower_bound: LowerBound,
    /// Candidates consumed from the set.
    pub consumed: usize,
    /// Elimination batches run.
    pub batches: usize,
}

/// Extracts the greedy maximum-bias basis from `candidates`.
///
/// Candidates are streamed in search order through batches of
/// `batch_size` columns until the basis has `n` operators, fills a batch,
/// or the set is exhausted. An empty basis is a valid result for
/// degenerate input.
///
/// # Panics
/// Panics if `batch_size` is zero.
#[must_use]
pub fn extract_best_basis(
    candidates: &CandidateSet,
    batch_size: usize,
    lower_bound: LowerBound,
) -> Extraction {
    let mut engine = EliminationEngine::new(
        candidates.variables(),
        batch_size,
        candidates.iter(),
        lower_bound,
    );
    while engine.step().is_some() {}
    let extraction = engine.finish();

    if extraction.basis.is_empty() {
        warn!(
            candidates = candidates.len(),
            "no independent operator found"
        );
    }
    debug!(
        candidates = candidates.len(),
        consumed = extraction.consumed,
        batches = extraction.batches,
        basis = extraction.basis.len(),
        lower_bound = extraction.lower_bound.bias,
        "extracted basis"
    );
    extraction
}
