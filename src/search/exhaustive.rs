//! Exhaustive search over every nonzero operator.

use super::SearchError;
use super::candidates::CandidateSet;
use super::extract::{Extraction, extract_best_basis};
use crate::dataset::Histogram;
use tracing::info;

/// Exhaustive search is only run on fewer variables than this.
pub const EXHAUSTIVE_VARIABLE_LIMIT: usize = 25;

/// Scores all `2^n - 1` operators and extracts the greedy best basis.
///
/// # Errors
///
/// Returns [`SearchError::TooManyVariables`] when `n` is at least
/// [`EXHAUSTIVE_VARIABLE_LIMIT`].
///
/// # Panics
/// Panics if `batch_size` is zero.
pub fn exhaustive_search(
    histogram: &Histogram,
    batch_size: usize,
) -> Result<Extraction, SearchError> {
    let n = histogram.variables();
    if n >= EXHAUSTIVE_VARIABLE_LIMIT {
        return Err(SearchError::TooManyVariables {
            variables: n,
            limit: EXHAUSTIVE_VARIABLE_LIMIT,
        });
    }
    let (set, bound) = CandidateSet::exhaustive(histogram);
    let extraction = extract_best_basis(&set, batch_size, bound);
    info!(
        variables = n,
        candidates = set.len(),
        basis = extraction.basis.len(),
        lower_bound = extraction.lower_bound.bias,
        "exhaustive search done"
    );
    Ok(extraction)
}
