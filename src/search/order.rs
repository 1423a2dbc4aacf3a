//! Bounded-order search in a fixed representation.
//!
//! Starting from the single variables, operators of order `k = 2..=k_max`
//! are added one order at a time. After each order the basis is extracted
//! again and candidates that fell below the new lower bound are dropped.

use super::candidates::{CandidateSet, LowerBound};
use super::extract::extract_best_basis;
use crate::basis::Basis;
use crate::dataset::Histogram;
use serde::Serialize;
use tracing::info;

/// Trace of one order of the bounded-order search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderRound {
    /// Operator order added in this round.
    pub order: usize,
    /// New candidates of this order.
    pub added: usize,
    /// Candidates available to the extraction.
    pub candidates: usize,
    /// Candidates kept after pruning.
    pub kept: usize,
    /// Size of the extracted basis.
    pub basis_size: usize,
    /// Lower bound after the extraction.
    pub lower_bound: LowerBound,
}

/// Result of a bounded-order search.
#[derive(Debug, Clone)]
pub struct OrderSearch {
    /// Basis after the last order.
    pub basis: Basis,
    /// Lower bound after the last order.
    pub lower_bound: LowerBound,
    /// One entry per order.
    pub rounds: Vec<OrderRound>,
}

/// Searches operators up to order `k_max` (at least 2) in the histogram's
/// own coordinates.
///
/// Orders above `n` contribute no candidates and are skipped.
///
/// # Panics
/// Panics if `batch_size` is zero.
#[must_use]
pub fn bounded_order_search(histogram: &Histogram, k_max: usize, batch_size: usize) -> OrderSearch {
    let n = histogram.variables();
    let top = k_max.max(2).min(n.max(2));
    let (mut set, mut bound) = CandidateSet::singles(histogram);
    let mut basis = Basis::empty(n);
    let mut rounds = Vec::with_capacity(top - 1);

    for k in 2..=top {
        let added = set.add_order(histogram, k, bound.bias);
        let candidates = set.len();
        let extraction = extract_best_basis(&set, batch_size, bound);
        bound = extraction.lower_bound;
        basis = extraction.basis;
        set.cut_small_bias(&bound);

        let round = OrderRound {
            order: k,
            added,
            candidates,
            kept: set.len(),
            basis_size: basis.len(),
            lower_bound: bound,
        };
        info!(
            order = k,
            added,
            candidates,
            kept = round.kept,
            basis = basis.len(),
            lower_bound = bound.bias,
            "order searched"
        );
        rounds.push(round);
    }

    OrderSearch {
        basis,
        lower_bound: bound,
        rounds,
    }
}
