//! The representation-change loop.
//!
//! Each iteration runs the bounded-order search on the dataset in its
//! current coordinates. If the basis found contains any operator of order
//! two or more, the dataset is re-expressed in that basis and the search
//! repeats; the bases are composed so the result is always expressed in
//! the original variables. The loop ends when the search returns only
//! single variables, or after `max_representations` searches.

use super::Termination;
use super::order::{OrderRound, bounded_order_search};
use crate::basis::Basis;
use crate::dataset::Histogram;
use serde::Serialize;
use tracing::{info, warn};

/// One iteration of the loop.
#[derive(Debug, Clone, Serialize)]
pub struct RepresentationStep {
    /// Zero-based representation index (0 = original variables).
    pub index: usize,
    /// Basis found, over this representation's coordinates.
    pub basis: Basis,
    /// Composition of all bases so far, over the original variables.
    pub cumulative: Basis,
    /// Per-order trace of the search.
    pub rounds: Vec<OrderRound>,
    /// Whether `basis` contains only single variables.
    pub identity: bool,
}

/// Result of the representation-change loop.
#[derive(Debug, Clone)]
pub struct RepresentationSearch {
    /// Final basis over the original variables.
    pub basis: Basis,
    /// Every iteration, in order.
    pub steps: Vec<RepresentationStep>,
    /// Why the loop stopped.
    pub termination: Termination,
}

/// Runs the representation-change loop.
///
/// # Panics
/// Panics if `batch_size` or `max_representations` is zero.
#[must_use]
pub fn representation_search(
    histogram: &Histogram,
    k_max: usize,
    batch_size: usize,
    max_representations: usize,
) -> RepresentationSearch {
    assert!(max_representations > 0, "need at least one representation");
    let n = histogram.variables();
    let mut current = histogram.clone();
    let mut cumulative: Option<Basis> = None;
    let mut steps: Vec<RepresentationStep> = Vec::new();

    let termination = loop {
        let index = steps.len();
        let search = bounded_order_search(&current, k_max, batch_size);
        let local = search.basis;
        let identity = local.is_identity();
        let composed = match &cumulative {
            Some(previous) => previous.compose(&local),
            None => local.clone(),
        };
        info!(
            representation = index,
            distinct = current.distinct(),
            basis = local.len(),
            identity,
            orders = ?local.order_histogram(),
            "representation searched"
        );
        steps.push(RepresentationStep {
            index,
            basis: local.clone(),
            cumulative: composed.clone(),
            rounds: search.rounds,
            identity,
        });
        cumulative = Some(composed);

        if local.len() < n {
            warn!(
                representation = index,
                found = local.len(),
                variables = n,
                "basis incomplete, cannot change representation"
            );
            break Termination::IncompleteBasis { size: local.len() };
        }
        if identity {
            break Termination::Identity;
        }
        if steps.len() >= max_representations {
            warn!(
                representations = steps.len(),
                "representation loop did not converge"
            );
            break Termination::IterationCap {
                representations: steps.len(),
            };
        }
        current = local.transform_histogram(&current);
    };

    RepresentationSearch {
        basis: cumulative.unwrap_or_else(|| Basis::empty(n)),
        steps,
        termination,
    }
}
