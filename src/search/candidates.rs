//! Candidate generation and pruning.
//!
//! A [`CandidateSet`] holds unique scored operators in search order (bias
//! descending, mask ascending). It always starts from the single-variable
//! operators; the least biased of them sets the initial [`LowerBound`].
//! Higher orders are added one `k` at a time and only when they beat the
//! current bound, and after each extraction everything below the new bound
//! is cut.

use crate::dataset::Histogram;
use crate::gf2::Mask;
use crate::operator::{Operator, score_all};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Number of masks scored per batch when generating candidates.
const SCORE_CHUNK: usize = 4096;

/// Pruning state: the bias of the least informative operator accepted so
/// far and its position in the candidate order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LowerBound {
    /// Bias threshold.
    pub bias: f64,
    /// Position of the operator that set the threshold.
    pub index: usize,
}

impl LowerBound {
    /// A bound that prunes nothing.
    pub const ZERO: Self = Self { bias: 0.0, index: 0 };
}

impl Default for LowerBound {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Ordered set of unique candidate operators.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    variables: usize,
    operators: BTreeSet<Operator>,
}

impl CandidateSet {
    /// Creates an empty set for `variables`-bit operators.
    #[must_use]
    pub fn new(variables: usize) -> Self {
        Self {
            variables,
            operators: BTreeSet::new(),
        }
    }

    /// Creates a set from already scored operators.
    ///
    /// # Panics
    /// Panics if an operator has the wrong width.
    #[must_use]
    pub fn from_operators(variables: usize, operators: impl IntoIterator<Item = Operator>) -> Self {
        let mut set = Self::new(variables);
        for op in operators {
            set.insert(op);
        }
        set
    }

    /// Seeds a set with every single-variable operator.
    ///
    /// The returned bound is the bias of the least biased variable.
    #[must_use]
    pub fn singles(histogram: &Histogram) -> (Self, LowerBound) {
        let n = histogram.variables();
        let masks = (0..n).map(|i| Mask::singleton(n, i)).collect();
        let set = Self::from_operators(n, score_all(masks, histogram));
        let bound = set.operators.last().map_or(LowerBound::ZERO, |least| LowerBound {
            bias: least.bias(),
            index: set.len() - 1,
        });
        debug!(
            variables = n,
            seed_bias = bound.bias,
            "seeded candidates with single variables"
        );
        (set, bound)
    }

    /// Builds the exhaustive candidate set: the single variables plus every
    /// nonzero mask whose bias exceeds the least biased variable.
    ///
    /// # Panics
    /// Panics if the histogram has 64 or more variables.
    #[must_use]
    pub fn exhaustive(histogram: &Histogram) -> (Self, LowerBound) {
        let n = histogram.variables();
        assert!(n < 64, "exhaustive enumeration of {n} variables");
        let (mut set, bound) = Self::singles(histogram);
        let added = set.add_scored(
            (1u64..1u64 << n).map(|value| Mask::from_u64(n, value)),
            histogram,
            bound.bias,
        );
        debug!(
            variables = n,
            added,
            candidates = set.len(),
            "built exhaustive candidate set"
        );
        (set, bound)
    }

    /// Number of variables.
    #[must_use]
    pub const fn variables(&self) -> usize {
        self.variables
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Returns true if there are no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Candidates in search order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Operator> + '_ {
        self.operators.iter()
    }

    /// Inserts an operator; returns false if an identical one is present.
    ///
    /// # Panics
    /// Panics if the operator has the wrong width.
    pub fn insert(&mut self, op: Operator) -> bool {
        assert_eq!(
            op.mask().len(),
            self.variables,
            "operator width does not match candidate set"
        );
        self.operators.insert(op)
    }

    fn add_scored<I>(&mut self, masks: I, histogram: &Histogram, threshold: f64) -> usize
    where
        I: Iterator<Item = Mask>,
    {
        let mut masks = masks.peekable();
        let mut added = 0;
        while masks.peek().is_some() {
            let chunk: Vec<Mask> = masks.by_ref().take(SCORE_CHUNK).collect();
            for op in score_all(chunk, histogram) {
                if op.bias() > threshold {
                    trace!(mask = %op.mask(), bias = op.bias(), "candidate accepted");
                    if self.insert(op) {
                        added += 1;
                    }
                }
            }
        }
        added
    }

    /// Adds every order-`k` operator whose bias exceeds `threshold`.
    ///
    /// Returns the number of new candidates.
    pub fn add_order(&mut self, histogram: &Histogram, k: usize, threshold: f64) -> usize {
        let added = self.add_scored(Combinations::new(self.variables, k), histogram, threshold);
        debug!(
            k,
            threshold,
            added,
            candidates = self.len(),
            "added order-k candidates"
        );
        added
    }

    /// Removes every candidate whose bias is below `bound`.
    ///
    /// Returns the number of removed candidates.
    pub fn cut_small_bias(&mut self, bound: &LowerBound) -> usize {
        let before = self.len();
        self.operators.retain(|op| op.bias() >= bound.bias);
        let removed = before - self.len();
        debug!(
            bound = bound.bias,
            removed,
            kept = self.len(),
            "pruned candidates below lower bound"
        );
        removed
    }
}

/// All masks of exactly `k` set bits out of `n`, in lexicographic order of
/// their bit positions.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    /// Creates the iterator. Yields nothing for `k == 0` or `k > n`.
    #[must_use]
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k == 0 || k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Mask;

    fn next(&mut self) -> Option<Mask> {
        if self.done {
            return None;
        }
        let mask = Mask::from_bits(self.n, self.indices.iter().copied());

        let k = self.indices.len();
        match (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }
        Some(mask)
    }
}
