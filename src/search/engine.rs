//! Streaming GF(2) elimination over a bias-ordered candidate stream.
//!
//! The engine owns the basis found so far and an offset into the candidate
//! stream. Each [`EliminationEngine::step`] builds one batch matrix: the
//! current basis occupies the leftmost columns, followed by the next
//! unconsumed candidates up to the batch size. Row-echelon elimination then
//! keeps the basis columns as pivots and picks, left to right, the
//! candidates independent of everything before them. A batch that runs out
//! of candidates is simply narrower; zero columns would never pivot.

use super::candidates::LowerBound;
use super::extract::Extraction;
use crate::basis::Basis;
use crate::gf2::{BitMatrix, EliminationStats};
use crate::operator::Operator;
use serde::Serialize;
use std::iter::Peekable;
use tracing::debug;

/// Summary of one elimination batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Zero-based batch number.
    pub batch: usize,
    /// Columns in the batch matrix (frozen basis plus fresh candidates).
    pub columns: usize,
    /// Rank of the batch matrix.
    pub rank: usize,
    /// Operators added to the basis by this batch.
    pub added: usize,
    /// Candidates consumed from the stream so far.
    pub consumed: usize,
    /// Row swaps performed.
    pub swaps: usize,
    /// Row additions performed.
    pub row_xors: usize,
}

/// Batched greedy basis extraction.
pub struct EliminationEngine<'a, I>
where
    I: Iterator<Item = &'a Operator>,
{
    source: Peekable<I>,
    variables: usize,
    batch_size: usize,
    offset: usize,
    basis: Vec<Operator>,
    lower_bound: LowerBound,
    batches: usize,
}

impl<'a, I> EliminationEngine<'a, I>
where
    I: Iterator<Item = &'a Operator>,
{
    /// Creates an engine over `candidates`, which must already be in search
    /// order.
    ///
    /// # Panics
    /// Panics if `batch_size` is zero.
    pub fn new(
        variables: usize,
        batch_size: usize,
        candidates: I,
        lower_bound: LowerBound,
    ) -> Self {
        assert!(batch_size > 0, "batch size must be positive");
        Self {
            source: candidates.peekable(),
            variables,
            batch_size,
            offset: 0,
            basis: Vec::new(),
            lower_bound,
            batches: 0,
        }
    }

    /// Operators accepted so far, in acceptance order.
    #[must_use]
    pub fn basis(&self) -> &[Operator] {
        &self.basis
    }

    /// Number of candidates consumed from the stream.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Current lower bound.
    #[must_use]
    pub const fn lower_bound(&self) -> LowerBound {
        self.lower_bound
    }

    /// Returns true once the basis has `n` operators, has filled a batch,
    /// or the stream is exhausted. The first batch always runs.
    pub fn is_finished(&mut self) -> bool {
        self.batches > 0
            && (self.basis.len() >= self.variables
                || self.basis.len() >= self.batch_size
                || self.source.peek().is_none())
    }

    /// Runs one batch. Returns `None` when the engine is finished.
    ///
    /// # Panics
    /// Panics if the elimination bookkeeping is inconsistent: the frozen
    /// basis columns must be the first pivots and every pivot must map to
    /// exactly one accepted operator.
    pub fn step(&mut self) -> Option<BatchReport> {
        if self.is_finished() {
            return None;
        }

        let fixed = self.basis.len();
        let batch_start = self.offset;
        let mut columns: Vec<Operator> = Vec::with_capacity(self.batch_size);
        columns.extend(self.basis.iter().cloned());
        columns.extend(self.source.by_ref().take(self.batch_size - fixed).cloned());
        self.offset += columns.len() - fixed;

        let mut matrix =
            BitMatrix::from_columns(self.variables, columns.iter().map(Operator::mask));
        let echelon = matrix.eliminate();

        assert!(
            echelon.leads.len() >= fixed && echelon.leads[..fixed].iter().copied().eq(0..fixed),
            "frozen basis columns lost their pivots: {:?}",
            &echelon.leads[..fixed.min(echelon.leads.len())]
        );
        let fresh_leads = &echelon.leads[fixed..];
        if let Some(&last) = fresh_leads.last() {
            self.lower_bound = LowerBound {
                bias: columns[last].bias(),
                index: batch_start + (last - fixed),
            };
        }
        self.basis.extend(fresh_leads.iter().map(|&lead| columns[lead].clone()));
        assert_eq!(
            self.basis.len(),
            echelon.rank(),
            "accepted operators do not match pivot count"
        );

        let EliminationStats {
            swaps, row_xors, ..
        } = echelon.stats;
        let report = BatchReport {
            batch: self.batches,
            columns: matrix.cols(),
            rank: echelon.rank(),
            added: fresh_leads.len(),
            consumed: self.offset,
            swaps,
            row_xors,
        };
        self.batches += 1;
        debug!(
            batch = report.batch,
            columns = report.columns,
            rank = report.rank,
            added = report.added,
            consumed = report.consumed,
            lower_bound = self.lower_bound.bias,
            "elimination batch done"
        );
        Some(report)
    }

    /// Consumes the engine, returning the basis and updated bound.
    #[must_use]
    pub fn finish(self) -> Extraction {
        Extraction {
            basis: Basis::new(self.variables, self.basis),
            lower_bound: self.lower_bound,
            consumed: self.offset,
            batches: self.batches,
        }
    }
}
