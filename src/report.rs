//! Rendering of a best basis.
//!
//! [`BasisReport`] collects everything a caller prints about a basis: each
//! operator with its empirical statistics, the log-likelihood of the
//! independent model the basis defines, and optionally the inverse basis.
//! It implements [`Display`](fmt::Display) for terminals and [`Serialize`]
//! for JSON output.

use crate::basis::{Basis, InversionError};
use crate::dataset::Histogram;
use crate::operator::Operator;
use crate::search::{SearchMode, SearchOutcome, Termination};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Statistics of one basis operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorReport {
    /// 1-based position in the basis.
    pub index: usize,
    /// Mask as a bit string, highest variable first.
    pub bits: String,
    /// 1-based indices of the variables combined.
    pub variables: Vec<usize>,
    /// Number of variables combined.
    pub order: usize,
    /// Bias `|1 - 2 p1|`.
    pub bias: f64,
    /// Records on which the operator is 1.
    pub count1: u64,
    /// Empirical probability that the operator is 1.
    pub p1: f64,
    /// Mean of the operator in the ±1 convention, `1 - 2 p1`.
    pub mean: f64,
    /// Per-record log-likelihood, `p1 ln p1 + (1 - p1) ln(1 - p1)`.
    pub log_likelihood: f64,
}

impl OperatorReport {
    fn new(index: usize, op: &Operator, total: u64) -> Self {
        let p1 = op.probability_one(total);
        Self {
            index,
            bits: op.mask().to_bit_string(),
            variables: op.mask().ones().map(|i| i + 1).collect(),
            order: op.order(),
            bias: op.bias(),
            count1: op.count1(),
            p1,
            mean: 1.0 - 2.0 * p1,
            log_likelihood: bernoulli_log_likelihood(p1),
        }
    }
}

/// The inverse basis, or why it is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InverseReport {
    /// Row `j` recovers original variable `j + 1` from the new coordinates.
    Available {
        /// Bit strings over the new coordinates.
        rows: Vec<String>,
    },
    /// The basis cannot be inverted.
    Unavailable {
        /// Reason.
        reason: String,
    },
}

/// Summary of how the basis was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    /// Strategy used.
    pub mode: SearchMode,
    /// Why the search stopped.
    pub termination: Termination,
    /// Representations searched (0 for single-pass strategies).
    pub representations: usize,
}

/// Printable and serializable view of a basis over a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasisReport {
    /// Number of variables.
    pub variables: usize,
    /// Number of records.
    pub records: u64,
    /// Distinct states.
    pub distinct: usize,
    /// How the basis was found, when it came from [`crate::search::run`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSummary>,
    /// Operators in basis order.
    pub operators: Vec<OperatorReport>,
    /// Number of operators per order.
    pub orders: BTreeMap<usize, usize>,
    /// Whether the operators are linearly independent.
    pub independent: bool,
    /// Sum of the per-operator log-likelihoods, i.e. `LogL / N`.
    pub log_likelihood_per_record: f64,
    /// `-LogL / N / ln 2`, the model's code length per record.
    pub bits_per_record: f64,
    /// Inverse basis, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse: Option<InverseReport>,
}

impl BasisReport {
    /// Builds the report for `basis` scored on `histogram`.
    #[must_use]
    pub fn new(basis: &Basis, histogram: &Histogram) -> Self {
        let total = histogram.total();
        let operators: Vec<OperatorReport> = basis
            .iter()
            .enumerate()
            .map(|(idx, op)| OperatorReport::new(idx + 1, op, total))
            .collect();
        let log_likelihood: f64 = operators.iter().map(|op| op.log_likelihood).sum();
        Self {
            variables: basis.variables(),
            records: total,
            distinct: histogram.distinct(),
            search: None,
            orders: basis.order_histogram(),
            independent: basis.is_independent(),
            log_likelihood_per_record: log_likelihood,
            bits_per_record: -log_likelihood / std::f64::consts::LN_2,
            operators,
            inverse: None,
        }
    }

    /// Builds the report for the basis a search produced.
    #[must_use]
    pub fn from_outcome(outcome: &SearchOutcome, histogram: &Histogram) -> Self {
        let mut report = Self::new(&outcome.basis, histogram);
        report.search = Some(SearchSummary {
            mode: outcome.mode,
            termination: outcome.termination,
            representations: outcome.representations.len(),
        });
        report
    }

    /// Adds the inverse of `basis` to the report.
    #[must_use]
    pub fn with_inverse(mut self, basis: &Basis) -> Self {
        self.inverse = Some(match basis.invert() {
            Ok(inverse) => InverseReport::Available {
                rows: inverse.rows().iter().map(|row| row.to_bit_string()).collect(),
            },
            Err(err) => InverseReport::Unavailable {
                reason: inversion_reason(err),
            },
        });
        self
    }
}

fn inversion_reason(err: InversionError) -> String {
    format!("inversion not available: {err}")
}

/// Log-likelihood per record of a Bernoulli variable, 0 at the endpoints.
#[must_use]
pub fn bernoulli_log_likelihood(p1: f64) -> f64 {
    if p1 <= 0.0 || p1 >= 1.0 {
        return 0.0;
    }
    p1 * p1.ln() + (1.0 - p1) * (1.0 - p1).ln()
}

impl fmt::Display for BasisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Best basis: {} operators over {} variables ({} records, {} distinct)",
            self.operators.len(),
            self.variables,
            self.records,
            self.distinct
        )?;
        if let Some(search) = &self.search {
            write!(f, "Search: {}", search.mode)?;
            match search.termination {
                Termination::Complete => writeln!(f)?,
                Termination::Identity => writeln!(
                    f,
                    ", converged after {} representations",
                    search.representations
                )?,
                Termination::IterationCap { representations } => writeln!(
                    f,
                    ", NOT converged after {representations} representations"
                )?,
                Termination::IncompleteBasis { size } => {
                    writeln!(f, ", stopped with an incomplete basis of {size}")?;
                }
            }
        }
        writeln!(f)?;

        let width = self.variables.max("operator".len());
        writeln!(
            f,
            "{:>4}  {:<width$}  {:>5}  {:>8}  {:>8}  {:>9}  variables",
            "#", "operator", "order", "p1", "<Op>", "LogL"
        )?;
        for op in &self.operators {
            let vars: Vec<String> = op.variables.iter().map(ToString::to_string).collect();
            writeln!(
                f,
                "{:>4}  {:<width$}  {:>5}  {:>8.5}  {:>8.5}  {:>9.5}  {}",
                op.index,
                op.bits,
                op.order,
                op.p1,
                op.mean,
                op.log_likelihood,
                vars.join(",")
            )?;
        }
        writeln!(f)?;

        let orders: Vec<String> = self
            .orders
            .iter()
            .map(|(order, count)| format!("k={order}: {count}"))
            .collect();
        writeln!(f, "Orders: {}", orders.join(", "))?;
        writeln!(
            f,
            "Independent: {}",
            if self.independent { "yes" } else { "no" }
        )?;
        writeln!(f, "LogL/N = {:.6}", self.log_likelihood_per_record)?;
        writeln!(f, "Bits per record = {:.6}", self.bits_per_record)?;

        match &self.inverse {
            Some(InverseReport::Available { rows }) => {
                writeln!(f)?;
                writeln!(f, "Inverse basis (original variable <- new coordinates):")?;
                for (idx, row) in rows.iter().enumerate() {
                    writeln!(f, "{:>4}  {row}", idx + 1)?;
                }
            }
            Some(InverseReport::Unavailable { reason }) => {
                writeln!(f)?;
                writeln!(f, "Inverse basis: {reason}")?;
            }
            None => {}
        }
        Ok(())
    }
}
