//! Best-basis search.
//!
//! Three strategies share one greedy core:
//!
//! - **Exhaustive**: score every nonzero operator (small `n` only).
//! - **Fixed order**: operators up to order `k_max` in the original
//!   variables.
//! - **Representations**: repeat the fixed-order search in the coordinates
//!   of the previous basis until it returns only single variables.
//!
//! [`run`] picks the strategy from a [`SearchConfig`].

pub mod candidates;
pub mod engine;
pub mod exhaustive;
pub mod extract;
pub mod order;
pub mod representation;

pub use candidates::{CandidateSet, Combinations, LowerBound};
pub use engine::{BatchReport, EliminationEngine};
pub use exhaustive::{EXHAUSTIVE_VARIABLE_LIMIT, exhaustive_search};
pub use extract::{Extraction, extract_best_basis};
pub use order::{OrderRound, OrderSearch, bounded_order_search};
pub use representation::{RepresentationSearch, RepresentationStep, representation_search};

use crate::basis::Basis;
use crate::config::SearchConfig;
use crate::dataset::Histogram;
use crate::error::{Error, ErrorKind};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// Below this many variables [`SearchMode::Auto`] searches exhaustively.
pub const AUTO_EXHAUSTIVE_BELOW: usize = 15;

/// Errors raised by search entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Exhaustive search was requested on too many variables.
    #[error("exhaustive search needs fewer than {limit} variables, dataset has {variables}")]
    TooManyVariables {
        /// Variables in the dataset.
        variables: usize,
        /// Exclusive limit.
        limit: usize,
    },
}

impl From<SearchError> for Error {
    fn from(err: SearchError) -> Self {
        Self::new(ErrorKind::InvalidInput).with_message(err.to_string())
    }
}

/// Search strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
    /// Exhaustive below [`AUTO_EXHAUSTIVE_BELOW`] variables, representations
    /// otherwise.
    #[default]
    Auto,
    /// Every nonzero operator.
    Exhaustive,
    /// Operators up to `k_max` in the original variables.
    FixedOrder,
    /// Representation-change loop.
    Representations,
}

impl SearchMode {
    /// Resolves [`SearchMode::Auto`] for `variables`.
    #[must_use]
    pub const fn resolve(self, variables: usize) -> Self {
        match self {
            Self::Auto if variables < AUTO_EXHAUSTIVE_BELOW => Self::Exhaustive,
            Self::Auto => Self::Representations,
            other => other,
        }
    }

    /// Name used in configuration files and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Exhaustive => "exhaustive",
            Self::FixedOrder => "fixed-k",
            Self::Representations => "var-k",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "exhaustive" | "exh" => Ok(Self::Exhaustive),
            "fixed-k" | "fixed" | "fixed_order" => Ok(Self::FixedOrder),
            "var-k" | "representations" | "final" => Ok(Self::Representations),
            other => Err(format!("unknown search mode: {other}")),
        }
    }
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Termination {
    /// A single-pass search finished.
    Complete,
    /// The representation loop reached a single-variable basis.
    Identity,
    /// The representation loop ran out of iterations.
    IterationCap {
        /// Representations searched.
        representations: usize,
    },
    /// The basis had fewer than `n` operators, so the representation could
    /// not change.
    IncompleteBasis {
        /// Operators found.
        size: usize,
    },
}

impl Termination {
    /// True unless the representation loop gave up.
    #[must_use]
    pub const fn is_converged(&self) -> bool {
        matches!(self, Self::Complete | Self::Identity)
    }
}

/// Result of [`run`].
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Strategy actually used.
    pub mode: SearchMode,
    /// Best basis over the original variables.
    pub basis: Basis,
    /// Why the search stopped.
    pub termination: Termination,
    /// Per-order trace of a fixed-order search.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rounds: Vec<OrderRound>,
    /// Iterations of the representation loop.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub representations: Vec<RepresentationStep>,
}

/// Runs the search selected by `config` on `histogram`.
///
/// Exhaustive search on [`EXHAUSTIVE_VARIABLE_LIMIT`] or more variables
/// falls back to the representation loop.
///
/// # Panics
/// Panics if the configuration has a zero batch size or iteration cap;
/// [`SearchConfig::validate`] rejects both.
#[must_use]
pub fn run(histogram: &Histogram, config: &SearchConfig) -> SearchOutcome {
    let n = histogram.variables();
    let mode = config.mode.resolve(n);
    info!(
        requested = %config.mode,
        mode = %mode,
        variables = n,
        records = histogram.total(),
        distinct = histogram.distinct(),
        "starting search"
    );

    if mode == SearchMode::Exhaustive {
        match exhaustive_search(histogram, config.batch_size) {
            Ok(extraction) => {
                return SearchOutcome {
                    mode,
                    basis: extraction.basis,
                    termination: Termination::Complete,
                    rounds: Vec::new(),
                    representations: Vec::new(),
                };
            }
            Err(err) => warn!(%err, "switching to representation search"),
        }
    }

    if mode == SearchMode::FixedOrder {
        let search = bounded_order_search(histogram, config.k_max, config.batch_size);
        return SearchOutcome {
            mode,
            basis: search.basis,
            termination: Termination::Complete,
            rounds: search.rounds,
            representations: Vec::new(),
        };
    }

    let search = representation_search(
        histogram,
        config.k_max,
        config.batch_size,
        config.max_representations,
    );
    SearchOutcome {
        mode: SearchMode::Representations,
        basis: search.basis,
        termination: search.termination,
        rounds: Vec::new(),
        representations: search.steps,
    }
}
