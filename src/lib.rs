//! Greedy best-basis search for binary datasets.
//!
//! A dataset of `n`-bit records is summarized as a [`Histogram`]. A *spin
//! operator* is a nonzero subset of the variables; its value on a record is
//! the parity of the selected bits, and its *bias* measures how far that
//! parity is from a fair coin. The crate finds `n` linearly independent
//! operators (over GF(2)) that are as biased as possible, a change of
//! coordinates under which the data looks as independent as it can.
//!
//! # Pipeline
//!
//! - [`dataset`] reads records into a [`Histogram`].
//! - [`search`] scores candidate operators and extracts a [`Basis`] with
//!   batched Gaussian elimination ([`gf2`]).
//! - [`basis`] composes and inverts bases and re-expresses data in them.
//! - [`report`] renders the result for people and machines.
//!
//! ```
//! use bestbasis::{Histogram, Mask, SearchConfig, search};
//!
//! let states = [0b111, 0b111, 0b000, 0b100].map(|v| Mask::from_u64(3, v));
//! let histogram = Histogram::from_states(3, states).unwrap();
//! let outcome = search::run(&histogram, &SearchConfig::default());
//! assert_eq!(outcome.basis.len(), 3);
//! assert!(outcome.basis.is_independent());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod basis;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod gf2;
pub mod operator;
pub mod report;
pub mod search;
pub mod util;

#[cfg(test)]
pub(crate) mod test_utils;

pub use basis::{Basis, InverseBasis, InversionError};
pub use config::{BasisConfig, ConfigError, ConfigLoader, SearchConfig, SearchProfile};
pub use dataset::{DatasetError, Histogram};
pub use error::{Error, ErrorKind, Result};
pub use gf2::{BitMatrix, Mask};
pub use operator::Operator;
pub use report::BasisReport;
pub use search::{SearchMode, SearchOutcome, Termination};
