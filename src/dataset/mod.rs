//! Datasets of binary records and their histograms.
//!
//! The search core only ever sees a [`Histogram`]: the distinct observed
//! states with their counts. This module also provides the thin I/O layer
//! that builds one from a text file and writes records back out in a new
//! basis, plus a seeded generator of datasets with planted structure.

pub mod histogram;
pub mod reader;
pub mod synthetic;

pub use histogram::Histogram;
pub use reader::{
    convert_file, converted_path, load_histogram, parse_record, read_histogram, write_converted,
};

use crate::error::{Error, ErrorKind};

/// Errors raised while building or reading datasets.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Reading or writing failed.
    #[error("dataset I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No records were found (N = 0).
    #[error("dataset contains no records")]
    Empty,

    /// The variable count is zero or could not be determined.
    #[error("variable count must be at least 1")]
    ZeroWidth,

    /// A state does not have the histogram's width.
    #[error("state has {actual} bits, expected {expected}")]
    WidthMismatch {
        /// Width of the histogram.
        expected: usize,
        /// Width of the offending state.
        actual: usize,
    },
}

impl From<DatasetError> for Error {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::Io(io) => Self::from(io),
            DatasetError::Empty => Self::empty_dataset(),
            other @ (DatasetError::ZeroWidth | DatasetError::WidthMismatch { .. }) => {
                Self::new(ErrorKind::InvalidDataset).with_message(other.to_string())
            }
        }
    }
}
