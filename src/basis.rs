//! Bases of independent operators.
//!
//! A [`Basis`] is an ordered list of operators over `n` variables. Applied
//! to a state it yields new coordinates: bit `i` is the value of operator
//! `i`. A complete basis (`n` independent operators) is a change of
//! coordinates and can be inverted.

use crate::dataset::Histogram;
use crate::error::{Error, ErrorKind};
use crate::gf2::{BitMatrix, Inversion, Mask, change_coordinates};
use crate::operator::Operator;
use serde::Serialize;
use std::collections::BTreeMap;

/// Reasons a basis cannot be inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InversionError {
    /// The basis does not have exactly one operator per variable.
    #[error("inversion not available: basis has {size} operators for {n} variables")]
    SizeMismatch {
        /// Number of operators.
        size: usize,
        /// Number of variables.
        n: usize,
    },

    /// The operators are not independent.
    #[error("inversion not available: basis has rank {rank} < {n}")]
    RankDeficient {
        /// Rank reached during elimination.
        rank: usize,
        /// Number of variables.
        n: usize,
    },
}

impl From<InversionError> for Error {
    fn from(err: InversionError) -> Self {
        Self::new(ErrorKind::InvalidInput)
            .with_message(err.to_string())
            .with_source(err)
    }
}

/// An ordered set of operators over `variables` bits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Basis {
    variables: usize,
    operators: Vec<Operator>,
}

impl Basis {
    /// Creates a basis from operators.
    ///
    /// # Panics
    /// Panics if an operator's width differs from `variables`.
    #[must_use]
    pub fn new(variables: usize, operators: Vec<Operator>) -> Self {
        for op in &operators {
            assert_eq!(
                op.mask().len(),
                variables,
                "operator {} does not have {variables} bits",
                op.mask()
            );
        }
        Self {
            variables,
            operators,
        }
    }

    /// A basis with no operators.
    #[must_use]
    pub fn empty(variables: usize) -> Self {
        Self {
            variables,
            operators: Vec::new(),
        }
    }

    /// The single-variable basis in variable order, scored on `histogram`.
    #[must_use]
    pub fn identity(histogram: &Histogram) -> Self {
        let n = histogram.variables();
        Self::new(
            n,
            (0..n)
                .map(|i| Operator::score(Mask::singleton(n, i), histogram))
                .collect(),
        )
    }

    /// Number of variables of the space the operators act on.
    #[must_use]
    pub const fn variables(&self) -> usize {
        self.variables
    }

    /// Number of operators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Returns true if the basis has no operators.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Operators in order.
    #[must_use]
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Iterates over the operators.
    pub fn iter(&self) -> std::slice::Iter<'_, Operator> {
        self.operators.iter()
    }

    /// Masks of the operators, in order.
    #[must_use]
    pub fn masks(&self) -> Vec<Mask> {
        self.operators.iter().map(|op| op.mask().clone()).collect()
    }

    /// True when every operator is a single variable.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.operators.iter().all(|op| op.order() == 1)
    }

    /// GF(2) rank of the operators.
    #[must_use]
    pub fn rank(&self) -> usize {
        BitMatrix::from_columns(self.variables, self.operators.iter().map(Operator::mask)).rank()
    }

    /// True when the operators are linearly independent.
    #[must_use]
    pub fn is_independent(&self) -> bool {
        self.rank() == self.len()
    }

    /// True when the basis has `n` independent operators.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.len() == self.variables && self.is_independent()
    }

    /// Re-expresses one state: bit `i` is the value of operator `i`.
    #[must_use]
    pub fn transform_state(&self, state: &Mask) -> Mask {
        change_coordinates(&self.masks(), state)
    }

    /// Re-expresses every record of `histogram`.
    ///
    /// # Panics
    /// Panics if the basis is empty.
    #[must_use]
    pub fn transform_histogram(&self, histogram: &Histogram) -> Histogram {
        histogram.transform(&self.masks())
    }

    /// Expresses `next`, a basis over this basis's coordinates, in this
    /// basis's original variables.
    ///
    /// Each operator of `next` becomes the XOR of the operators of `self`
    /// selected by its set bits. Scores carry over unchanged, since an
    /// operator takes the same value on a record in either coordinate
    /// system.
    ///
    /// # Panics
    /// Panics if `next` is not over `self.len()` variables.
    #[must_use]
    pub fn compose(&self, next: &Self) -> Self {
        assert_eq!(
            next.variables,
            self.len(),
            "cannot compose a basis over {} coordinates onto {} operators",
            next.variables,
            self.len()
        );
        let operators = next
            .operators
            .iter()
            .map(|op| {
                let mut mask = Mask::zeros(self.variables);
                for i in op.mask().ones() {
                    mask.xor_assign(self.operators[i].mask());
                }
                Operator::from_parts(mask, op.bias(), op.count1())
            })
            .collect();
        Self {
            variables: self.variables,
            operators,
        }
    }

    /// Number of operators of each order.
    #[must_use]
    pub fn order_histogram(&self) -> BTreeMap<usize, usize> {
        let mut histogram = BTreeMap::new();
        for op in &self.operators {
            *histogram.entry(op.order()).or_insert(0) += 1;
        }
        histogram
    }

    /// Computes the inverse coordinate change.
    ///
    /// # Errors
    ///
    /// Returns [`InversionError::SizeMismatch`] unless the basis has exactly
    /// `n` operators, and [`InversionError::RankDeficient`] when they are not
    /// independent.
    pub fn invert(&self) -> Result<InverseBasis, InversionError> {
        let n = self.variables;
        if self.len() != n {
            return Err(InversionError::SizeMismatch {
                size: self.len(),
                n,
            });
        }
        let matrix = BitMatrix::from_columns(n, self.operators.iter().map(Operator::mask));
        match matrix.invert() {
            // Column j of the inverted matrix recovers variable j.
            Inversion::Invertible(inverse) => Ok(InverseBasis {
                rows: (0..n).map(|j| inverse.column(j)).collect(),
            }),
            Inversion::Singular { rank } => Err(InversionError::RankDeficient { rank, n }),
        }
    }
}

impl<'a> IntoIterator for &'a Basis {
    type Item = &'a Operator;
    type IntoIter = std::slice::Iter<'a, Operator>;

    fn into_iter(self) -> Self::IntoIter {
        self.operators.iter()
    }
}

/// The inverse of a complete basis.
///
/// Row `j` is a mask over the new coordinates whose value is original
/// variable `j`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InverseBasis {
    rows: Vec<Mask>,
}

impl InverseBasis {
    /// Inverse operators, one per original variable.
    #[must_use]
    pub fn rows(&self) -> &[Mask] {
        &self.rows
    }

    /// Maps a state in new coordinates back to the original variables.
    #[must_use]
    pub fn apply(&self, state: &Mask) -> Mask {
        change_coordinates(&self.rows, state)
    }
}
