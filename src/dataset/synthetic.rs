//! Seeded datasets with a planted basis.
//!
//! Each record draws `n` independent hidden bits, bit `i` being 1 with
//! probability `(1 - bias_i) / 2`, and mixes them through a random
//! invertible GF(2) map. The planted rows undo that map, so they are the
//! operators whose biases are `bias_i`; every other operator is a XOR of
//! planted rows and its bias is the product of theirs.

use super::{DatasetError, Histogram};
use crate::gf2::{BitMatrix, Inversion, Mask, change_coordinates};
use crate::util::DetRng;
use tracing::debug;

/// A synthetic dataset together with the structure planted in it.
#[derive(Debug, Clone)]
pub struct PlantedDataset {
    /// Histogram of the generated records.
    pub histogram: Histogram,
    /// Operators that recover the hidden bits, in the order of the biases.
    pub rows: Vec<Mask>,
    /// Target bias of each planted operator.
    pub biases: Vec<f64>,
}

/// Draws random `n x n` matrices until one is invertible.
///
/// Returns `(rows, inverse_rows)` such that re-expressing a state with
/// `rows` and then with `inverse_rows` gives the state back.
pub fn random_invertible(rng: &mut DetRng, n: usize) -> (Vec<Mask>, Vec<Mask>) {
    let mut attempts = 0usize;
    loop {
        attempts += 1;
        let rows: Vec<Mask> = (0..n).map(|_| rng.next_mask(n)).collect();
        // Column j of the inverse of the transposed matrix is row j of the
        // inverse map.
        if let Inversion::Invertible(inverse) = BitMatrix::from_columns(n, &rows).invert() {
            debug!(n, attempts, "drew invertible mixing matrix");
            let inverse_rows = (0..n).map(|j| inverse.column(j)).collect();
            return (rows, inverse_rows);
        }
    }
}

/// Generates `records` records with planted operator biases `biases`.
///
/// # Errors
///
/// Returns [`DatasetError::ZeroWidth`] when `biases` is empty and
/// [`DatasetError::Empty`] when `records` is zero.
pub fn planted(seed: u64, biases: &[f64], records: usize) -> Result<PlantedDataset, DatasetError> {
    let n = biases.len();
    if n == 0 {
        return Err(DatasetError::ZeroWidth);
    }
    let mut rng = DetRng::new(seed);
    let (rows, inverse_rows) = random_invertible(&mut rng, n);
    let p_one: Vec<f64> = biases.iter().map(|b| (1.0 - b) / 2.0).collect();

    let states = (0..records).map(|_| {
        let hidden = Mask::from_bits(n, (0..n).filter(|&i| rng.bernoulli(p_one[i])));
        change_coordinates(&inverse_rows, &hidden)
    });
    let histogram = Histogram::from_states(n, states)?;

    Ok(PlantedDataset {
        histogram,
        rows,
        biases: biases.to_vec(),
    })
}

/// Generates `records` uniformly random states of `n` bits.
///
/// # Errors
///
/// Same as [`planted`].
pub fn uniform(seed: u64, n: usize, records: usize) -> Result<Histogram, DatasetError> {
    let mut rng = DetRng::new(seed);
    Histogram::from_states(n, (0..records).map(|_| rng.next_mask(n)))
}
