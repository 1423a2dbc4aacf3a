//! GF(2) primitives: bit-vector masks and dense matrices.

pub mod mask;
pub mod matrix;

pub use mask::Mask;
pub use matrix::{BitMatrix, Echelon, EliminationStats, Inversion};

/// Re-expresses `state` in the coordinates given by `rows`.
///
/// Bit `i` of the result is the parity of `rows[i] & state`, so the first
/// row becomes the lowest bit. The result has `rows.len()` bits.
///
/// # Panics
/// Panics if a row's length differs from the state's length.
#[must_use]
pub fn change_coordinates(rows: &[Mask], state: &Mask) -> Mask {
    Mask::from_bits(
        rows.len(),
        rows.iter()
            .enumerate()
            .filter(|(_, row)| row.parity_with(state))
            .map(|(i, _)| i),
    )
}
