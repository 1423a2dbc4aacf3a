//! Dense GF(2) matrices with row-echelon and Gauss-Jordan elimination.
//!
//! Rows are variables (bit positions of a mask), columns are operators.
//! Each row is packed into `stride` words inside one contiguous buffer, so
//! row swaps and row additions touch whole words at a time.
//!
//! # Determinism
//!
//! Pivot search always takes the first eligible row scanning downward from
//! the current lead row, and columns are visited strictly left to right.
//! Given columns sorted by descending bias this is the greedy selection of
//! the highest-bias independent operators.

use super::mask::Mask;

// ============================================================================
// Statistics
// ============================================================================

/// Counters collected during elimination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EliminationStats {
    /// Number of row swaps performed.
    pub swaps: usize,
    /// Number of row additions (XORs).
    pub row_xors: usize,
    /// Number of columns that produced no pivot.
    pub skipped_columns: usize,
}

/// Output of forward elimination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Echelon {
    /// Lead (pivot) column indices in increasing order.
    pub leads: Vec<usize>,
    /// Work counters.
    pub stats: EliminationStats,
}

impl Echelon {
    /// Rank of the eliminated matrix.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.leads.len()
    }
}

/// Result of attempting to invert a square matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inversion {
    /// The matrix has full rank; holds its inverse.
    Invertible(BitMatrix),
    /// The matrix is singular; holds the rank reached.
    Singular {
        /// Number of pivots found.
        rank: usize,
    },
}

// ============================================================================
// BitMatrix
// ============================================================================

/// A dense `rows x cols` matrix over GF(2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    rows: usize,
    cols: usize,
    stride: usize,
    data: Vec<u64>,
}

impl BitMatrix {
    /// Creates an all-zero matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        let stride = cols.div_ceil(64);
        Self {
            rows,
            cols,
            stride,
            data: vec![0; rows * stride],
        }
    }

    /// Creates the `n x n` identity matrix.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut matrix = Self::zeros(n, n);
        for i in 0..n {
            matrix.set(i, i, true);
        }
        matrix
    }

    /// Builds a matrix whose column `j` is `columns[j]`, bit `i` in row `i`.
    ///
    /// # Panics
    /// Panics if a column's length differs from `rows`.
    #[must_use]
    pub fn from_columns<'a, I>(rows: usize, columns: I) -> Self
    where
        I: IntoIterator<Item = &'a Mask>,
        I::IntoIter: ExactSizeIterator,
    {
        let columns = columns.into_iter();
        let mut matrix = Self::zeros(rows, columns.len());
        for (j, column) in columns.enumerate() {
            assert_eq!(
                column.len(),
                rows,
                "column {j} has {} bits, matrix has {rows} rows",
                column.len()
            );
            for i in column.ones() {
                matrix.set(i, j, true);
            }
        }
        matrix
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Returns entry `(row, col)`.
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> bool {
        assert!(
            row < self.rows && col < self.cols,
            "entry ({row}, {col}) out of bounds ({}x{})",
            self.rows,
            self.cols
        );
        (self.data[row * self.stride + col / 64] >> (col % 64)) & 1 == 1
    }

    /// Sets entry `(row, col)`.
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        assert!(
            row < self.rows && col < self.cols,
            "entry ({row}, {col}) out of bounds ({}x{})",
            self.rows,
            self.cols
        );
        let word = &mut self.data[row * self.stride + col / 64];
        let bit = 1u64 << (col % 64);
        if value {
            *word |= bit;
        } else {
            *word &= !bit;
        }
    }

    /// Extracts column `col` as a mask of length `rows`.
    #[must_use]
    pub fn column(&self, col: usize) -> Mask {
        Mask::from_bits(self.rows, (0..self.rows).filter(|&i| self.get(i, col)))
    }

    /// Extracts row `row` as a mask of length `cols`.
    #[must_use]
    pub fn row(&self, row: usize) -> Mask {
        Mask::from_bits(self.cols, (0..self.cols).filter(|&j| self.get(row, j)))
    }

    /// Swaps rows `a` and `b`.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.data.split_at_mut(hi * self.stride);
        head[lo * self.stride..(lo + 1) * self.stride].swap_with_slice(&mut tail[..self.stride]);
    }

    /// Adds row `src` into row `dst`, starting at word `from_word`.
    ///
    /// Words before `from_word` must be zero in `src`.
    fn xor_row_from(&mut self, src: usize, dst: usize, from_word: usize) {
        debug_assert_ne!(src, dst);
        let stride = self.stride;
        let (src_row, dst_row) = if src < dst {
            let (head, tail) = self.data.split_at_mut(dst * stride);
            (&head[src * stride..(src + 1) * stride], &mut tail[..stride])
        } else {
            let (head, tail) = self.data.split_at_mut(src * stride);
            (&tail[..stride], &mut head[dst * stride..(dst + 1) * stride])
        };
        for (d, s) in dst_row[from_word..].iter_mut().zip(&src_row[from_word..]) {
            *d ^= s;
        }
    }

    /// Adds row `src` into row `dst`.
    ///
    /// # Panics
    /// Panics if `src == dst` or either row is out of bounds.
    pub fn xor_row(&mut self, src: usize, dst: usize) {
        assert!(src != dst, "cannot add row {src} to itself");
        assert!(src < self.rows && dst < self.rows, "row out of bounds");
        self.xor_row_from(src, dst, 0);
    }

    fn find_pivot(&self, col: usize, from_row: usize) -> Option<usize> {
        let word = col / 64;
        let bit = 1u64 << (col % 64);
        (from_row..self.rows).find(|&i| self.data[i * self.stride + word] & bit != 0)
    }

    /// Forward Gaussian elimination to row-echelon form.
    ///
    /// Columns are scanned left to right. For each column the first row at
    /// or below the current lead row holding a 1 becomes the pivot; it is
    /// swapped into the lead row and added into every lower row with a 1 in
    /// that column. Rows above the pivot are left untouched.
    ///
    /// Returns the lead columns in increasing order.
    pub fn eliminate(&mut self) -> Echelon {
        let mut echelon = Echelon::default();
        let mut lead_row = 0;

        for col in 0..self.cols {
            if lead_row == self.rows {
                break;
            }
            let Some(pivot) = self.find_pivot(col, lead_row) else {
                echelon.stats.skipped_columns += 1;
                continue;
            };
            if pivot != lead_row {
                self.swap_rows(pivot, lead_row);
                echelon.stats.swaps += 1;
            }

            // The pivot row is zero left of `col`, so whole words before it
            // can be skipped.
            let from_word = col / 64;
            let bit = 1u64 << (col % 64);
            for row in lead_row + 1..self.rows {
                if self.data[row * self.stride + from_word] & bit != 0 {
                    self.xor_row_from(lead_row, row, from_word);
                    echelon.stats.row_xors += 1;
                }
            }

            echelon.leads.push(col);
            lead_row += 1;
        }

        echelon
    }

    /// Rank over GF(2). Does not modify `self`.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.clone().eliminate().rank()
    }

    /// Gauss-Jordan inversion of a square matrix.
    ///
    /// Every row operation is mirrored into an identity matrix; pivots clear
    /// their column both below and above. When all `n` pivots are found the
    /// mirrored matrix is the inverse.
    ///
    /// # Panics
    /// Panics if the matrix is not square.
    #[must_use]
    pub fn invert(&self) -> Inversion {
        assert_eq!(
            self.rows, self.cols,
            "cannot invert a {}x{} matrix",
            self.rows, self.cols
        );
        let n = self.rows;
        let mut work = self.clone();
        let mut mirror = Self::identity(n);
        let mut lead_row = 0;

        for col in 0..n {
            let Some(pivot) = work.find_pivot(col, lead_row) else {
                continue;
            };
            work.swap_rows(pivot, lead_row);
            mirror.swap_rows(pivot, lead_row);

            for row in 0..n {
                if row != lead_row && work.get(row, col) {
                    work.xor_row_from(lead_row, row, 0);
                    mirror.xor_row_from(lead_row, row, 0);
                }
            }
            lead_row += 1;
        }

        if lead_row == n {
            Inversion::Invertible(mirror)
        } else {
            Inversion::Singular { rank: lead_row }
        }
    }

    /// Matrix product `self * other` over GF(2).
    ///
    /// # Panics
    /// Panics if the inner dimensions differ.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        assert_eq!(
            self.cols, other.rows,
            "cannot multiply {}x{} by {}x{}",
            self.rows, self.cols, other.rows, other.cols
        );
        let mut product = Self::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                if !self.get(i, k) {
                    continue;
                }
                let dst = i * product.stride;
                let src = k * other.stride;
                for w in 0..product.stride {
                    product.data[dst + w] ^= other.data[src + w];
                }
            }
        }
        product
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_test(name: &str) {
        crate::test_utils::init_test_logging();
        crate::test_phase!(name);
    }

    fn masks(len: usize, values: &[u64]) -> Vec<Mask> {
        values.iter().map(|&v| Mask::from_u64(len, v)).collect()
    }

    #[test]
    fn from_columns_places_bits_by_row() {
        init_test("from_columns_places_bits_by_row");
        let cols = masks(3, &[0b001, 0b110]);
        let matrix = BitMatrix::from_columns(3, &cols);
        assert_eq!(matrix.rows(), 3);
        assert_eq!(matrix.cols(), 2);
        assert!(matrix.get(0, 0));
        assert!(!matrix.get(1, 0));
        assert!(matrix.get(1, 1));
        assert!(matrix.get(2, 1));
        assert_eq!(matrix.column(1), cols[1]);
        crate::test_complete!("from_columns_places_bits_by_row");
    }

    #[test]
    fn eliminate_prefers_leftmost_independent_columns() {
        init_test("eliminate_prefers_leftmost_independent_columns");
        // col2 = col0 ^ col1, col3 independent.
        let cols = masks(4, &[0b0011, 0b0110, 0b0101, 0b1000]);
        let mut matrix = BitMatrix::from_columns(4, &cols);
        let echelon = matrix.eliminate();
        crate::assert_with_log!(
            echelon.leads == vec![0, 1, 3],
            "leads",
            vec![0, 1, 3],
            echelon.leads.clone()
        );
        assert_eq!(echelon.rank(), 3);
        assert_eq!(echelon.stats.skipped_columns, 1);
        crate::test_complete!("eliminate_prefers_leftmost_independent_columns");
    }

    #[test]
    fn eliminate_skips_zero_and_duplicate_columns() {
        init_test("eliminate_skips_zero_and_duplicate_columns");
        let cols = masks(3, &[0, 0b100, 0b100, 0b010, 0b001]);
        let mut matrix = BitMatrix::from_columns(3, &cols);
        let echelon = matrix.eliminate();
        assert_eq!(echelon.leads, vec![1, 3, 4]);
        crate::test_complete!("eliminate_skips_zero_and_duplicate_columns");
    }

    #[test]
    fn eliminate_stops_when_rows_exhausted() {
        init_test("eliminate_stops_when_rows_exhausted");
        let cols = masks(2, &[0b01, 0b10, 0b11]);
        let mut matrix = BitMatrix::from_columns(2, &cols);
        let echelon = matrix.eliminate();
        assert_eq!(echelon.leads, vec![0, 1]);
        crate::test_complete!("eliminate_stops_when_rows_exhausted");
    }

    #[test]
    fn wide_rows_eliminate_across_words() {
        init_test("wide_rows_eliminate_across_words");
        let rows = 3;
        let mut cols: Vec<Mask> = (0..70).map(|_| Mask::zeros(rows)).collect();
        cols[65] = Mask::from_u64(rows, 0b011);
        cols[66] = Mask::from_u64(rows, 0b011);
        cols[69] = Mask::from_u64(rows, 0b101);
        let mut matrix = BitMatrix::from_columns(rows, &cols);
        let echelon = matrix.eliminate();
        assert_eq!(echelon.leads, vec![65, 69]);
        crate::test_complete!("wide_rows_eliminate_across_words");
    }

    #[test]
    fn swap_and_xor_rows() {
        init_test("swap_and_xor_rows");
        let mut matrix = BitMatrix::identity(3);
        matrix.swap_rows(0, 2);
        assert!(matrix.get(0, 2));
        assert!(matrix.get(2, 0));
        matrix.xor_row(0, 1);
        assert_eq!(matrix.row(1), Mask::from_u64(3, 0b110));
        crate::test_complete!("swap_and_xor_rows");
    }

    #[test]
    fn invert_produces_inverse() {
        init_test("invert_produces_inverse");
        let cols = masks(3, &[0b011, 0b100, 0b101]);
        let matrix = BitMatrix::from_columns(3, &cols);
        let Inversion::Invertible(inverse) = matrix.invert() else {
            panic!("matrix should be invertible");
        };
        let product = matrix.mul(&inverse);
        crate::assert_with_log!(
            product == BitMatrix::identity(3),
            "product is identity",
            BitMatrix::identity(3),
            product
        );
        assert_eq!(inverse.mul(&matrix), BitMatrix::identity(3));
        crate::test_complete!("invert_produces_inverse");
    }

    #[test]
    fn invert_reports_rank_of_singular_matrix() {
        init_test("invert_reports_rank_of_singular_matrix");
        let cols = masks(3, &[0b011, 0b110, 0b101]);
        let matrix = BitMatrix::from_columns(3, &cols);
        let outcome = matrix.invert();
        crate::assert_with_log!(
            outcome == Inversion::Singular { rank: 2 },
            "singular rank",
            Inversion::Singular { rank: 2 },
            outcome
        );
        assert_eq!(matrix.rank(), 2);
        crate::test_complete!("invert_reports_rank_of_singular_matrix");
    }
}
