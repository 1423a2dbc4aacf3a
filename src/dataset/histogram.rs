//! Histogram of observed states.

use super::DatasetError;
use crate::gf2::{Mask, change_coordinates};
use std::collections::BTreeMap;

/// Distinct states of an `n`-variable dataset with their counts.
///
/// Entries are sorted by state and every count is positive. The sum of the
/// counts is `total()` (N), which is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    variables: usize,
    total: u64,
    entries: Vec<(Mask, u64)>,
}

impl Histogram {
    /// Builds a histogram from `(state, count)` pairs, merging repeats and
    /// dropping zero counts.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::ZeroWidth`] for `variables == 0`,
    /// [`DatasetError::WidthMismatch`] for a state of the wrong width and
    /// [`DatasetError::Empty`] when the counts sum to zero.
    pub fn from_counts<I>(variables: usize, counts: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = (Mask, u64)>,
    {
        if variables == 0 {
            return Err(DatasetError::ZeroWidth);
        }
        let mut merged: BTreeMap<Mask, u64> = BTreeMap::new();
        for (state, count) in counts {
            if state.len() != variables {
                return Err(DatasetError::WidthMismatch {
                    expected: variables,
                    actual: state.len(),
                });
            }
            if count > 0 {
                *merged.entry(state).or_insert(0) += count;
            }
        }
        let total: u64 = merged.values().sum();
        if total == 0 {
            return Err(DatasetError::Empty);
        }
        Ok(Self {
            variables,
            total,
            entries: merged.into_iter().collect(),
        })
    }

    /// Builds a histogram counting each state once per occurrence.
    ///
    /// # Errors
    ///
    /// Same as [`Histogram::from_counts`].
    pub fn from_states<I>(variables: usize, states: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = Mask>,
    {
        Self::from_counts(variables, states.into_iter().map(|s| (s, 1)))
    }

    /// Number of variables (n).
    #[inline]
    #[must_use]
    pub const fn variables(&self) -> usize {
        self.variables
    }

    /// Number of records (N).
    #[inline]
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct states.
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// Sorted `(state, count)` pairs.
    #[must_use]
    pub fn entries(&self) -> &[(Mask, u64)] {
        &self.entries
    }

    /// Count of `state`, zero when unobserved.
    #[must_use]
    pub fn count(&self, state: &Mask) -> u64 {
        self.entries
            .binary_search_by(|(s, _)| s.cmp(state))
            .map_or(0, |idx| self.entries[idx].1)
    }

    /// Number of records on which operator `mask` evaluates to 1.
    #[must_use]
    pub fn count_ones(&self, mask: &Mask) -> u64 {
        self.entries
            .iter()
            .filter(|(state, _)| mask.parity_with(state))
            .map(|(_, count)| count)
            .sum()
    }

    /// Re-expresses every record in the coordinates given by `rows`.
    ///
    /// New bit `i` is the parity of `rows[i] & state`. States that collide
    /// are merged; N is preserved.
    ///
    /// # Panics
    /// Panics if `rows` is empty or a row has the wrong width.
    #[must_use]
    pub fn transform(&self, rows: &[Mask]) -> Self {
        assert!(!rows.is_empty(), "cannot transform into zero coordinates");
        let mut merged: BTreeMap<Mask, u64> = BTreeMap::new();
        for (state, count) in &self.entries {
            *merged.entry(change_coordinates(rows, state)).or_insert(0) += count;
        }
        Self {
            variables: rows.len(),
            total: self.total,
            entries: merged.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_test(name: &str) {
        crate::test_utils::init_test_logging();
        crate::test_phase!(name);
    }

    fn state(v: u64) -> Mask {
        Mask::from_u64(3, v)
    }

    #[test]
    fn merges_and_sorts_states() {
        init_test("merges_and_sorts_states");
        let hist = Histogram::from_states(3, [state(0b111), state(0b111), state(0), state(0b100)])
            .unwrap();
        assert_eq!(hist.total(), 4);
        assert_eq!(hist.distinct(), 3);
        let entries: Vec<(u64, u64)> = hist
            .entries()
            .iter()
            .map(|(s, c)| (s.to_u64().unwrap(), *c))
            .collect();
        crate::assert_with_log!(
            entries == vec![(0, 1), (0b100, 1), (0b111, 2)],
            "entries",
            vec![(0, 1), (0b100, 1), (0b111, 2)],
            entries
        );
        assert_eq!(hist.count(&state(0b111)), 2);
        assert_eq!(hist.count(&state(0b001)), 0);
        crate::test_complete!("merges_and_sorts_states");
    }

    #[test]
    fn rejects_empty_and_mismatched_input() {
        init_test("rejects_empty_and_mismatched_input");
        assert!(matches!(
            Histogram::from_states(3, Vec::new()),
            Err(DatasetError::Empty)
        ));
        assert!(matches!(
            Histogram::from_counts(3, [(state(1), 0)]),
            Err(DatasetError::Empty)
        ));
        assert!(matches!(
            Histogram::from_states(0, Vec::new()),
            Err(DatasetError::ZeroWidth)
        ));
        assert!(matches!(
            Histogram::from_states(4, [state(1)]),
            Err(DatasetError::WidthMismatch {
                expected: 4,
                actual: 3
            })
        ));
        crate::test_complete!("rejects_empty_and_mismatched_input");
    }

    #[test]
    fn count_ones_sums_odd_parity_records() {
        init_test("count_ones_sums_odd_parity_records");
        let hist = Histogram::from_states(3, [state(0b111), state(0b111), state(0), state(0b100)])
            .unwrap();
        assert_eq!(hist.count_ones(&state(0b001)), 2);
        assert_eq!(hist.count_ones(&state(0b100)), 3);
        assert_eq!(hist.count_ones(&state(0b011)), 0);
        crate::test_complete!("count_ones_sums_odd_parity_records");
    }

    #[test]
    fn transform_preserves_total_and_merges_collisions() {
        init_test("transform_preserves_total_and_merges_collisions");
        let hist = Histogram::from_states(3, [state(0b111), state(0b111), state(0), state(0b100)])
            .unwrap();
        let rows = [state(0b011), state(0b100), state(0b101)];
        let moved = hist.transform(&rows);
        assert_eq!(moved.total(), 4);
        assert_eq!(moved.count(&state(0b010)), 2);
        assert_eq!(moved.count(&state(0b000)), 1);
        assert_eq!(moved.count(&state(0b110)), 1);

        // A rank-1 projection collapses everything onto two states.
        let projected = hist.transform(&[state(0b100)]);
        assert_eq!(projected.variables(), 1);
        assert_eq!(projected.distinct(), 2);
        assert_eq!(projected.total(), 4);
        crate::test_complete!("transform_preserves_total_and_merges_collisions");
    }
}
