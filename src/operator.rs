//! Scored operators and the bias evaluator.
//!
//! An operator is a XOR of variables, given by its mask. Scoring counts the
//! records on which it evaluates to 1 (`count1`) and derives its bias
//! `|1 - 2 * count1 / N|`: 1 for an operator fixed by the data, 0 for one
//! that splits the records evenly.

use crate::dataset::Histogram;
use crate::gf2::Mask;
use serde::Serialize;
use std::cmp::Ordering;

/// A scored linear operator.
///
/// Operators are ordered by bias descending, then by mask ascending. This is
/// the order in which the search considers candidates.
#[derive(Debug, Clone, Serialize)]
pub struct Operator {
    mask: Mask,
    bias: f64,
    count1: u64,
}

impl Operator {
    /// Scores `mask` against `histogram`.
    ///
    /// # Panics
    /// Panics if the mask width differs from the histogram's.
    #[must_use]
    pub fn score(mask: Mask, histogram: &Histogram) -> Self {
        let count1 = histogram.count_ones(&mask);
        Self {
            bias: bias_of(count1, histogram.total()),
            mask,
            count1,
        }
    }

    /// Builds an operator from an already known score.
    #[must_use]
    pub fn from_parts(mask: Mask, bias: f64, count1: u64) -> Self {
        Self { mask, bias, count1 }
    }

    /// The operator's mask.
    #[inline]
    #[must_use]
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Consumes the operator, returning its mask.
    #[must_use]
    pub fn into_mask(self) -> Mask {
        self.mask
    }

    /// Bias in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Number of records on which the operator is 1.
    #[inline]
    #[must_use]
    pub fn count1(&self) -> u64 {
        self.count1
    }

    /// Number of variables combined by the operator.
    #[must_use]
    pub fn order(&self) -> usize {
        self.mask.count_ones()
    }

    /// Empirical probability that the operator is 1.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn probability_one(&self, total: u64) -> f64 {
        self.count1 as f64 / total as f64
    }
}

#[allow(clippy::cast_precision_loss)]
fn bias_of(count1: u64, total: u64) -> f64 {
    let p1 = count1 as f64 / total as f64;
    (1.0 - 2.0 * p1).abs()
}

impl Ord for Operator {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .bias
            .total_cmp(&self.bias)
            .then_with(|| self.mask.cmp(&other.mask))
    }
}

impl PartialOrd for Operator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Operator {}

/// Scores every mask against `histogram`.
///
/// With the `parallel` feature the masks are scored on the rayon pool; the
/// output order always matches the input order.
#[must_use]
pub fn score_all(masks: Vec<Mask>, histogram: &Histogram) -> Vec<Operator> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        masks
            .into_par_iter()
            .map(|mask| Operator::score(mask, histogram))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        masks
            .into_iter()
            .map(|mask| Operator::score(mask, histogram))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_test(name: &str) {
        crate::test_utils::init_test_logging();
        crate::test_phase!(name);
    }

    fn worked_example() -> Histogram {
        Histogram::from_states(
            3,
            [0b111, 0b111, 0b000, 0b100].map(|v| Mask::from_u64(3, v)),
        )
        .unwrap()
    }

    #[test]
    fn scores_single_variables() {
        init_test("scores_single_variables");
        let hist = worked_example();
        let bit0 = Operator::score(Mask::from_u64(3, 0b001), &hist);
        assert_eq!(bit0.count1(), 2);
        crate::assert_with_log!(bit0.bias() == 0.0, "bit0 bias", 0.0, bit0.bias());

        let bit2 = Operator::score(Mask::from_u64(3, 0b100), &hist);
        assert_eq!(bit2.count1(), 3);
        assert!((bit2.bias() - 0.5).abs() < 1e-12);
        assert!((bit2.probability_one(hist.total()) - 0.75).abs() < 1e-12);
        assert_eq!(bit2.order(), 1);
        crate::test_complete!("scores_single_variables");
    }

    #[test]
    fn fully_determined_operator_has_bias_one() {
        init_test("fully_determined_operator_has_bias_one");
        let hist = worked_example();
        let op = Operator::score(Mask::from_u64(3, 0b011), &hist);
        assert_eq!(op.count1(), 0);
        assert!((op.bias() - 1.0).abs() < 1e-12);
        assert_eq!(op.order(), 2);
        crate::test_complete!("fully_determined_operator_has_bias_one");
    }

    #[test]
    fn ordering_is_bias_descending_then_mask_ascending() {
        init_test("ordering_is_bias_descending_then_mask_ascending");
        let hist = worked_example();
        let mut ops: Vec<Operator> = (1u64..8)
            .map(|v| Operator::score(Mask::from_u64(3, v), &hist))
            .collect();
        ops.sort();
        let masks: Vec<u64> = ops.iter().map(|op| op.mask().to_u64().unwrap()).collect();
        crate::assert_with_log!(
            masks == vec![0b011, 0b100, 0b101, 0b110, 0b111, 0b001, 0b010],
            "sorted masks",
            vec![0b011, 0b100, 0b101, 0b110, 0b111, 0b001, 0b010],
            masks
        );
        crate::test_complete!("ordering_is_bias_descending_then_mask_ascending");
    }

    #[test]
    fn score_all_keeps_input_order() {
        init_test("score_all_keeps_input_order");
        let hist = worked_example();
        let masks: Vec<Mask> = [0b010, 0b011, 0b001]
            .map(|v| Mask::from_u64(3, v))
            .to_vec();
        let ops = score_all(masks.clone(), &hist);
        let scored: Vec<Mask> = ops.iter().map(|op| op.mask().clone()).collect();
        assert_eq!(scored, masks);
        crate::test_complete!("score_all_keeps_input_order");
    }

    #[test]
    fn serializes_mask_as_bits() {
        init_test("serializes_mask_as_bits");
        let op = Operator::from_parts(Mask::from_u64(3, 0b101), 0.5, 1);
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["mask"], "101");
        assert_eq!(json["count1"], 1);
        crate::test_complete!("serializes_mask_as_bits");
    }
}
