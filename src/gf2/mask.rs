//! Width-agnostic operator masks over GF(2).
//!
//! A [`Mask`] is a fixed-length bit vector. Bit `i` stands for variable
//! `i` (variable `i + 1` in the 1-based naming used by reports), so the
//! lowest bit is the rightmost character of a rendered mask.
//!
//! Masks of up to 128 variables are stored inline; wider masks spill to
//! the heap without changing behavior.

use serde::{Serialize, Serializer};
use smallvec::{SmallVec, smallvec};
use std::cmp::Ordering;
use std::fmt;

/// Number of words stored inline before a mask allocates.
const INLINE_WORDS: usize = 2;

type Words = SmallVec<[u64; INLINE_WORDS]>;

// ============================================================================
// Mask
// ============================================================================

/// A dense GF(2) vector of fixed length.
///
/// Bit `i` is `(words[i / 64] >> (i % 64)) & 1`. Bits at positions `>= len`
/// are always zero.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Mask {
    words: Words,
    len: usize,
}

impl Mask {
    /// Creates the zero vector of the given length.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            words: smallvec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Creates a vector with only bit `bit` set.
    ///
    /// # Panics
    /// Panics if `bit >= len`.
    #[must_use]
    pub fn singleton(len: usize, bit: usize) -> Self {
        let mut mask = Self::zeros(len);
        mask.set(bit);
        mask
    }

    /// Creates a mask from the low `len` bits of `value`.
    ///
    /// # Panics
    /// Panics if `value` has a bit set at or above `len`.
    #[must_use]
    pub fn from_u64(len: usize, value: u64) -> Self {
        assert!(
            len >= 64 || value >> len == 0,
            "value {value:#b} does not fit in {len} bits"
        );
        let mut mask = Self::zeros(len);
        if let Some(word) = mask.words.first_mut() {
            *word = value;
        }
        mask
    }

    /// Creates a mask with the given bit positions set.
    ///
    /// # Panics
    /// Panics if any position is `>= len`.
    #[must_use]
    pub fn from_bits(len: usize, bits: impl IntoIterator<Item = usize>) -> Self {
        let mut mask = Self::zeros(len);
        for bit in bits {
            mask.set(bit);
        }
        mask
    }

    /// Returns the number of logical bits.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the mask has zero length.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if no bit is set.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Returns the packed words, least significant first.
    #[inline]
    #[must_use]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Returns the value as a `u64` when the mask fits in one word.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        match self.words.as_slice() {
            [] => Some(0),
            [word] => Some(*word),
            [word, rest @ ..] if rest.iter().all(|&w| w == 0) => Some(*word),
            _ => None,
        }
    }

    /// Returns true if bit `i` is set.
    ///
    /// # Panics
    /// Panics if `i >= len`.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.len, "bit index {i} out of range (len={})", self.len);
        (self.words[i / 64] >> (i % 64)) & 1 == 1
    }

    /// Sets bit `i` to 1.
    ///
    /// # Panics
    /// Panics if `i >= len`.
    #[inline]
    pub fn set(&mut self, i: usize) {
        assert!(i < self.len, "bit index {i} out of range (len={})", self.len);
        self.words[i / 64] |= 1u64 << (i % 64);
    }

    /// Clears bit `i` to 0.
    ///
    /// # Panics
    /// Panics if `i >= len`.
    #[inline]
    pub fn clear(&mut self, i: usize) {
        assert!(i < self.len, "bit index {i} out of range (len={})", self.len);
        self.words[i / 64] &= !(1u64 << (i % 64));
    }

    /// Flips bit `i`.
    ///
    /// # Panics
    /// Panics if `i >= len`.
    #[inline]
    pub fn flip(&mut self, i: usize) {
        assert!(i < self.len, "bit index {i} out of range (len={})", self.len);
        self.words[i / 64] ^= 1u64 << (i % 64);
    }

    /// XOR-assigns another mask into this one (addition in GF(2)).
    ///
    /// # Panics
    /// Panics if lengths differ.
    pub fn xor_assign(&mut self, other: &Self) {
        assert_eq!(
            self.len, other.len,
            "xor_assign: length mismatch ({} vs {})",
            self.len, other.len
        );
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            *a ^= b;
        }
    }

    /// Returns the XOR of two masks.
    #[must_use]
    pub fn xor(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.xor_assign(other);
        result
    }

    /// Parity of `popcount(self & other)`: the value of operator `self`
    /// evaluated on state `other`.
    ///
    /// # Panics
    /// Panics if lengths differ.
    #[inline]
    #[must_use]
    pub fn parity_with(&self, other: &Self) -> bool {
        assert_eq!(
            self.len, other.len,
            "parity_with: length mismatch ({} vs {})",
            self.len, other.len
        );
        let ones: u32 = self
            .words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| (a & b).count_ones())
            .sum();
        ones & 1 == 1
    }

    /// Returns the number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the index of the lowest set bit, or `None` for zero.
    #[must_use]
    pub fn lowest_bit(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, w)| **w != 0)
            .map(|(idx, w)| idx * 64 + w.trailing_zeros() as usize)
    }

    /// Returns the index of the highest set bit, or `None` for zero.
    #[must_use]
    pub fn highest_bit(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|(_, w)| **w != 0)
            .map(|(idx, w)| idx * 64 + 63 - w.leading_zeros() as usize)
    }

    /// Iterates over the indices of set bits in ascending order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words
            .iter()
            .enumerate()
            .flat_map(|(idx, &word)| BitIter {
                word,
                base: idx * 64,
            })
    }

    /// Renders the mask as `len` binary digits, highest bit first.
    #[must_use]
    pub fn to_bit_string(&self) -> String {
        (0..self.len)
            .rev()
            .map(|i| if self.get(i) { '1' } else { '0' })
            .collect()
    }
}

struct BitIter {
    word: u64,
    base: usize,
}

impl Iterator for BitIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.word == 0 {
            return None;
        }
        let bit = self.word.trailing_zeros() as usize;
        self.word &= self.word - 1;
        Some(self.base + bit)
    }
}

/// Numeric order: masks compare as unsigned integers. Masks of different
/// lengths order by length first.
impl Ord for Mask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.len
            .cmp(&other.len)
            .then_with(|| self.words.iter().rev().cmp(other.words.iter().rev()))
    }
}

impl PartialOrd for Mask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mask({}, [", self.len)?;
        for (idx, bit) in self.ones().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{bit}")?;
        }
        write!(f, "])")
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bit_string())
    }
}

impl Serialize for Mask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_bit_string())
    }
}
