//! Fixed-width bit-vector blocks of the key space.

use super::layout::{TRUNK_WORDS, word_position};

/// Index of a trunk in its table's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TrunkId(pub(crate) usize);

/// One block of [`TRUNK_BITS`](super::TRUNK_BITS) consecutive keys.
///
/// A trunk is created the first time a key with its prefix is inserted and
/// lives until the owning table is dropped, even once all its bits are clear.
pub(crate) struct Trunk {
    pub(crate) prefix: usize,
    pub(crate) bits: [usize; TRUNK_WORDS],
    /// Next trunk on the traversal chain.
    pub(crate) next: Option<TrunkId>,
}

impl Trunk {
    pub(crate) const fn new(prefix: usize, next: Option<TrunkId>) -> Self {
        Self {
            prefix,
            bits: [0; TRUNK_WORDS],
            next,
        }
    }

    #[inline]
    pub(crate) const fn contains_offset(&self, offset: usize) -> bool {
        let (word, bit) = word_position(offset);
        self.bits[word] & (1 << bit) != 0
    }

    /// Sets the bit for `offset`, returning `true` if it was clear.
    #[inline]
    pub(crate) const fn insert_offset(&mut self, offset: usize) -> bool {
        let (word, bit) = word_position(offset);
        let mask = 1 << bit;
        let was_clear = self.bits[word] & mask == 0;
        self.bits[word] |= mask;
        was_clear
    }

    /// Clears the bit for `offset`, returning `true` if it was set.
    #[inline]
    pub(crate) const fn remove_offset(&mut self, offset: usize) -> bool {
        let (word, bit) = word_position(offset);
        let mask = 1 << bit;
        let was_set = self.bits[word] & mask != 0;
        self.bits[word] &= !mask;
        was_set
    }

    #[cfg(test)]
    pub(crate) fn is_clear(&self) -> bool {
        self.bits.iter().all(|&word| word == 0)
    }

    pub(crate) fn population(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Iterates the set bits as `(word index, bit index)`, low to high.
    pub(crate) const fn ones(&self) -> TrunkOnes<'_> {
        TrunkOnes {
            bits: &self.bits,
            word_index: 0,
            current_word: self.bits[0],
        }
    }
}

/// Set-bit walk over one trunk.
///
/// Holds a copy of the word being scanned; the remaining words are read when
/// the walk reaches them.
pub(crate) struct TrunkOnes<'a> {
    bits: &'a [usize; TRUNK_WORDS],
    word_index: usize,
    current_word: usize,
}

impl Iterator for TrunkOnes<'_> {
    type Item = (usize, u32);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit = self.current_word.trailing_zeros();
                // Clear the lowest set bit.
                self.current_word &= self.current_word.wrapping_sub(1);
                return Some((self.word_index, bit));
            }
            self.word_index += 1;
            if self.word_index >= TRUNK_WORDS {
                return None;
            }
            self.current_word = self.bits[self.word_index];
        }
    }
}

impl std::iter::FusedIterator for TrunkOnes<'_> {}
