//! Key layout constants and bit addressing helpers.

/// Number of bits in one trunk word (the native word width).
pub const WORD_BITS: usize = usize::BITS as usize;

/// Shift that turns a local offset into a word index.
///
/// 6 on 64-bit targets, 5 on 32-bit targets.
pub const INT_SHIFT: u32 = usize::BITS.trailing_zeros();

/// Mask that extracts the bit index within a word from a local offset.
pub const INT_MASK: usize = WORD_BITS - 1;

/// Number of words in a trunk's bit vector.
pub const TRUNK_WORDS: usize = 8;

/// Number of consecutive keys covered by one trunk.
pub const TRUNK_BITS: usize = TRUNK_WORDS * WORD_BITS;

/// Shift that turns a key into its trunk prefix.
pub const TRUNK_SHIFT: u32 = TRUNK_BITS.trailing_zeros();

/// Mask that extracts the local offset within a trunk from a key.
pub const TRUNK_MASK: usize = TRUNK_BITS - 1;

/// Number of members held inline before the set upgrades to a trunk table.
pub const INLINE_CAPACITY: usize = 34;

/// Slot count of a freshly allocated trunk table. Always a power of two.
pub const MIN_TABLE_CAPACITY: usize = 8;

static_assertions::const_assert!(TRUNK_BITS.is_power_of_two());
static_assertions::const_assert!(MIN_TABLE_CAPACITY.is_power_of_two());
static_assertions::const_assert!(MIN_TABLE_CAPACITY > 4);

#[inline]
pub(crate) const fn prefix_of(key: usize) -> usize {
    key >> TRUNK_SHIFT
}

#[inline]
pub(crate) const fn local_offset(key: usize) -> usize {
    key & TRUNK_MASK
}

/// Splits a local offset into `(word index, bit index)`.
#[inline]
pub(crate) const fn word_position(offset: usize) -> (usize, u32) {
    (offset >> INT_SHIFT, (offset & INT_MASK) as u32)
}

/// Inverse of [`prefix_of`] + [`local_offset`] + [`word_position`].
#[inline]
pub(crate) const fn compose_key(prefix: usize, word: usize, bit: u32) -> usize {
    (prefix << TRUNK_SHIFT) | (word << INT_SHIFT) | bit as usize
}
