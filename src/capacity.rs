//! Sizing policy for the bucket array.
//!
//! The array is never used in full: only the first [`usable_capacity`] slots
//! can be an entry's ideal index, and the remaining tail absorbs forward
//! displacement. Hashes are mapped into that usable prefix with a
//! multiply-shift range reduction instead of a modulo.

/// Default physical length of a freshly constructed table.
pub const MIN_TABLE_LEN: usize = 50;

/// Tables shorter than this double on growth. Longer tables grow by a
/// fraction of their length that depends on their bit width.
pub const SMALL_TABLE_LIMIT: usize = 1 << 16;

/// Position of the highest set bit plus one. Zero for zero.
#[inline(always)]
pub fn bit_length(n: usize) -> u32 {
    usize::BITS - n.leading_zeros()
}

/// Number of slots of an array of `len` buckets that may serve as an ideal
/// index.
///
/// The reserved tail is `len >> (bit_length(len) / 2)`, so headroom shrinks
/// relative to `len` as the table gets larger.
///
/// # Examples
///
/// ```rust
/// # use robin_table::capacity::usable_capacity;
/// assert_eq!(usable_capacity(50), 44);
/// assert_eq!(usable_capacity(64), 56);
/// ```
#[inline(always)]
pub fn usable_capacity(len: usize) -> usize {
    len - (len >> (bit_length(len) / 2))
}

/// Maps a 32-bit hash into `0..capacity`.
///
/// The hash is shifted left by one bit before the multiply, which discards
/// its top bit. Two hashes differing only in bit 31 therefore share an ideal
/// index.
///
/// # Examples
///
/// ```rust
/// # use robin_table::capacity::fast_index;
/// assert_eq!(fast_index(0x4000_0000, 100), 50);
/// assert_eq!(fast_index(0x8000_0000, 100), 0);
/// ```
#[inline(always)]
pub fn fast_index(hash: u32, capacity: usize) -> usize {
    (((hash << 1) as u128 * capacity as u128) >> 32) as usize
}

/// Physical length the table grows to from `len`.
///
/// Small tables double. Past [`SMALL_TABLE_LIMIT`] the increment is
/// `2 * len / ((64 - bit_length(len) - 16) / 4)`, with the divisor clamped to
/// at least one so very wide lengths still grow. The result saturates at
/// `usize::MAX`.
pub fn next_growth_size(len: usize) -> usize {
    if len < SMALL_TABLE_LIMIT {
        return len.saturating_mul(2).max(1);
    }

    let divisor = ((64 - bit_length(len) as i64 - 16) / 4).max(1) as usize;
    len.saturating_add(len.saturating_mul(2) / divisor)
}
