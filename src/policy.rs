//! Pure table-length and hashing arithmetic shared by the engine and the
//! façades. Everything here is a total function of its arguments.

/// Spreads a raw hash before it is masked down to a bucket index.
///
/// Power-of-two masking only looks at the low bits, so hashers whose
/// entropy sits in the high bits would otherwise cluster. The xor-shift
/// cascade (20/12/7/4) folds the high bits down; it is cheap and good
/// enough for chains that the resize policy keeps short.
#[inline]
pub fn spread(hash: u64) -> u64 {
    let hash = hash ^ (hash >> 20) ^ (hash >> 12);
    hash ^ (hash >> 7) ^ (hash >> 4)
}

/// Maps a (spread) hash to a bucket index. `length` must be a power of two.
#[inline]
pub fn bucket_index(hash: u64, length: usize) -> usize {
    debug_assert!(length.is_power_of_two());
    (hash as usize) & (length - 1)
}

/// The table length the resize policy wants for `size` live entries given
/// the current `length`.
///
/// Empty tables collapse to length 0. Otherwise the current length (treated
/// as at least 1) is doubled until it covers `size`, then halved while it
/// exceeds `2 * size`. The result is always a power of two in
/// `[size, 2 * size]`, which keeps the load factor within `(0.5, 1.0]` and
/// makes the table shrink again as entries are removed.
pub fn target_length(size: usize, length: usize) -> usize {
    if size == 0 {
        return 0;
    }
    let mut length = length.max(1);
    while length < size {
        length *= 2;
    }
    let ceiling = size.saturating_mul(2);
    while length > ceiling {
        length /= 2;
    }
    length
}
