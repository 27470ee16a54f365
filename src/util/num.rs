/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Largest string, in bytes, that repeating a string may produce.
pub const MAX_REPEAT_BYTES: usize = 1 << 27;

/// Converts a length to `f64`.
///
/// Lengths of strings and lists never come close to `MAX_SAFE_U64_INT`, so
/// the conversion is exact in practice; larger values saturate at it.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    let value = u64::try_from(value).unwrap_or(u64::MAX).min(MAX_SAFE_U64_INT);
    value as f64
}

/// Truncates a user supplied index towards zero, counting negative indices
/// from `len`.
///
/// Returns `None` for non-finite values and for indices that are still
/// negative after adjustment.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_precision_loss)]
fn adjusted_index(index: f64, len: usize) -> Option<usize> {
    let adjusted = if index < 0.0 { index + usize_to_f64(len) } else { index };
    let adjusted = adjusted.trunc();
    if !adjusted.is_finite() || adjusted < 0.0 || adjusted > MAX_SAFE_U64_INT as f64 {
        return None;
    }
    usize::try_from(adjusted as u64).ok()
}

/// Resolves an index into a sequence of `len` elements.
///
/// Fractional indices are truncated towards zero and negative indices count
/// from the end, so `-1` is the last element.
///
/// ## Returns
/// - `Some(usize)`: A position strictly below `len`.
/// - `None`: If the index falls outside the sequence.
///
/// ## Example
/// ```
/// use imperal::util::num::element_index;
///
/// assert_eq!(element_index(1.0, 3), Some(1));
/// assert_eq!(element_index(-1.0, 3), Some(2));
/// assert_eq!(element_index(2.9, 3), Some(2));
/// assert_eq!(element_index(3.0, 3), None);
/// assert_eq!(element_index(-4.0, 3), None);
/// ```
#[must_use]
pub fn element_index(index: f64, len: usize) -> Option<usize> {
    adjusted_index(index, len).filter(|&position| position < len)
}

/// Resolves a split offset into a sequence of `len` elements.
///
/// Works like [`element_index`] but also accepts `len` itself, which splits
/// off an empty tail.
///
/// ## Example
/// ```
/// use imperal::util::num::split_offset;
///
/// assert_eq!(split_offset(3.0, 3), Some(3));
/// assert_eq!(split_offset(-2.0, 3), Some(1));
/// assert_eq!(split_offset(4.0, 3), None);
/// ```
#[must_use]
pub fn split_offset(index: f64, len: usize) -> Option<usize> {
    adjusted_index(index, len).filter(|&position| position <= len)
}

/// Converts a repetition count, truncating towards zero.
///
/// ## Returns
/// - `Some(usize)`: For finite, non-negative counts.
/// - `None`: For negative or non-finite counts.
///
/// ## Example
/// ```
/// use imperal::util::num::repeat_count;
///
/// assert_eq!(repeat_count(2.7), Some(2));
/// assert_eq!(repeat_count(-1.0), None);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn repeat_count(count: f64) -> Option<usize> {
    let count = count.trunc();
    if !count.is_finite() || count < 0.0 || count > MAX_SAFE_U64_INT as f64 {
        return None;
    }
    usize::try_from(count as u64).ok()
}

/// Computes the size of `len` bytes repeated `count` times.
///
/// ## Returns
/// - `Some(usize)`: The total, if it is at most [`MAX_REPEAT_BYTES`].
/// - `None`: If the total is larger or does not fit in a `usize`.
///
/// ## Example
/// ```
/// use imperal::util::num::repeated_len;
///
/// assert_eq!(repeated_len(3, 4), Some(12));
/// assert_eq!(repeated_len(0, usize::MAX), Some(0));
/// assert_eq!(repeated_len(1, 1_000_000_000_000_000), None);
/// ```
#[must_use]
pub fn repeated_len(len: usize, count: usize) -> Option<usize> {
    len.checked_mul(count).filter(|&total| total <= MAX_REPEAT_BYTES)
}
