use crate::types::TransactionUpdateIndex;

const HALF_RANGE: TransactionUpdateIndex = 128;

/// Returns whether or not a wrapping update index is greater than another
/// sequence_greater_than(2,1) will return true
/// sequence_greater_than(1,2) will return false
/// sequence_greater_than(1,1) will return false
/// sequence_greater_than(0,255) will return true
pub fn sequence_greater_than(s1: TransactionUpdateIndex, s2: TransactionUpdateIndex) -> bool {
    ((s1 > s2) && (s1 - s2 <= HALF_RANGE)) || ((s1 < s2) && (s2 - s1 > HALF_RANGE))
}

/// Returns whether or not a wrapping update index is less than another
/// sequence_less_than(1,2) will return true
/// sequence_less_than(2,1) will return false
/// sequence_less_than(1,1) will return false
pub fn sequence_less_than(s1: TransactionUpdateIndex, s2: TransactionUpdateIndex) -> bool {
    sequence_greater_than(s2, s1)
}

/// Retrieves the wrapping difference `b - a` between 2 update indices,
/// taking the shorter way around the ring.
///
/// # Examples
/// ```
/// # use tandem_shared::wrapping_diff;
/// assert_eq!(wrapping_diff(1, 2), 1);
/// assert_eq!(wrapping_diff(2, 1), -1);
/// assert_eq!(wrapping_diff(255, 0), 1);
/// assert_eq!(wrapping_diff(0, 255), -1);
/// ```
pub fn wrapping_diff(a: TransactionUpdateIndex, b: TransactionUpdateIndex) -> i8 {
    b.wrapping_sub(a) as i8
}
