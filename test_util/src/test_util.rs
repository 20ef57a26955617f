//! test utilities

use bytes::BytesMut;
use random_fast_rng::{FastRng, Random};

/// compare two arrays for equality
/// Returns true if arrays have the same length and corresponding elements are "equal"
/// ```
/// use kms_test_util::arrays_eq;
/// let first: Vec<u8> = vec![1,2,3,4,5];
/// let mut second: Vec<u8> = Vec::new();
/// second.extend_from_slice(&first);
/// assert!(arrays_eq(&first, &second));
/// ```
pub fn arrays_eq<T: PartialEq>(a1: &[T], a2: &[T]) -> bool {
    a1.len() == a2.len() && a1.iter().zip(a2.iter()).all(|(a, b)| a == b)
}

/// Create a BytesMut buffer and fill with random data.
/// This does not generate cryptographically secure RNGs. Do NOT use this to generate keys,
/// except for unit tests.
/// ```
/// use kms_test_util::random_bytes;
/// const BUF_LEN:usize = 128;
/// let data = random_bytes(BUF_LEN);
/// assert!(data.len() == BUF_LEN);
/// ```
pub fn random_bytes(len: usize) -> BytesMut {
    let mut buf = BytesMut::zeroed(len);
    FastRng::new().fill_bytes(buf.as_mut());
    buf
}

/// Returns a copy of `buf` with a single bit inverted.
/// `bit` counts from the most significant bit of the first byte.
/// ```
/// use kms_test_util::flip_bit;
/// assert_eq!(flip_bit(&[0u8, 0u8], 9), vec![0u8, 0x40]);
/// ```
pub fn flip_bit(buf: &[u8], bit: usize) -> Vec<u8> {
    let mut out = buf.to_vec();
    out[bit / 8] ^= 0x80 >> (bit % 8);
    out
}
