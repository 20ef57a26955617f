//! Keyed digest for looking up identifiers without storing them in the clear.

use sha2::{Digest, Sha256};

/// Length of identifier digests
pub const DIGEST_LEN: usize = 32;

/// Hash `value` (for example an email address) together with `salt`
/// using SHA-256 over `value ++ salt`.
///
/// This is a cheap operation and offers no protection against offline
/// brute force. It is meant for equality lookups only; use
/// [`hash_password`](crate::password::hash_password) or
/// [`derive_key`](crate::kdf::derive_key) for secrets.
pub fn hash_identifier(value: &str, salt: &[u8]) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hasher.update(salt);
    hasher.finalize().into()
}
