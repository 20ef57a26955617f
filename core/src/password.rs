//! Password hashing and verification using bcrypt
//!
//! Hashes are self-describing modular-crypt strings (`$2b$10$...`) that carry
//! their own salt and cost, so they can be stored as-is.

use crate::error::{Error, Result};

/// bcrypt cost factor used for new hashes
pub const HASH_COST: u32 = 10;

/// Hash the given password with a random salt at [`HASH_COST`]
pub fn hash_password(password: &str) -> Result<String, Error> {
    bcrypt::hash(password, HASH_COST)
        .map_err(|e| Error::Hashing(format!("error hashing password: {}", e)))
}

/// Compare a password with a stored hash.
///
/// Returns `Error::PasswordMismatch` if the password does not match, or
/// `Error::Hashing` if `hash` is not a valid bcrypt hash.
/// Verification is done by the bcrypt implementation; callers must never
/// rehash and compare strings themselves.
pub fn compare_password(password: &str, hash: &str) -> Result<(), Error> {
    match bcrypt::verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(Error::PasswordMismatch),
        Err(e) => Err(Error::Hashing(format!("invalid password hash: {}", e))),
    }
}
