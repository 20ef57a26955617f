//! Key derivation from passphrases
//!
//! Uses scrypt (from [RustCrypto](https://github.com/RustCrypto/password-hashes)),
//! a memory-hard function, so that brute-forcing a passphrase costs
//! both CPU time and memory.

use crate::error::{Error, Result};

/// Length of derived keys, suitable for AES-256
pub const DERIVED_KEY_LEN: usize = 32;

/// scrypt cost parameter N = 2^LOG_N.
/// The parameters may not change after deployment: keys derived with
/// other parameters will no longer be reproducible.
const LOG_N: u8 = 15;
/// scrypt block size
const R: u32 = 8;
/// scrypt parallelism
const P: u32 = 1;

/// Derive a 32-byte symmetric key from `secret` (most likely a password)
/// and `salt`. The same inputs always produce the same key.
/// The caller is responsible for generating and storing the salt.
pub fn derive_key(secret: &str, salt: &[u8]) -> Result<Vec<u8>, Error> {
    let params = scrypt::Params::new(LOG_N, R, P, DERIVED_KEY_LEN)
        .map_err(|e| Error::Derivation(format!("invalid scrypt params: {}", e)))?;
    let mut derived = vec![0u8; DERIVED_KEY_LEN];
    scrypt::scrypt(secret.as_bytes(), salt, &params, &mut derived)
        .map_err(|e| Error::Derivation(format!("error creating derived key: {}", e)))?;
    Ok(derived)
}
