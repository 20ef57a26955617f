//! CSRNG based on platform (OS) CSRNG.
//!
//! Used for nonce generation on every seal, and for symmetric key generation.
//! Keys held by remote managers such as Hashicorp Vault are generated
//! by those external services.
//!
use crate::error::{Error, Result};

/// Fill the buffer with random bytes
/// Currently implemented using `getrandom` crate, which uses
/// native OS/platform implementations.
pub fn fill_buf(buf: &mut [u8]) -> Result<(), Error> {
    getrandom::getrandom(buf)?;
    Ok(())
}

/// Returns a newly allocated vector of `len` random bytes
pub fn random_vec(len: usize) -> Result<Vec<u8>, Error> {
    let mut buf = vec![0u8; len];
    fill_buf(&mut buf)?;
    Ok(buf)
}
