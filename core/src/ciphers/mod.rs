//! Symmetric envelope: authenticated encryption of byte payloads with a caller-held key.
//!
//! Every call to [`encrypt_with`] draws a fresh random nonce, which is returned
//! alongside the ciphertext. The nonce is not secret, but it is required for
//! decryption: losing it makes the ciphertext permanently undecryptable.
//!
//! Nonces are 96-bit random values. Do not seal more than 2^32 messages
//! with a single key, or the probability of a repeated nonce becomes significant.

pub mod aesgcm;

use crate::{
    error::{Error, Result},
    rand,
};
use aesgcm::AesGcmCipher;
use serde::{Deserialize, Serialize};

pub use aesgcm::{KEYBYTES, NONCEBYTES, TAGBYTES};

/// Output of a seal operation. Both fields must be kept to decrypt.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Sealed {
    /// encrypted payload followed by the authentication tag
    pub ciphertext: Vec<u8>,
    /// the nonce used for this encryption
    pub nonce: Vec<u8>,
}

/// Generate a new symmetric key of `size` bytes using the platform CSRNG.
/// For use with [`encrypt_with`], size should be 16, 24, or 32 ([`KEYBYTES`]).
pub fn generate_key(size: usize) -> Result<Vec<u8>, Error> {
    rand::random_vec(size)
        .map_err(|e| Error::Random(format!("error generating encryption key: {}", e)))
}

/// Encrypts `plaintext` with AES-GCM under `key`, with no associated data.
/// Returns the ciphertext (including tag) and the freshly generated nonce.
pub fn encrypt_with(key: &[u8], plaintext: &[u8]) -> Result<Sealed, Error> {
    let cipher = AesGcmCipher::init_from(key)?;
    let mut nonce = vec![0u8; NONCEBYTES];
    rand::fill_buf(&mut nonce)
        .map_err(|e| Error::Random(format!("error generating nonce for encryption: {}", e)))?;
    let ciphertext = cipher.seal(&nonce, plaintext)?;
    Ok(Sealed { ciphertext, nonce })
}

/// Decrypts a ciphertext produced by [`encrypt_with`].
/// Fails closed: any mismatch of key, nonce, or ciphertext returns an error
/// and no plaintext.
pub fn decrypt_with(key: &[u8], ciphertext: &[u8], nonce: &[u8]) -> Result<Vec<u8>, Error> {
    let cipher = AesGcmCipher::init_from(key)?;
    cipher.open(nonce, ciphertext)
}

impl Sealed {
    /// Decrypts this sealed value with `key`
    pub fn open(&self, key: &[u8]) -> Result<Vec<u8>, Error> {
        decrypt_with(key, &self.ciphertext, &self.nonce)
    }
}
