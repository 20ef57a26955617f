//! AES-GCM (Galois/Counter Mode) with 96-bit nonces,
//! encryption implemented by [RustCrypto](https://github.com/RustCrypto/AEADs)
//!
//! The AES variant is selected by key length: 16, 24 or 32 bytes select
//! AES-128, AES-192 or AES-256.
//!
//! When targeting modern x86/x86_64 CPUs, use the following `RUSTFLAGS` to
//! take advantage of AES-NI and CLMUL CPU intrinsics:
//! `RUSTFLAGS="-Ctarget-cpu=sandybridge -Ctarget-feature=+aes,+sse2,+sse4.1,+ssse3"`

use crate::error::{Error, Result};
use aes_gcm::{
    aead::{consts::U12, Aead, KeyInit},
    aes::Aes192,
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce,
};
use std::fmt;

/// Number of bytes in encryption key for AES-256 (256 bits = 32 bytes)
pub const KEYBYTES: usize = 32;
/// Number of bytes in nonce (96 bits = 12 bytes)
pub const NONCEBYTES: usize = 12;
/// Number of bytes in auth integrity tag
pub const TAGBYTES: usize = 16;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// AES-GCM cipher initialized from a key.
/// The variant is chosen from the key length.
pub(crate) enum AesGcmCipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

/// Implementation of Debug that doesn't print key to prevent accidental leaks via logging
impl fmt::Debug for AesGcmCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = match self {
            AesGcmCipher::Aes128(_) => 128,
            AesGcmCipher::Aes192(_) => 192,
            AesGcmCipher::Aes256(_) => 256,
        };
        f.debug_struct("AesGcmCipher").field("bits", &bits).finish()
    }
}

impl AesGcmCipher {
    /// Initialize cipher with provided key.
    /// Key length must be 16, 24, or 32 bytes.
    pub(crate) fn init_from(key: &[u8]) -> Result<Self, Error> {
        let bad_len = |_| {
            Error::CipherInit(format!(
                "invalid AES key length {}, expected 16, 24 or 32 bytes",
                key.len()
            ))
        };
        Ok(match key.len() {
            16 => AesGcmCipher::Aes128(Aes128Gcm::new_from_slice(key).map_err(bad_len)?),
            24 => AesGcmCipher::Aes192(Aes192Gcm::new_from_slice(key).map_err(bad_len)?),
            32 => AesGcmCipher::Aes256(Aes256Gcm::new_from_slice(key).map_err(bad_len)?),
            n => {
                return Err(Error::CipherInit(format!(
                    "invalid AES key length {}, expected 16, 24 or 32 bytes",
                    n
                )))
            }
        })
    }

    /// Encrypts the plaintext with no associated data.
    /// Return value contains the ciphertext plus the authentication tag.
    pub(crate) fn seal(&self, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let nonce = nonce_from(nonce)?;
        let sealed = match self {
            AesGcmCipher::Aes128(c) => c.encrypt(nonce, plaintext),
            AesGcmCipher::Aes192(c) => c.encrypt(nonce, plaintext),
            AesGcmCipher::Aes256(c) => c.encrypt(nonce, plaintext),
        };
        sealed.map_err(|_| Error::CipherInit("plaintext too large to seal".to_string()))
    }

    /// Decrypts and verifies the ciphertext (which includes the tag).
    /// Returns Error::Authentication if the tag does not verify.
    pub(crate) fn open(&self, nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        let nonce = nonce_from(nonce)?;
        let opened = match self {
            AesGcmCipher::Aes128(c) => c.decrypt(nonce, ciphertext),
            AesGcmCipher::Aes192(c) => c.decrypt(nonce, ciphertext),
            AesGcmCipher::Aes256(c) => c.decrypt(nonce, ciphertext),
        };
        Ok(opened?)
    }
}

/// Nonce::from_slice panics on a length mismatch, so check first
fn nonce_from(nonce: &[u8]) -> Result<&Nonce<U12>, Error> {
    if nonce.len() != NONCEBYTES {
        return Err(Error::InvalidParameter(format!(
            "nonce must be {} bytes, got {}",
            NONCEBYTES,
            nonce.len()
        )));
    }
    Ok(Nonce::from_slice(nonce))
}
