//! Key manager definitions and implementations.
//!
//! A key manager holds a master key and performs the raw encrypt/decrypt
//! operations the HTTP service exposes. The master key never leaves the manager.
//! Managers that depend on external services (such as Hashicorp Vault)
//! are packaged separately from the core library.
pub mod env;

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

pub use env::EnvManager;

/// Encrypts and decrypts opaque payloads with a managed master key.
///
/// The ciphertext format is owned by the implementation: callers must only
/// pass back bytes that were returned by `encrypt` of the same manager.
/// Implementations must be safe to share between concurrently running requests.
#[async_trait]
pub trait KeyManager: Send + Sync + fmt::Debug {
    /// Returns the uri scheme this manager handles (e.g. "env")
    fn get_scheme(&self) -> &str;

    /// Encrypts the plaintext with the master key
    async fn encrypt(&self, plaintext: &[u8]) -> Result<Bytes, Error>;

    /// Decrypts a ciphertext previously produced by `encrypt`
    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Bytes, Error>;
}

/// Returns the scheme part of a manager uri, e.g. "env" for "env:FOO"
pub fn uri_scheme(uri: &str) -> Result<&str, Error> {
    match uri.split_once(':') {
        Some((scheme, _)) if !scheme.is_empty() => Ok(scheme),
        _ => Err(Error::InvalidParameter(format!(
            "manager uri '{}' has no scheme",
            uri
        ))),
    }
}
