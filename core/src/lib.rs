//! # kms-core
//!
//! Symmetric cryptography primitives and key managers for the kms service.
//!
//! The library is used in two ways. Key managers use it to hold a master key
//! and to encrypt and decrypt payloads on behalf of the HTTP service. Any other
//! component uses it directly to protect secrets at rest:
//!
//! - [`ciphers`]: authenticated encryption (AES-GCM) with a fresh random nonce per message
//! - [`kdf`]: deterministic key derivation from a passphrase and salt (scrypt)
//! - [`password`]: salted password hashing and verification (bcrypt)
//! - [`digest`]: cheap salted digest for looking up identifiers such as email addresses
//! - [`bundle`]: text format carrying algorithm, key version, ciphertext and nonce
//! - [`managers`]: the [`KeyManager`](managers::KeyManager) trait and the
//!   passphrase-based [`EnvManager`](managers::EnvManager)
//!
//! ```
//! use kms_core::ciphers::{decrypt_with, encrypt_with, generate_key, KEYBYTES};
//! # fn main() -> Result<(), kms_core::error::Error> {
//! let key = generate_key(KEYBYTES)?;
//! let sealed = encrypt_with(&key, b"hello world!")?;
//! // to decrypt, the recipient needs the key, the ciphertext and the nonce
//! let plaintext = decrypt_with(&key, &sealed.ciphertext, &sealed.nonce)?;
//! assert_eq!(plaintext, b"hello world!");
//! # Ok(())
//! # }
//! ```
//!
//! ## Implementation notes
//!
//! Crypto algorithms used are implemented by other packages, notably
//! [RustCrypto](https://github.com/rustcrypto/), a pure-rust implementation.
//! Password hashing uses the [`bcrypt`](https://crates.io/crates/bcrypt) crate.
//!

pub mod bundle;
pub mod ciphers;
pub mod digest;
pub mod error;
pub mod kdf;
pub mod managers;
pub mod password;
pub mod rand;
pub mod util;
