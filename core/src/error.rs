//! Crate error handling

use aes_gcm::aead;
pub use std::result::Result;
use thiserror::Error as ThisError;

/// Error enum that rolls-up all error messages in this crate
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Random generation error: {0}")]
    Random(String),

    /// key or nonce has a length the cipher cannot be built from
    #[error("Cipher init error: {0}")]
    CipherInit(String),

    /// ciphertext failed to authenticate: wrong key, wrong nonce, or tampered data
    #[error("Authentication error: ciphertext could not be opened")]
    Authentication,

    #[error("Key derivation error: {0}")]
    Derivation(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("password does not match hash")]
    PasswordMismatch,

    #[error("Invalid cipher bundle: {0}")]
    Bundle(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Missing environment setting: {0}")]
    MissingEnv(String),

    /// the key manager rejected or failed the request
    #[error("Key manager error: {0}")]
    Manager(String),

    #[error("Key manager not found for uri: {0}")]
    ManagerNotFound(String),

    #[error("encoding error {0}")]
    UTF8EncodingError(String),

    #[error("Error: {0}")]
    OtherError(String),
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(e: std::string::FromUtf8Error) -> Error {
        Error::UTF8EncodingError(e.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(e: std::str::Utf8Error) -> Error {
        Error::UTF8EncodingError(e.to_string())
    }
}

impl From<aead::Error> for Error {
    fn from(_: aead::Error) -> Error {
        // aead::Error is opaque on purpose; nothing to carry over
        Error::Authentication
    }
}

impl From<getrandom::Error> for Error {
    fn from(e: getrandom::Error) -> Error {
        Error::Random(format!("out of entropy: {}", e))
    }
}
