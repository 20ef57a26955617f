//! Text serialization of sealed values.
//!
//! A cipher bundle carries everything needed to decrypt, apart from the key:
//!
//! ```text
//! {<algorithm>,<key version>} <base64 ciphertext> <base64 nonce>
//! ```
//!
//! The key version may be empty and the nonce chunk may be absent.
//! Base64 uses the standard alphabet with padding, so chunks never contain spaces.
//!
//! ```
//! use kms_core::bundle::{Algorithm, CipherBundle};
//! let bundle: CipherBundle = "{1,} aGVsbG8= AAAAAAAAAAAAAAAA".parse().expect("parse");
//! assert_eq!(bundle.algorithm, Algorithm::AesGcm);
//! assert_eq!(bundle.key_version, None);
//! assert_eq!(bundle.ciphertext, b"hello");
//! assert_eq!(bundle.to_string(), "{1,} aGVsbG8= AAAAAAAAAAAAAAAA");
//! ```

use crate::{
    ciphers::{decrypt_with, encrypt_with},
    error::{Error, Result},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::{fmt, str::FromStr};

/// Symmetric algorithms a bundle may name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// AES-GCM with 96-bit nonce and 128-bit tag
    AesGcm = 1,
}

impl TryFrom<u8> for Algorithm {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self, Error> {
        match id {
            1 => Ok(Algorithm::AesGcm),
            n => Err(Error::Bundle(format!("unknown algorithm version {}", n))),
        }
    }
}

/// A ciphertext together with the metadata needed to open it
#[derive(Clone, Debug, PartialEq)]
pub struct CipherBundle {
    pub algorithm: Algorithm,
    /// identifies which key of a managed key set was used, if the owner versions keys
    pub key_version: Option<u32>,
    pub ciphertext: Vec<u8>,
    pub nonce: Option<Vec<u8>>,
}

impl CipherBundle {
    /// Encrypt `plaintext` with `key` and wrap the result in a bundle
    pub fn seal(key: &[u8], key_version: Option<u32>, plaintext: &[u8]) -> Result<Self, Error> {
        let sealed = encrypt_with(key, plaintext)?;
        Ok(CipherBundle {
            algorithm: Algorithm::AesGcm,
            key_version,
            ciphertext: sealed.ciphertext,
            nonce: Some(sealed.nonce),
        })
    }

    /// Decrypt the bundle with `key`
    pub fn open(&self, key: &[u8]) -> Result<Vec<u8>, Error> {
        match self.algorithm {
            Algorithm::AesGcm => {
                let nonce = self
                    .nonce
                    .as_ref()
                    .ok_or_else(|| Error::Bundle("AES-GCM bundle requires a nonce".to_string()))?;
                decrypt_with(key, &self.ciphertext, nonce)
            }
        }
    }
}

impl fmt::Display for CipherBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},", self.algorithm as u8)?;
        if let Some(v) = self.key_version {
            write!(f, "{}", v)?;
        }
        write!(f, "}} {}", STANDARD.encode(&self.ciphertext))?;
        if let Some(nonce) = &self.nonce {
            write!(f, " {}", STANDARD.encode(nonce))?;
        }
        Ok(())
    }
}

impl FromStr for CipherBundle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        let rest = s
            .strip_prefix('{')
            .ok_or_else(|| Error::Bundle("missing '{' header".to_string()))?;
        let (header, body) = rest
            .split_once('}')
            .ok_or_else(|| Error::Bundle("unterminated header".to_string()))?;
        if !body.starts_with(char::is_whitespace) {
            return Err(Error::Bundle("expected whitespace after header".to_string()));
        }
        let (algo, key_version) = header
            .split_once(',')
            .ok_or_else(|| Error::Bundle(format!("malformed header '{{{}}}'", header)))?;

        let algo: u8 = algo
            .parse()
            .map_err(|_| Error::Bundle(format!("invalid algorithm version '{}'", algo)))?;
        let algorithm = Algorithm::try_from(algo)?;
        let key_version = match key_version {
            "" => None,
            v => Some(
                v.parse::<u32>()
                    .map_err(|_| Error::Bundle(format!("invalid key version '{}'", v)))?,
            ),
        };

        let mut chunks = body.split_whitespace();
        let ciphertext = chunks
            .next()
            .ok_or_else(|| Error::Bundle("missing ciphertext".to_string()))?;
        let ciphertext = STANDARD
            .decode(ciphertext)
            .map_err(|e| Error::Bundle(format!("ciphertext is not valid base64: {}", e)))?;
        let nonce = match chunks.next() {
            Some(n) => Some(
                STANDARD
                    .decode(n)
                    .map_err(|e| Error::Bundle(format!("nonce is not valid base64: {}", e)))?,
            ),
            None => None,
        };
        if chunks.next().is_some() {
            return Err(Error::Bundle("trailing data after nonce".to_string()));
        }

        Ok(CipherBundle {
            algorithm,
            key_version,
            ciphertext,
            nonce,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{Algorithm, CipherBundle};
    use crate::{
        ciphers::{generate_key, KEYBYTES},
        error::{Error, Result},
    };

    #[test]
    fn seal_print_parse_open() -> Result<(), Error> {
        let key = generate_key(KEYBYTES)?;
        let bundle = CipherBundle::seal(&key, Some(3), b"hello")?;
        let text = bundle.to_string();
        assert!(text.starts_with("{1,3} "), "header: {}", text);
        assert_eq!(text.split(' ').count(), 3);

        let parsed: CipherBundle = text.parse()?;
        assert_eq!(parsed, bundle);
        assert_eq!(parsed.open(&key)?, b"hello");
        Ok(())
    }

    #[test]
    fn without_nonce() -> Result<(), Error> {
        let bundle: CipherBundle = "{1,} aGVsbG8=".parse()?;
        assert_eq!(bundle.nonce, None);
        assert_eq!(bundle.to_string(), "{1,} aGVsbG8=");
        // cannot be opened without a nonce
        assert!(bundle.open(&[0u8; 32]).is_err());
        Ok(())
    }

    #[test]
    fn rejects_malformed() {
        for bad in [
            "",
            "1, aGVsbG8=",
            "{1 aGVsbG8=",
            "{x,} aGVsbG8=",
            "{9,} aGVsbG8=",
            "{1,v2} aGVsbG8=",
            "{1,}",
            "{1,}aGVsbG8=",
            "{1,}aGVsbG8= AAAAAAAAAAAAAAAA",
            "{1,} not*base64",
            "{1,} aGVsbG8= %%%",
            "{1,} aGVsbG8= AAAA AAAA",
        ] {
            match bad.parse::<CipherBundle>() {
                Err(Error::Bundle(_)) => {}
                other => panic!("'{}' expected bundle error, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn algorithm_ids() {
        assert_eq!(Algorithm::AesGcm as u8, 1);
        assert!(Algorithm::try_from(0u8).is_err());
    }
}
