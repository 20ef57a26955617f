//! EnvManager - derives the master key from a passphrase in an environment variable

use crate::{
    bundle::CipherBundle,
    error::{Error, Result},
    kdf::derive_key,
    managers::KeyManager,
};

use async_trait::async_trait;
use bytes::Bytes;
use std::{env, fmt};
use tracing::debug;
use url::Url;
use zeroize::Zeroizing;

/// Default variable name to be used if var not specified in the manager uri
const ENV_VAR_NAME: &str = "KMS_PASSPHRASE";
/// EnvManager uri is "env:", or "env://VARNAME" to use a custom environment variable.
pub const SCHEME: &str = "env";

/// This randomly-generated context (aka "salt") is unique to this application,
/// and must remain constant so that the same passphrase keeps producing the
/// same master key.
const KDF_SALT: &[u8] = b"Vq7#kP2w!Lr9$zTm&Xc4@Hn8^Bd1*Gs6";

/// EnvManager holds a master key derived from a passphrase.
///
/// The passphrase from the environment is combined with a fixed application salt
/// through scrypt to generate a 256-bit key. Payloads are sealed with AES-GCM
/// and returned as [`CipherBundle`](crate::bundle::CipherBundle) text.
///
/// Uri formats:
/// - `env:` uses the default environment variable `KMS_PASSPHRASE`
/// - `env:VARNAME` - variable `VARNAME` contains the passphrase
/// - `env://VARNAME` - alternate syntax
///
pub struct EnvManager {
    master_key: Zeroizing<Vec<u8>>,
}

/// Implementation of Debug that doesn't print key to prevent accidental leaks via logging
impl fmt::Debug for EnvManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvManager").finish_non_exhaustive()
    }
}

impl EnvManager {
    /// Creates a manager from the passphrase directly.
    /// Runs scrypt once, which takes tens of milliseconds.
    pub fn from_passphrase(passphrase: &str) -> Result<Self, Error> {
        let master_key = Zeroizing::new(derive_key(passphrase, KDF_SALT)?);
        Ok(EnvManager { master_key })
    }

    /// Creates a manager from a uri of the form `env:`, `env:VAR` or `env://VAR`.
    /// Fails if the variable is not defined.
    pub fn from_uri(uri: &str) -> Result<Self, Error> {
        // error thrown here if uri is malformed
        let varname = get_varname(uri)?;
        // error here if env var not defined
        let passphrase =
            Zeroizing::new(env::var(&varname).map_err(|_| Error::MissingEnv(varname.clone()))?);
        debug!(var = %varname, "deriving master key from environment");
        Self::from_passphrase(&passphrase)
    }
}

#[async_trait]
impl KeyManager for EnvManager {
    /// returns the uri scheme
    fn get_scheme(&self) -> &str {
        SCHEME
    }

    /// Encrypts the payload with the master key.
    /// Result is the utf-8 text of a cipher bundle.
    async fn encrypt(&self, plaintext: &[u8]) -> Result<Bytes, Error> {
        let bundle = CipherBundle::seal(&self.master_key, None, plaintext)?;
        Ok(Bytes::from(bundle.to_string()))
    }

    /// Parses the cipher bundle and decrypts it with the master key
    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Bytes, Error> {
        let text = std::str::from_utf8(ciphertext)?;
        let bundle: CipherBundle = text.parse()?;
        Ok(Bytes::from(bundle.open(&self.master_key)?))
    }
}

/// lookup environment variable name from the uri
fn get_varname(uri: &str) -> Result<String, Error> {
    let url = Url::parse(uri).map_err(|e| {
        Error::InvalidParameter(format!(
            "Invalid uri. Should be 'env://VAR' or 'env:': {}",
            e
        ))
    })?;
    if url.scheme() != SCHEME {
        return Err(Error::InvalidParameter(
            "Invalid scheme for env manager. Uri should begin with 'env:'".to_string(),
        ));
    }

    Ok(match url.host_str() {
        // "env://foo" -> (host:Some("foo"), path: "")
        // "env://foo/bar" -> (host:Some("foo"), path:"/bar")
        Some(host) => host,

        None => {
            if !url.path().is_empty() {
                // (alt syntax) "env:foo" -> (host:None, path:"foo")
                url.path()
            } else {
                // "env:" - use default variable name
                ENV_VAR_NAME
            }
        }
    }
    .to_string())
}
