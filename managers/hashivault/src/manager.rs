//! Key manager for Hashicorp Vault
//! Uses vault's 'transit' engine for encryption and decryption.
//!
//! Manager uris are of the form
//! - `hashivault://MYKEY`  (uses the default host:port == localhost:8200)
//! - `hashivault://host:port/MYKEY`
//!   - this form uses http for localhost and https for all other hosts
//! - `hashivault:https://host:port/MYKEY`
//!   - this form is only needed if the http/https scheme inferred above is not correct
//!
//! If host and port are not set in the uri, the VAULT_ADDR is checked.
//! VAULT_ADDR may be defined of the form 'https://127.0.0.1:8200/'.
//! If VAULT_ADDR is not set, 'http://127.0.0.1:8200' is used.
//!
//! The REST API urls used to access the vault server are of the form:
//!    http(s)://host:port/v1/transit/(encrypt|decrypt)/<KEY_NAME>
//!
use crate::vault_client::{decrypt, encrypt, new_client, ClientSpec, URL_SCHEME};
use async_trait::async_trait;
use bytes::Bytes;
use kms_core::{
    error::{Error, Result},
    managers::KeyManager,
};
use tracing::debug;

/// HashivaultManager - hashicorp vault.
/// The master key never leaves the vault server.
#[derive(Debug)]
pub struct HashivaultManager {
    spec: ClientSpec,
    client: reqwest::Client,
}

impl HashivaultManager {
    /// Constructs a new hashivault manager for the transit key named in `uri`
    pub fn from_uri(uri: &str) -> Result<Self, Error> {
        let spec = ClientSpec::from_uri(uri)?;
        let client = new_client(&spec.token)?;
        debug!(base_url = %spec.base_url, key = %spec.key_name, "using vault transit key");
        Ok(HashivaultManager { spec, client })
    }
}

#[async_trait]
impl KeyManager for HashivaultManager {
    /// Returns the scheme 'hashivault'
    fn get_scheme(&self) -> &str {
        URL_SCHEME
    }

    /// Sends the payload to hashicorp vault to be encrypted.
    /// Returns the vault ciphertext string (`vault:v1:...`) as bytes
    async fn encrypt(&self, plaintext: &[u8]) -> Result<Bytes, Error> {
        let val = encrypt(&self.client, &self.spec, plaintext).await?;
        Ok(Bytes::from(val))
    }

    /// Sends a vault ciphertext string to hashicorp vault to be decrypted.
    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Bytes, Error> {
        let ciphertext = String::from_utf8(ciphertext.to_vec())?;
        let plaintext = decrypt(&self.client, &self.spec, ciphertext).await?;
        Ok(Bytes::from(plaintext))
    }
}
