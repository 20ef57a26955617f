//! Json bodies of the encrypt and decrypt endpoints

use crate::jwk::Jwk;
use serde::{Deserialize, Deserializer, Serialize};

/// `{"encrypted": "<base64>"}`: body of a decrypt request and of an encrypt response.
/// A missing or null field reads as the empty string.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EncryptedPayload {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub encrypted: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The `decrypted` field of an encrypt request, before validation.
/// Anything that is not a json string lands in `Other`.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DecryptedValue {
    Text(String),
    Other(serde_json::Value),
}

impl Default for DecryptedValue {
    fn default() -> Self {
        DecryptedValue::Other(serde_json::Value::Null)
    }
}

/// `{"decrypted": <any>}`: body of an encrypt request
#[derive(Debug, Deserialize)]
pub struct DecryptedRequest {
    #[serde(default)]
    pub decrypted: DecryptedValue,
}

/// Output of a decrypt request: the plaintext, or the plaintext transcoded to a JWK
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DecryptedOutput {
    Text(String),
    Key(Jwk),
}

/// `{"decrypted": <string | JWK>}`: body of a decrypt response
#[derive(Debug, Serialize)]
pub struct DecryptedResponse {
    pub decrypted: DecryptedOutput,
}
