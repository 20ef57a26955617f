// src/vault_client.rs
// async http api client for the hashicorp vault transit engine

use base64::{engine::general_purpose::STANDARD, Engine as _};
use kms_core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::error;
use url::Url;

/// environment variable used to store token, (if not provided in manager uri)
pub(crate) const VAULT_TOKEN: &str = "VAULT_TOKEN";
/// environment variable used to hold vault address, if not provided in manager uri
pub(crate) const VAULT_ADDR: &str = "VAULT_ADDR";
/// fallback for VAULT_ADDR if not defined (without trailing slash)
pub(crate) const DEFAULT_VAULT_ADDR: &str = "http://127.0.0.1:8200";

/// default hashicorp listen port - can be overridden in manager uri
const DEFAULT_PORT: u16 = 8200;
/// manager uri prefix
pub const URL_SCHEME: &str = "hashivault";
///
/// url paths used in this api
const TRANSIT_ENCRYPT_URL: &str = "/v1/transit/encrypt/";
const TRANSIT_DECRYPT_URL: &str = "/v1/transit/decrypt/";
const TRANSIT_KEY_URL: &str = "/v1/transit/keys/";

/// Metadata extracted from manager uri, used to generate http header and urls for vault client api
#[derive(Clone)]
pub struct ClientSpec {
    pub base_url: String,
    pub key_name: String,
    pub token: String,
}

/// Debug omits the token so specs can be logged
impl std::fmt::Debug for ClientSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSpec")
            .field("base_url", &self.base_url)
            .field("key_name", &self.key_name)
            .finish_non_exhaustive()
    }
}

/// Structure used for Create key request
#[derive(Debug, Deserialize, Serialize)]
struct CreateKeyReq {
    // valid key types: https://www.vaultproject.io/api-docs/secret/transit#type
    r#type: String,
}

/// Structure used for Decrypt-Request and Encrypt-Response
#[derive(Debug, Deserialize, Serialize)]
pub struct CipherResp {
    data: CipherData,
}

/// Structure used for Decrypt-Request and Encrypt-Response
#[derive(Debug, Deserialize, Serialize)]
pub struct CipherData {
    ciphertext: String,
}

/// Structure used for Encrypt-Request and Decrypt-Response
#[derive(Deserialize)]
pub struct PlainResp {
    data: PlainData,
}

/// Structure used for Encrypt-Request and Decrypt-Response
#[derive(Deserialize, Serialize)]
pub struct PlainData {
    plaintext: String,
}

/// Structure used to enable deletion on key
#[derive(Debug, Deserialize, Serialize)]
pub struct DeletionConfig {
    deletion_allowed: bool,
}

/// Create new vault http client for api requests with the given api token
pub fn new_client(token: &str) -> Result<reqwest::Client, Error> {
    let mut headers = reqwest::header::HeaderMap::new();
    let _ = headers.insert(
        "X-Vault-Token",
        reqwest::header::HeaderValue::from_str(token)
            .map_err(|_| Error::InvalidParameter("invalid token string".to_string()))?,
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| Error::Manager(format!("cannot build vault http client: {}", e)))
}

/// Send POST request to vault server and parse json response
/// Returns error if there are any IO errors OR if http status is not 2xx
pub async fn post_json<REQ, RESP>(
    client: &reqwest::Client,
    url: String,
    body: REQ,
) -> Result<RESP, Error>
where
    REQ: Serialize,
    RESP: for<'de> serde::de::Deserialize<'de>,
{
    post(client, url, body)
        .await?
        .json::<RESP>()
        .await
        .map_err(|e| Error::Manager(format!("Invalid json response from vault server: {}", e)))
}

/// Send POST request to vault server, returning http response
/// Returns error if there are any IO errors OR if http status is not 2xx
pub async fn post<REQ>(
    client: &reqwest::Client,
    url: String,
    body: REQ,
) -> Result<reqwest::Response, Error>
where
    REQ: Serialize,
{
    let res = client
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Manager(format!("Vault server IO error: {}", e)))?;
    let status = res.status();
    if !status.is_success() {
        // request and response bodies may carry key material; log status only
        error!(%status, %url, "vault request failed");
        return Err(Error::Manager(format!("Vault server api error: {}", status)));
    }
    Ok(res)
}

/// Create a new transit key.
/// Returns error if there are any IO errors OR if http status is not 2xx
/// currently only used for tests
pub async fn create_key(spec: &ClientSpec, key_type: &str) -> Result<(), Error> {
    let client = new_client(&spec.token)?;
    let url = format!("{}{}{}", spec.base_url, TRANSIT_KEY_URL, spec.key_name);
    let _ = post(
        &client,
        url,
        CreateKeyReq {
            r#type: String::from(key_type),
        },
    )
    .await?;
    Ok(())
}

/// Encrypt the plaintext data using transit api, using key hosted on vault server
/// Returns data as string of the form: vault:v1:<base64-encoded-data>
pub async fn encrypt(
    client: &reqwest::Client,
    spec: &ClientSpec,
    plaintext: &[u8],
) -> Result<String, Error> {
    let res: CipherResp = post_json(
        client,
        format!("{}{}{}", spec.base_url, TRANSIT_ENCRYPT_URL, spec.key_name),
        PlainData {
            plaintext: STANDARD.encode(plaintext),
        },
    )
    .await?;
    Ok(res.data.ciphertext)
}

/// Decrypts the data using transit api, using key hosted on vault server
/// Input data is of the form "vault:v1:<base64-encoded-data>"
pub async fn decrypt(
    client: &reqwest::Client,
    spec: &ClientSpec,
    ciphertext: String,
) -> Result<Vec<u8>, Error> {
    let res: PlainResp = post_json(
        client,
        format!("{}{}{}", spec.base_url, TRANSIT_DECRYPT_URL, spec.key_name),
        CipherData { ciphertext },
    )
    .await?;
    STANDARD
        .decode(res.data.plaintext)
        .map_err(|_| Error::Manager(String::from("response had invalid base64")))
}

/// Send key delete request to vault server
/// Returns error if there are any IO errors
pub async fn delete_key(spec: &ClientSpec) -> Result<(), Error> {
    let client = new_client(&spec.token)?;
    let url = format!("{}{}{}", spec.base_url, TRANSIT_KEY_URL, spec.key_name);

    // two api calls are required to delete a key:
    //   the deletion_allowed must be set on the key's endpoint
    //   then deletion may be called
    let _ = post(
        &client,
        format!("{}/config", url),
        DeletionConfig {
            deletion_allowed: true,
        },
    )
    .await?;

    let _ = client
        .delete(&url)
        .send()
        .await
        .map_err(|e| Error::Manager(format!("Vault server IO error: {}", e)))?
        .error_for_status()
        .map_err(|e| Error::Manager(format!("Vault server api delete error: {}", e)))?;
    Ok(())
}

/// extract query parameter from url.
///   Example: url "http://server/path?foo=bar", foo => "bar"
/// Returns None if token is undefined or empty
fn get_query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}

pub fn get_base_url() -> String {
    env::var(VAULT_ADDR)
        .map(|s| String::from(remove_trailing_slash(&s)))
        // not in env, fallback to default
        .unwrap_or_else(|_| String::from(DEFAULT_VAULT_ADDR))
}

impl ClientSpec {
    /// Parse uri into client spec
    ///
    /// Url format must be in one of the following formats*:
    ///
    ///   - `hashivault://key`
    ///     If this format is used, scheme, host, and port are
    ///     found from environment variable VAULT_ADDR, or, if VAULT_ADDR is undefined,
    ///     the defaults used are http://127.0.0.1:8200
    ///   - `hashivault://host:port/key`
    ///     If this format is used, host and port override any possible value of
    ///     VAULT_ADDR, and scheme is inferred from the host. If host is `localhost`
    ///     or `127.x.x.x`, scheme is `http`, otherwise it is `https`
    ///   - `hashivault:http://host:port/key`
    ///     This uri format explicitly overrides scheme, host, and port.
    ///
    /// (*) The token must also be provided, either by appending ?token=VALUE
    ///   to one of the uri forms above, or by setting the environment var VAULT_TOKEN.
    ///
    pub fn from_uri(uri: &str) -> Result<ClientSpec, Error> {
        let mut url =
            Url::parse(uri).map_err(|e| Error::InvalidParameter(format!("Invalid uri: {}", e)))?;
        if url.scheme() != URL_SCHEME {
            return Err(Error::InvalidParameter(format!(
                "Invalid manager uri, must begin with '{}:'",
                URL_SCHEME,
            )));
        }

        // for third format ("hashivault:http..."), parse path again
        if url.path().starts_with("http") && url.host_str().is_none() {
            let inner = match url.query() {
                Some(q) => format!("{}?{}", url.path(), q),
                None => url.path().to_string(),
            };
            url = Url::parse(&inner)
                .map_err(|_| Error::InvalidParameter("Invalid manager uri".to_string()))?;
        }

        let base_url = match url.host_str() {
            // host was specified in uri,
            // so we'll use uri (or defaults) for scheme, host, and port
            Some(host) if !url.path().is_empty() && url.path() != "/" => {
                let scheme = match url.scheme() {
                    URL_SCHEME => {
                        // these default schemes can always be overridden with third format above
                        if host == "localhost" || host.starts_with("127.") {
                            "http"
                        } else {
                            "https"
                        }
                    }
                    s => s,
                };
                let port: u16 = url.port().unwrap_or(DEFAULT_PORT);
                format!("{}://{}:{}", scheme, host, port)
            }
            _ => get_base_url(),
        };

        let key_name = if url.path().is_empty() {
            // no host:port specified, url was hashivault://KEY_NAME
            url.host_str()
                .ok_or_else(|| Error::InvalidParameter("Invalid manager uri".to_string()))?
        } else {
            url.path()
        };
        let key_name = key_name.trim_start_matches('/');
        if key_name.is_empty() {
            return Err(Error::InvalidParameter(
                "uri missing key name, for example 'hashivault://KEY_NAME'".to_string(),
            ));
        }

        // look for 'token=' query parameter, or look in environment if not in url
        let token = match get_query_value(&url, "token") {
            Some(v) => v,
            None => env::var(VAULT_TOKEN).unwrap_or_default(),
        };
        // handle cases where query param or env var is defined, but empty
        if token.is_empty() {
            return Err(Error::InvalidParameter(format!(
                "Manager uri did not contain token query parameter, and {} is undefined",
                VAULT_TOKEN
            )));
        }

        Ok(ClientSpec {
            base_url,
            key_name: String::from(key_name),
            token,
        })
    } // from_uri
} // impl ClientSpec

fn remove_trailing_slash(s: &str) -> &str {
    s.strip_suffix('/').unwrap_or(s)
}
