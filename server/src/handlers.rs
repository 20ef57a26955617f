//! Handlers for `POST /decrypt` and `POST /encrypt`
//!
//! Both handlers decode the json body, call the shared key manager once, and
//! write a single json response. Failures are terminal and never retried.

use crate::{
    error::{json_response, ApiError, EXPECTED_STRING},
    jwk,
    payload::{
        DecryptedOutput, DecryptedRequest, DecryptedResponse, DecryptedValue, EncryptedPayload,
    },
    server::AppState,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{body::Body, Request, Response, StatusCode};
use kms_core::util::form_get;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use tracing::{debug, error};

/// Decrypts `{"encrypted": "<base64>"}`.
/// With a non-empty `jwk` query parameter the plaintext must be a PEM private key,
/// and it is returned as a JWK object instead of a string.
pub async fn handle_decrypt<B>(
    state: &AppState,
    req: Request<B>,
) -> Result<Response<Full<Bytes>>, ApiError>
where
    B: Body,
    B::Error: Display,
{
    let jwk_mode = wants_jwk(req.uri().query())?;
    let payload: EncryptedPayload = read_json(req).await?;
    let ciphertext = STANDARD
        .decode(payload.encrypted.as_bytes())
        .map_err(|e| ApiError::MalformedRequest(format!("invalid base64 in .encrypted: {}", e)))?;

    let plaintext = state.manager.decrypt(&ciphertext).await.map_err(|e| {
        error!(error = %e, "decrypt failed");
        ApiError::UpstreamCrypto(e)
    })?;

    let decrypted = if jwk_mode {
        let key = jwk::transcode(&plaintext).map_err(|e| {
            error!(error = %e, "decrypted payload is not a supported private key");
            e
        })?;
        DecryptedOutput::Key(key)
    } else {
        DecryptedOutput::Text(String::from_utf8_lossy(&plaintext).into_owned())
    };
    debug!(jwk = jwk_mode, "decrypted payload");
    Ok(json_response(StatusCode::OK, &DecryptedResponse { decrypted }))
}

/// Encrypts `{"decrypted": "<string>"}`, returning `{"encrypted": "<base64>"}`
pub async fn handle_encrypt<B>(
    state: &AppState,
    req: Request<B>,
) -> Result<Response<Full<Bytes>>, ApiError>
where
    B: Body,
    B::Error: Display,
{
    let payload: DecryptedRequest = read_json(req).await?;
    let plaintext = match payload.decrypted {
        DecryptedValue::Text(s) if !s.is_empty() => s,
        _ => return Err(ApiError::TypeMismatch(EXPECTED_STRING)),
    };

    let ciphertext = state
        .manager
        .encrypt(plaintext.as_bytes())
        .await
        .map_err(|e| {
            error!(error = %e, "encrypt failed");
            ApiError::UpstreamCrypto(e)
        })?;
    Ok(json_response(
        StatusCode::OK,
        &EncryptedPayload {
            encrypted: STANDARD.encode(&ciphertext),
        },
    ))
}

/// true if the query string has a non-empty `jwk` parameter
fn wants_jwk(query: Option<&str>) -> Result<bool, ApiError> {
    let fields: Vec<(String, String)> = serde_urlencoded::from_str(query.unwrap_or(""))
        .map_err(|e| ApiError::MalformedRequest(format!("invalid query string: {}", e)))?;
    Ok(form_get(&fields, "jwk").map_or(false, |v| !v.is_empty()))
}

/// Collects the request body and parses it as json
async fn read_json<B, T>(req: Request<B>) -> Result<T, ApiError>
where
    B: Body,
    B::Error: Display,
    T: DeserializeOwned,
{
    let body = req
        .into_body()
        .collect()
        .await
        .map_err(|e| ApiError::MalformedRequest(format!("error reading request body: {}", e)))?
        .to_bytes();
    serde_json::from_slice(&body)
        .map_err(|e| ApiError::MalformedRequest(format!("invalid json body: {}", e)))
}
