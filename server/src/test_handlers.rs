// Drives the router with in-memory requests; no sockets are opened.

use crate::{
    jwk::Jwk,
    server::{route, AppState},
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode};
use kms_core::{
    error::{Error, Result},
    managers::{EnvManager, KeyManager},
};
use serde_json::{json, Value};
use std::sync::Arc;

const PKCS1_PEM: &str = include_str!("../tests/data/rsa_pkcs1.pem");
const PKCS8_PEM: &str = include_str!("../tests/data/rsa_pkcs8.pem");

/// "encrypts" by prepending a marker, which decrypt requires and strips
#[derive(Debug)]
struct MockManager;

const MARKER: &[u8] = b"mock:";

#[async_trait]
impl KeyManager for MockManager {
    fn get_scheme(&self) -> &str {
        "mock"
    }

    async fn encrypt(&self, plaintext: &[u8]) -> Result<Bytes, Error> {
        Ok(Bytes::from([MARKER, plaintext].concat()))
    }

    async fn decrypt(&self, ciphertext: &[u8]) -> Result<Bytes, Error> {
        match ciphertext.strip_prefix(MARKER) {
            Some(pt) => Ok(Bytes::copy_from_slice(pt)),
            None => Err(Error::Manager("not a mock ciphertext".to_string())),
        }
    }
}

/// fails every request, as an unreachable key manager would
#[derive(Debug)]
struct FailingManager;

#[async_trait]
impl KeyManager for FailingManager {
    fn get_scheme(&self) -> &str {
        "failing"
    }

    async fn encrypt(&self, _: &[u8]) -> Result<Bytes, Error> {
        Err(Error::Manager("unavailable".to_string()))
    }

    async fn decrypt(&self, _: &[u8]) -> Result<Bytes, Error> {
        Err(Error::Manager("unavailable".to_string()))
    }
}

fn state(manager: impl KeyManager + 'static) -> Arc<AppState> {
    Arc::new(AppState::new(Arc::new(manager)))
}

fn mock_ciphertext(plaintext: &[u8]) -> String {
    STANDARD.encode([MARKER, plaintext].concat())
}

/// sends one request through the router, returning status and parsed json body
async fn send(state: Arc<AppState>, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .expect("request");
    let resp = route(state, req).await;
    let status = resp.status();
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    let json = serde_json::from_slice(&bytes).expect("json body");
    (status, json)
}

async fn post(state: Arc<AppState>, uri: &str, body: &str) -> (StatusCode, Value) {
    send(state, Method::POST, uri, body).await
}

#[tokio::test]
async fn decrypt_plain() {
    let body = json!({ "encrypted": mock_ciphertext(b"hello") }).to_string();
    let (status, json) = post(state(MockManager), "/decrypt", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "decrypted": "hello" }));
}

#[tokio::test]
async fn decrypt_empty_jwk_flag_is_plain() {
    let body = json!({ "encrypted": mock_ciphertext(b"hello") }).to_string();
    let (status, json) = post(state(MockManager), "/decrypt?jwk=", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["decrypted"], "hello");
}

#[tokio::test]
async fn decrypt_pkcs1_to_jwk() {
    let body = json!({ "encrypted": mock_ciphertext(PKCS1_PEM.as_bytes()) }).to_string();
    let (status, json) = post(state(MockManager), "/decrypt?jwk=1", &body).await;
    assert_eq!(status, StatusCode::OK);
    let jwk: Jwk = serde_json::from_value(json["decrypted"].clone()).expect("jwk object");
    assert_eq!(jwk.kty, "RSA");
    assert_eq!(jwk.e, "AQAB");
}

#[tokio::test]
async fn decrypt_jwk_not_pem() {
    let body = json!({ "encrypted": mock_ciphertext(b"hello") }).to_string();
    let (status, json) = post(state(MockManager), "/decrypt?jwk=1", &body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "error decoding decrypted key in PEM format");
    assert_eq!(json["status"], 500);
}

#[tokio::test]
async fn decrypt_jwk_pkcs8_unsupported() {
    let body = json!({ "encrypted": mock_ciphertext(PKCS8_PEM.as_bytes()) }).to_string();
    let (status, _) = post(state(MockManager), "/decrypt?jwk=1", &body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn decrypt_bad_base64() {
    let (status, json) = post(
        state(MockManager),
        "/decrypt",
        r#"{"encrypted":"not base64!"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn decrypt_malformed_json() {
    let (status, _) = post(state(MockManager), "/decrypt", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn decrypt_null_or_missing_encrypted_reaches_manager() {
    for body in [r#"{"encrypted":null}"#, "{}"] {
        let (status, json) = post(state(MockManager), "/decrypt", body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "body {}", body);
        assert_eq!(json["status"], 500);
    }
}

#[tokio::test]
async fn decrypt_manager_failure() {
    let body = json!({ "encrypted": mock_ciphertext(b"hello") }).to_string();
    let (status, json) = post(state(FailingManager), "/decrypt", &body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["status"], 500);
}

#[tokio::test]
async fn encrypt_string() {
    let (status, json) = post(state(MockManager), "/encrypt", r#"{"decrypted":"hello"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "encrypted": mock_ciphertext(b"hello") }));
}

#[tokio::test]
async fn encrypt_rejects_non_string() {
    for body in [
        r#"{"decrypted":42}"#,
        r#"{"decrypted":{"kty":"RSA"}}"#,
        r#"{"decrypted":null}"#,
        r#"{}"#,
    ] {
        let (status, json) = post(state(MockManager), "/encrypt", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(json["error"], "expected .decrypted to be a non-empty string");
    }
}

#[tokio::test]
async fn encrypt_rejects_empty_string() {
    let (status, json) = post(state(MockManager), "/encrypt", r#"{"decrypted":""}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn encrypt_malformed_json() {
    let (status, _) = post(state(MockManager), "/encrypt", "[1,2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn encrypt_manager_failure() {
    let (status, json) = post(state(FailingManager), "/encrypt", r#"{"decrypted":"hello"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["status"], 500);
}

#[tokio::test]
async fn env_manager_round_trip() {
    let manager = EnvManager::from_passphrase("round trip passphrase").expect("manager");
    let state = Arc::new(AppState::new(Arc::new(manager)));

    let (status, json) = post(
        Arc::clone(&state),
        "/encrypt",
        r#"{"decrypted":"attack at dawn"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let encrypted = json["encrypted"].as_str().expect("encrypted string");

    // the manager ciphertext is a cipher bundle
    let bundle = STANDARD.decode(encrypted).expect("base64");
    assert!(bundle.starts_with(b"{1,}"));

    let body = json!({ "encrypted": encrypted }).to_string();
    let (status, json) = post(state, "/decrypt", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["decrypted"], "attack at dawn");
}

#[tokio::test]
async fn healthz() {
    let (status, json) = send(state(MockManager), Method::GET, "/healthz", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "ok" }));
}

#[tokio::test]
async fn unknown_path() {
    let (status, json) = post(state(MockManager), "/rotate", "{}").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn wrong_method() {
    let (status, _) = send(state(MockManager), Method::GET, "/decrypt", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let (status, _) = send(state(MockManager), Method::POST, "/healthz", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
