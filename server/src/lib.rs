//! # kms-server
//!
//! JSON-over-HTTP shim around a [`KeyManager`](kms_core::managers::KeyManager).
//!
//! - `POST /decrypt[?jwk=1]`: `{"encrypted": "<base64>"}` to `{"decrypted": <string | JWK>}`
//! - `POST /encrypt`: `{"decrypted": "<string>"}` to `{"encrypted": "<base64>"}`
//! - `GET /healthz`: liveness probe
//!
//! Errors are returned as `{"error": "<message>", "status": <code>}`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod jwk;
pub mod payload;
pub mod server;

#[cfg(test)]
mod test_handlers;
