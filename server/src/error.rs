//! Request errors and their HTTP rendering

use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    header::{HeaderValue, CONTENT_TYPE},
    Response, StatusCode,
};
use serde::Serialize;
use thiserror::Error as ThisError;

/// Message returned when an encrypt request carries anything but a non-empty string
pub const EXPECTED_STRING: &str = "expected .decrypted to be a non-empty string";

/// Every way a request can fail. Each variant maps to exactly one status code,
/// and each failed request produces exactly one error response.
#[derive(Debug, ThisError)]
pub enum ApiError {
    /// body is not valid json, or a field has an invalid encoding
    #[error("{0}")]
    MalformedRequest(String),

    /// body is valid json but a field has the wrong type
    #[error("{0}")]
    TypeMismatch(&'static str),

    /// the key manager failed to encrypt or decrypt
    #[error("key manager failure: {0}")]
    UpstreamCrypto(#[from] kms_core::error::Error),

    /// decrypted payload could not be transcoded to a JWK
    #[error("{0}")]
    KeyFormat(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest(_) | ApiError::TypeMismatch(_) => StatusCode::BAD_REQUEST,
            ApiError::UpstreamCrypto(_) | ApiError::KeyFormat(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Renders the error as `{"error": <message>, "status": <code>}`
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        json_response(status, &body)
    }
}

/// Serializes `body` into a json response with the given status
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let (status, bytes) = match serde_json::to_vec(body) {
        Ok(v) => (status, Bytes::from(v)),
        // only reachable for types with a fallible Serialize impl
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Bytes::from_static(br#"{"error":"response serialization failed","status":500}"#),
        ),
    };
    let mut resp = Response::new(Full::new(bytes));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    resp
}
