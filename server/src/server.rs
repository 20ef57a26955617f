//! HTTP server: accept loop and routing
//!
//! Uses hyper http1 with TokioIo; each connection is served on its own task.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    body::Body, server::conn::http1, service::service_fn, Method, Request, Response, StatusCode,
};
use hyper_util::rt::TokioIo;
use kms_core::managers::KeyManager;
use std::{convert::Infallible, fmt::Display, net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    error::{json_response, ApiError},
    handlers,
};

/// Shared application state
#[derive(Debug)]
pub struct AppState {
    pub manager: Arc<dyn KeyManager>,
}

impl AppState {
    pub fn new(manager: Arc<dyn KeyManager>) -> Self {
        AppState { manager }
    }
}

/// Start the HTTP server. Runs until the listener fails to bind.
pub async fn run(listen: SocketAddr, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(listen).await?;
    info!(
        "kms listening on {} with '{}' key manager",
        listen,
        state.manager.get_scheme()
    );

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { Ok::<_, Infallible>(route(state, req).await) }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Dispatches a request to its handler and renders any error as json
pub async fn route<B>(state: Arc<AppState>, req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    info!("{} {}", method, path);

    let result = match (method, path.as_str()) {
        (Method::POST, "/decrypt") => handlers::handle_decrypt(&state, req).await,
        (Method::POST, "/encrypt") => handlers::handle_encrypt(&state, req).await,
        (Method::GET, "/healthz") => Ok(health_check()),
        (_, "/decrypt" | "/encrypt" | "/healthz") => Err(ApiError::MethodNotAllowed),
        (_, p) => Err(ApiError::NotFound(p.to_string())),
    };
    result.unwrap_or_else(ApiError::into_response)
}

fn health_check() -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &serde_json::json!({ "status": "ok" }))
}
