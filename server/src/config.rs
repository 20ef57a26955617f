//! Configuration for the kms service
//!
//! CLI arguments with environment variable fallbacks, and key manager selection.

use clap::Parser;
use kms_core::{
    error::{Error, Result},
    managers::{env, uri_scheme, EnvManager, KeyManager},
};
use std::net::SocketAddr;
use std::sync::Arc;

/// kms - encrypt and decrypt payloads with a managed master key
#[derive(Parser, Debug, Clone)]
#[command(name = "kms")]
#[command(about = "HTTP encrypt/decrypt service backed by a key manager")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "KMS_LISTEN", default_value = "127.0.0.1:8081")]
    pub listen: SocketAddr,

    /// Key manager uri, e.g. "env:", "env:MY_PASSPHRASE" or "hashivault://KEY"
    #[arg(long, env = "KMS_MANAGER_URI", default_value = "env:", hide_env_values = true)]
    pub manager: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "KMS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Builds the key manager for `uri`, chosen by the uri scheme
pub fn build_manager(uri: &str) -> Result<Arc<dyn KeyManager>, Error> {
    match uri_scheme(uri)? {
        env::SCHEME => Ok(Arc::new(EnvManager::from_uri(uri)?)),
        #[cfg(feature = "hashivault")]
        kms_hashivault::URL_SCHEME => Ok(Arc::new(kms_hashivault::HashivaultManager::from_uri(
            uri,
        )?)),
        _ => Err(Error::ManagerNotFound(uri.to_string())),
    }
}
