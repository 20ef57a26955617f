//! Hashicorp Vault key manager for kms.
//!
//! Every encrypt and decrypt is delegated to a key in Vault's transit engine,
//! so the master key is never held in process memory.
//! See [`HashivaultManager`] for the uri syntax.

mod manager;
pub mod vault_client;

pub use manager::HashivaultManager;
pub use vault_client::URL_SCHEME;
