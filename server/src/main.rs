//! kms - HTTP encrypt/decrypt service

use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kms_server::{
    config::{build_manager, Args},
    server::{self, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "kms={0},kms_server={0},kms_core={0},kms_hashivault={0},info",
                    log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Listen: {}", args.listen);

    // the manager uri may carry a token; never log it
    let manager = build_manager(&args.manager)?;
    info!("Key manager: {}", manager.get_scheme());

    let state = Arc::new(AppState::new(manager));
    server::run(args.listen, state).await?;
    Ok(())
}
