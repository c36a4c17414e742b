mod assets;
mod config;
mod error;
mod server;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::assets::{ClientAssets, COMPONENT_MODULE};
use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("isomorph_server=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();
    let props = config.load_props()?;

    // Bundle once up front; a missing module means the page could never
    // hydrate, so refuse to start.
    let assets = ClientAssets::load(&config).context("failed to bundle client modules")?;
    match &config.assets_dir {
        Some(dir) => info!("[bundle] {} from {}", COMPONENT_MODULE, dir.display()),
        None => info!("[bundle] {} from built-in assets", COMPONENT_MODULE),
    }
    info!(
        bundle_bytes = assets.bundle.len(),
        runtime_bytes = assets.runtime.len(),
        "[bundle] ready"
    );

    let state = Arc::new(server::AppState {
        props,
        embed_mode: config.embed_mode,
        assets,
    });

    let app = server::router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("[isomorph-server] http://localhost:{}", config.port);
    info!("[isomorph-server] isomorph-server v{}", env!("CARGO_PKG_VERSION"));
    info!("[isomorph-server] props embedding: {}", config.embed_mode);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
