mod api;
mod config;
mod state;
mod ui;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Arc::new(AppConfig::load()?);
    if config.config_path.exists() {
        info!("loaded config from {}", config.config_path.display());
    }

    let state = Arc::new(AppState::new(config.clone()));
    info!("build {}", state.build.label());
    info!(
        "widget posts uploads to {} and URLs to {}",
        config.upload_endpoint, config.register_endpoint
    );

    let assets_dir = config.assets_dir();
    let app = if assets_dir.exists() {
        info!("serving widget assets from {}", assets_dir.display());
        api::router(state).nest_service(ui::ASSETS_PREFIX, ServeDir::new(assets_dir))
    } else {
        warn!(
            "widget bundle missing at {}; run `trunk build` in frontend/",
            assets_dir.display()
        );
        api::router(state)
    };
    let app = app.layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_addr))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("vidshare listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received");
}
