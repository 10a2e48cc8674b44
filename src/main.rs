use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ebook_sync::config::Config;
use ebook_sync::dispatch::Dispatcher;
use ebook_sync::server::{AppState, build_router};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ebook_sync=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse().validate().context("invalid configuration")?;

    info!(
        repo_root = %config.repo_root,
        remote = %config.remote,
        sync_user = ?config.sync_user,
        log_file = %config.log_file.display(),
        "Starting ebook-sync"
    );

    let dispatcher = Dispatcher::new(config.dispatch_settings(), Arc::new(config.git_cli()));
    let app = build_router(AppState::new(dispatcher));

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!("listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
