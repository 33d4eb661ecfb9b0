//! netinv daemon
//!
//! Serves a snapshot of the host's network interfaces over HTTP

use std::sync::Arc;

use color_eyre::Result;
use netinv_exec::LocalExecutor;
use netinv_inventory::{CommandAttributeSource, InventoryService, SystemEnumerator};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod router;
mod state;

use config::Config;
use state::AppState;

/// Log to stdout, as JSON when `LOG_FORMAT=json`
///
/// `RUST_LOG` overrides the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_inventory(config: &Config) -> InventoryService {
    let source = CommandAttributeSource::new(Arc::new(LocalExecutor::new()))
        .with_timeout(config.probe_timeout())
        .with_ip_command(config.probe.ip_command.clone())
        .with_ethtool_command(config.probe.ethtool_command.clone());

    InventoryService::new(Arc::new(SystemEnumerator::new()), Arc::new(source))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load_default()?.apply_env()?;
    init_tracing(&config.server.log_level);

    match &config.source {
        Some(path) => info!(path = %path.display(), "loaded configuration"),
        None => info!("no configuration file found, using defaults"),
    }

    let state = AppState::new(Arc::new(build_inventory(&config)));
    let app = router::create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()?).await?;
    info!(addr = %listener.local_addr()?, "netinv listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("netinv stopped");
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(err) => {
            warn!(error = ?err, "failed to install SIGTERM handler");
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = ?err, "failed to wait for ctrl-c");
            }
            return;
        }
    };

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            if let Err(err) = res {
                warn!(error = ?err, "failed to wait for ctrl-c");
            }
            info!(signal = "ctrl_c", "shutting down");
        }
        _ = sigterm.recv() => info!(signal = "sigterm", "shutting down"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = ?err, "failed to wait for ctrl-c");
    }
    info!(signal = "ctrl_c", "shutting down");
}
