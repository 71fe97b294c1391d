//! Daemon startup: hook selection, bootstrap load, HTTP serving.

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use zonesync_bind::{LogOnlyHook, NullHook, RndcHook, ZoneHook, ZoneRegistry};

use crate::api::{self, AppState};
use crate::config::{Config, SyncMode};

/// Instantiate the live hook selected by the configuration.
fn live_hook(mode: SyncMode) -> Arc<dyn ZoneHook> {
    match mode {
        SyncMode::Rndc => Arc::new(RndcHook),
        SyncMode::LogOnly => Arc::new(LogOnlyHook),
        SyncMode::Off => Arc::new(NullHook),
    }
}

/// Run the daemon until shutdown.
///
/// Bootstraps the registry from the daemon's new-zone file before
/// accepting requests. A missing or malformed file is fatal: the process
/// must not serve a zone universe it does not fully understand.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let registry = Arc::new(ZoneRegistry::new(
        config.bind_paths(),
        live_hook(config.sync),
    ));

    let zone_file = config.zone_file_path();
    info!(path = %zone_file.display(), "loading zones");
    let contents = tokio::fs::read_to_string(&zone_file)
        .await
        .with_context(|| format!("reading the new-zone file {}", zone_file.display()))?;
    let restored = registry
        .load_dump(&contents)
        .await
        .context("parsing the new-zone file")?;
    info!(zones = restored, "done loading zones");

    if config.clients.is_empty() {
        warn!("no clients configured, every request will be rejected");
    }

    let listen = config.listen;
    let state = AppState {
        registry,
        config: Arc::new(config),
    };
    let app = api::router(state);

    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("binding {listen}"))?;
    info!(addr = %listen, "zonesyncd listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("http server")?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .unwrap_or_else(|e| error!(error = %e, "failed to listen for ctrl-c"));
    info!("shutdown signal received");
}
