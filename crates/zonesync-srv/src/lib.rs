//! # zonesync-srv
//!
//! The zonesyncd daemon: an authenticated HTTP control plane that lets
//! delegating masters manage their slave zones on the local BIND server.
//!
//! Startup wiring lives here; the registry, the hooks and the bootstrap
//! parser come from [`zonesync_bind`].

pub mod api;
pub mod args;
pub mod config;
pub mod server;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Parse flags, load configuration and run the daemon.
pub async fn run() -> Result<()> {
    let args = args::Args::parse();

    registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = config::Config::load(&args.config)?;
    config.apply_overrides(&args);

    if args.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    server::run(config).await
}
