//! Command-line argument definitions using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::config::SyncMode;

/// BIND slave-zone provisioning daemon
///
/// Tracks which zones are delegated from which masters and keeps the local
/// BIND daemon in sync through rndc. Flags given here override the values
/// from the configuration file.
#[derive(Parser, Debug)]
#[command(name = "zonesyncd")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file to use
    #[arg(
        short,
        long,
        env = "ZONESYNC_CONFIG",
        default_value = "/etc/zonesync/zonesync.toml"
    )]
    pub config: PathBuf,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub dump_config: bool,

    /// HTTP listen address, e.g. 0.0.0.0:54515
    #[arg(short, long)]
    pub listen: Option<SocketAddr>,

    /// BIND's new-zone file, resolved inside the data directory
    #[arg(long)]
    pub zone_file: Option<String>,

    /// Path to the rndc executable
    #[arg(long)]
    pub rndc: Option<PathBuf>,

    /// BIND's data directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// How zone changes are applied to the daemon
    #[arg(long, value_enum)]
    pub sync: Option<SyncMode>,
}
