//! Daemon configuration, loaded from TOML with flag overrides on top.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use zonesync_bind::BindPaths;

use crate::args::Args;

/// Which hook variant drives the BIND daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// Apply changes through the rndc control executable.
    Rndc,
    /// Log the rndc commands that would run, change nothing.
    LogOnly,
    /// Track assignments in memory only; never touch the daemon.
    Off,
}

/// One API client allowed to manage its delegations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientAuth {
    /// HTTP Basic username.
    pub username: String,
    /// HTTP Basic password, in the clear; protect the config file.
    pub password: String,
}

/// Configuration for the zonesyncd daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listen address (default: 0.0.0.0:54515).
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// BIND's new-zone file name, resolved inside `data_dir`.
    #[serde(default = "default_zone_file")]
    pub zone_file: String,

    /// Path to the rndc control executable.
    #[serde(default = "default_rndc")]
    pub rndc: PathBuf,

    /// BIND's data directory; slave databases live under `slave/`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Hook variant installed for live operation.
    #[serde(default = "default_sync")]
    pub sync: SyncMode,

    /// API clients; every request must authenticate as one of these.
    #[serde(default, rename = "client")]
    pub clients: Vec<ClientAuth>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            zone_file: default_zone_file(),
            rndc: default_rndc(),
            data_dir: default_data_dir(),
            sync: default_sync(),
            clients: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing file is an error rather than a silent default: the default
    /// client list is empty, and a control plane nobody can talk to is a
    /// misdeployment worth failing on.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Render the effective configuration as TOML, for `--dump-config`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Overlay command-line flags on top of the file values.
    pub fn apply_overrides(&mut self, args: &Args) {
        if let Some(listen) = args.listen {
            self.listen = listen;
        }
        if let Some(zone_file) = &args.zone_file {
            self.zone_file.clone_from(zone_file);
        }
        if let Some(rndc) = &args.rndc {
            self.rndc.clone_from(rndc);
        }
        if let Some(data_dir) = &args.data_dir {
            self.data_dir.clone_from(data_dir);
        }
        if let Some(sync) = args.sync {
            self.sync = sync;
        }
    }

    /// Static paths handed to side-effect hooks.
    #[must_use]
    pub fn bind_paths(&self) -> BindPaths {
        BindPaths::new(&self.rndc, &self.data_dir)
    }

    /// Filesystem location of the new-zone file.
    #[must_use]
    pub fn zone_file_path(&self) -> PathBuf {
        self.data_dir.join(&self.zone_file)
    }
}

// Default value functions for serde.
fn default_listen() -> SocketAddr {
    "0.0.0.0:54515".parse().expect("valid default addr")
}

fn default_zone_file() -> String {
    String::from("_default.nzf")
}

fn default_rndc() -> PathBuf {
    PathBuf::from("/usr/sbin/rndc")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("/var/cache/bind")
}

const fn default_sync() -> SyncMode {
    SyncMode::Rndc
}
