//! Side-effect hooks: the strategies that apply a zone change to the BIND
//! daemon and its on-disk artifacts.
//!
//! The registry invokes exactly one hook per mutation while holding its
//! write lock, so a hook never runs concurrently with another change.
//! [`RndcHook`] drives the real daemon through its control executable;
//! [`NullHook`] and [`LogOnlyHook`] cover disabled-sync deployments and dry
//! runs; a crate-private loading hook is reserved for the bootstrap loader.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};
use zonesync_core::{Master, Result, Zone, ZoneSyncError};

/// Static paths handed to every hook invocation.
#[derive(Debug, Clone)]
pub struct BindPaths {
    /// The `rndc` control executable.
    pub rndc: PathBuf,
    /// BIND's data directory; slave zone databases live under `slave/`.
    pub data_dir: PathBuf,
}

impl BindPaths {
    /// Create paths from the rndc executable and BIND data directory.
    pub fn new(rndc: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            rndc: rndc.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Filesystem location of the slave database for `zone`.
    #[must_use]
    pub fn zone_db(&self, zone: &Zone) -> PathBuf {
        self.data_dir.join("slave").join(format!("{zone}.db"))
    }
}

/// Configuration snippet handed to `rndc addzone`.
///
/// This is the exact shape the daemon expects for a slave zone with a
/// single master, and the shape it writes back into its new-zone file.
#[must_use]
pub fn zone_snippet(zone: &Zone, master: &Master) -> String {
    format!(r#"{{type slave; file "slave/{zone}.db"; masters {{ {master}; }};}};"#)
}

/// Strategy applied when a zone assignment changes.
///
/// Implementations must be all-or-nothing from the registry's point of
/// view: either the change reached the daemon and `Ok(())` comes back, or
/// nothing observable happened and an error does.
#[async_trait]
pub trait ZoneHook: Send + Sync {
    /// Apply a new (master, zone) assignment.
    async fn zone_added(&self, paths: &BindPaths, master: &Master, zone: &Zone) -> Result<()>;

    /// Revert an existing (master, zone) assignment.
    async fn zone_removed(&self, paths: &BindPaths, master: &Master, zone: &Zone) -> Result<()>;
}

/// Production hook: drives the daemon through `rndc addzone`/`delzone`.
#[derive(Debug, Default)]
pub struct RndcHook;

#[async_trait]
impl ZoneHook for RndcHook {
    async fn zone_added(&self, paths: &BindPaths, master: &Master, zone: &Zone) -> Result<()> {
        let snippet = zone_snippet(zone, master);
        run_rndc(&paths.rndc, &["addzone", zone.as_str(), &snippet]).await
    }

    async fn zone_removed(&self, paths: &BindPaths, _master: &Master, zone: &Zone) -> Result<()> {
        run_rndc(&paths.rndc, &["delzone", zone.as_str()]).await?;

        // The daemon has forgotten the zone; drop its database file too.
        // A database that was never written is fine, anything else is not.
        let db = paths.zone_db(zone);
        match tokio::fs::remove_file(&db).await {
            Ok(()) => {
                debug!(path = %db.display(), "removed slave zone database");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ZoneSyncError::HookFailed(format!(
                "removing {}: {e}",
                db.display()
            ))),
        }
    }
}

/// Run the control executable, log the exchange, and fold any failure
/// into [`ZoneSyncError::HookFailed`].
async fn run_rndc(rndc: &Path, args: &[&str]) -> Result<()> {
    let output = Command::new(rndc)
        .args(args)
        .output()
        .await
        .map_err(|e| ZoneSyncError::HookFailed(format!("{}: {e}", rndc.display())))?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    let combined = combined.trim();

    info!(
        command = %format!("{} {}", rndc.display(), args.join(" ")),
        output = %combined,
        "rndc invoked"
    );

    if output.status.success() {
        Ok(())
    } else {
        Err(ZoneSyncError::HookFailed(format!(
            "{} {} exited with {}: {combined}",
            rndc.display(),
            args.join(" "),
            output.status
        )))
    }
}

/// Hook that applies nothing and always succeeds.
///
/// Installed when daemon sync is switched off, so zonesync only tracks
/// assignments in memory.
#[derive(Debug, Default)]
pub struct NullHook;

#[async_trait]
impl ZoneHook for NullHook {
    async fn zone_added(&self, _paths: &BindPaths, _master: &Master, _zone: &Zone) -> Result<()> {
        Ok(())
    }

    async fn zone_removed(&self, _paths: &BindPaths, _master: &Master, _zone: &Zone) -> Result<()> {
        Ok(())
    }
}

/// Dry-run hook: records the command that would have run, applies nothing.
#[derive(Debug, Default)]
pub struct LogOnlyHook;

#[async_trait]
impl ZoneHook for LogOnlyHook {
    async fn zone_added(&self, paths: &BindPaths, master: &Master, zone: &Zone) -> Result<()> {
        info!(
            command = %format!(
                "{} addzone {zone} '{}'",
                paths.rndc.display(),
                zone_snippet(zone, master)
            ),
            "skipped execution"
        );
        Ok(())
    }

    async fn zone_removed(&self, paths: &BindPaths, _master: &Master, zone: &Zone) -> Result<()> {
        info!(
            command = %format!("{} delzone {zone}", paths.rndc.display()),
            "skipped execution"
        );
        Ok(())
    }
}

/// Bootstrap-only hook: the daemon already serves the zones being loaded,
/// so restoring a pair is purely an in-memory event worth one log line.
///
/// Only the loader in [`crate::registry`] can reach this type.
#[derive(Debug, Default)]
pub(crate) struct LoadingHook;

#[async_trait]
impl ZoneHook for LoadingHook {
    async fn zone_added(&self, _paths: &BindPaths, master: &Master, zone: &Zone) -> Result<()> {
        info!(zone = %zone, master = %master, "restored zone from dump");
        Ok(())
    }

    async fn zone_removed(&self, _paths: &BindPaths, _master: &Master, _zone: &Zone) -> Result<()> {
        // The loader never removes zones.
        Ok(())
    }
}
