//! The authoritative zone registry.
//!
//! Two mirrored structures live behind a single readers-writer lock:
//! `owners` (zone to master) and `by_master` (master to zone set). A zone
//! appears in `by_master[m]` exactly when `owners[zone] == m`, a master key
//! exists only while its set is non-empty, and a zone never has two owners.
//! Mutations hold the write lock across the side-effect hook, so the
//! daemon is never asked to apply two changes at once.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;
use zonesync_core::{Master, Result, Zone, ZoneMap, ZoneSet, ZoneSyncError};

use crate::dump;
use crate::hooks::{BindPaths, LoadingHook, ZoneHook};

/// In-memory mapping of slave zones to the masters they are delegated
/// from, kept in lockstep with the local daemon through a hook.
pub struct ZoneRegistry {
    paths: BindPaths,
    hook: Arc<dyn ZoneHook>,
    state: RwLock<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    owners: ZoneMap,
    by_master: HashMap<Master, ZoneSet>,
}

impl ZoneRegistry {
    /// Create an empty registry with the given live hook.
    ///
    /// The hook is fixed for the registry's lifetime; pick it when the
    /// daemon starts, not per request.
    pub fn new(paths: BindPaths, hook: Arc<dyn ZoneHook>) -> Self {
        Self {
            paths,
            hook,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Assign `zone` to `master`, applying the change through the live
    /// hook.
    ///
    /// All-or-nothing: if the zone is already assigned or the hook fails,
    /// the registry is left exactly as it was.
    pub async fn add_zone(&self, master: &Master, zone: &Zone) -> Result<()> {
        self.add_zone_with(self.hook.as_ref(), master, zone).await
    }

    /// Shared add path; the bootstrap loader passes its own hook here.
    async fn add_zone_with(
        &self,
        hook: &dyn ZoneHook,
        master: &Master,
        zone: &Zone,
    ) -> Result<()> {
        let mut state = self.state.write().await;

        if let Some(owner) = state.owners.get(zone) {
            return Err(ZoneSyncError::DuplicateZone {
                zone: zone.clone(),
                master: owner.clone(),
            });
        }

        // Hook first: a change the daemon refused must leave no trace here.
        hook.zone_added(&self.paths, master, zone).await?;

        state.owners.insert(zone.clone(), master.clone());
        state
            .by_master
            .entry(master.clone())
            .or_default()
            .insert(zone.clone());
        Ok(())
    }

    /// Drop the assignment of `zone` to `master`.
    ///
    /// Mirrors [`Self::add_zone`]: the hook runs before the maps change, so
    /// a refused removal leaves both the registry and the daemon untouched.
    pub async fn remove_zone(&self, master: &Master, zone: &Zone) -> Result<()> {
        let mut state = self.state.write().await;

        if !state.owners.contains_key(zone) {
            return Err(ZoneSyncError::ZoneNotFound(zone.clone()));
        }
        let Some(owned) = state.by_master.get(master) else {
            return Err(ZoneSyncError::MasterNotFound(master.clone()));
        };
        if !owned.contains(zone) {
            return Err(ZoneSyncError::ZoneNotOwned {
                zone: zone.clone(),
                master: master.clone(),
            });
        }

        self.hook.zone_removed(&self.paths, master, zone).await?;

        state.owners.remove(zone);
        if let Some(owned) = state.by_master.get_mut(master) {
            owned.remove(zone);
            if owned.is_empty() {
                state.by_master.remove(master);
            }
        }
        Ok(())
    }

    /// All masters that currently have at least one zone.
    pub async fn masters(&self) -> Vec<Master> {
        let state = self.state.read().await;
        state.by_master.keys().cloned().collect()
    }

    /// Snapshot of the zones delegated from `master`.
    ///
    /// An unknown master yields an empty set, not an error.
    pub async fn zones(&self, master: &Master) -> ZoneSet {
        let state = self.state.read().await;
        state.by_master.get(master).cloned().unwrap_or_default()
    }

    /// Snapshot of every zone and its owning master.
    pub async fn zone_map(&self) -> ZoneMap {
        let state = self.state.read().await;
        state.owners.clone()
    }

    /// Rebuild registry state from the daemon's new-zone file contents.
    ///
    /// The daemon already serves these zones, so restoration is logged but
    /// touches nothing outside this process. The first line that is neither
    /// ignorable nor a slave stanza aborts the load; callers treat that as
    /// fatal. Returns the number of zones restored.
    pub async fn load_dump(&self, contents: &str) -> Result<usize> {
        let mut restored = 0;
        for line in contents.lines() {
            let Some((master, zone)) = dump::parse_line(line)? else {
                continue;
            };
            match self.add_zone_with(&LoadingHook, &master, &zone).await {
                Ok(()) => restored += 1,
                // The daemon accepted this dump, so a duplicate stanza can
                // only repeat an assignment already restored above.
                Err(e) => warn!(zone = %zone, error = %e, "skipping dump stanza"),
            }
        }
        Ok(restored)
    }
}
