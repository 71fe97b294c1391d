use thiserror::Error;

use crate::types::{Master, Zone};

/// Result type alias for zonesync operations
pub type Result<T> = std::result::Result<T, ZoneSyncError>;

/// Errors that can occur when managing zone delegations
#[derive(Error, Debug)]
pub enum ZoneSyncError {
    /// The zone is already delegated; carries its current owner
    #[error(r#"zone "{zone}" is already assigned to "{master}""#)]
    DuplicateZone {
        /// The zone that was offered a second time
        zone: Zone,
        /// The master the zone currently belongs to
        master: Master,
    },

    /// The zone is not registered at all
    #[error(r#"zone "{0}" is not registered"#)]
    ZoneNotFound(Zone),

    /// The master has no zones delegated from it
    #[error(r#"no zones are delegated from master "{0}""#)]
    MasterNotFound(Master),

    /// The zone exists but belongs to a different master
    #[error(r#"zone "{zone}" is not delegated from master "{master}""#)]
    ZoneNotOwned {
        /// The zone whose removal was requested
        zone: Zone,
        /// The master that asked and does not own it
        master: Master,
    },

    /// A side-effect hook could not apply the change to the daemon
    #[error("hook execution failed: {0}")]
    HookFailed(String),

    /// A line in the new-zone dump matched neither the stanza grammar
    /// nor a comment or blank line
    #[error("invalid dump line {line:?}")]
    InvalidDumpLine {
        /// The offending line, verbatim
        line: String,
    },
}

impl ZoneSyncError {
    /// Returns true if the error means the request named something that
    /// does not exist (from the caller's point of view)
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ZoneNotFound(_) | Self::MasterNotFound(_) | Self::ZoneNotOwned { .. }
        )
    }
}
