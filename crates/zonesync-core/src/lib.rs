//! Core types for the zonesync crates.
//!
//! This crate provides the vocabulary shared by the registry, the hooks and
//! the daemon:
//!
//! - **Identifiers**: [`Zone`] and [`Master`], opaque newtypes over the names
//!   callers and the BIND dump supply
//! - **Errors**: every way a zone operation can fail, as [`ZoneSyncError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use zonesync_core::{Master, Result, Zone, ZoneSyncError};
//!
//! fn check_owner(zone: &Zone, owner: &Master, caller: &Master) -> Result<()> {
//!     if owner != caller {
//!         return Err(ZoneSyncError::ZoneNotOwned {
//!             zone: zone.clone(),
//!             master: caller.clone(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

mod error;
pub mod types;

pub use error::{Result, ZoneSyncError};
pub use types::*;
