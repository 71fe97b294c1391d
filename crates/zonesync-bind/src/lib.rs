//! BIND-facing core of zonesync: the authoritative zone registry, the
//! side-effect hooks that drive the daemon's control executable, and the
//! bootstrap parser for its new-zone file.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use zonesync_bind::{BindPaths, RndcHook, ZoneRegistry};
//! use zonesync_core::{Master, Zone};
//!
//! let registry = ZoneRegistry::new(
//!     BindPaths::new("/usr/sbin/rndc", "/var/cache/bind"),
//!     Arc::new(RndcHook),
//! );
//!
//! registry
//!     .add_zone(&Master::from("192.0.2.1"), &Zone::from("example.org"))
//!     .await?;
//! ```

pub mod dump;
pub mod hooks;
pub mod registry;

pub use hooks::{zone_snippet, BindPaths, LogOnlyHook, NullHook, RndcHook, ZoneHook};
pub use registry::ZoneRegistry;
