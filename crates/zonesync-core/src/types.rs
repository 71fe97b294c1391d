use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A DNS zone name served as a slave zone on the local daemon.
///
/// Zone names are opaque: whatever the caller or the BIND dump supplied is
/// kept byte for byte, with no case folding or trailing-dot handling. The
/// daemon receives the same spelling through `rndc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone(String);

impl Zone {
    /// Wrap a zone name without validating it.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The zone name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Zone {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&str> for Zone {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for Zone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The identity of a delegating master, as seen by the daemon.
///
/// In live operation this is the source IP address of the API connection,
/// but the registry treats it as an opaque name so tests and the bootstrap
/// loader can use whatever the dump recorded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Master(String);

impl Master {
    /// Wrap a master identity without validating it.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The master identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Master {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Master {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&str> for Master {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for Master {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ownership snapshot: every registered zone and the master it came from.
pub type ZoneMap = HashMap<Zone, Master>;

/// The set of zones delegated from a single master.
pub type ZoneSet = HashSet<Zone>;
