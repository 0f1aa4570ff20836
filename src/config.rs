//! User preferences consumed by the core.
//!
//! The hosting editor owns preference persistence and editing UI; this is
//! the already-resolved, synchronous view the core reads from.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default catalog reload interval, in minutes.
pub const DEFAULT_RELOAD_MINUTES: u64 = 10;

/// Settings that change the core's behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Record installed packages in the project manifest.
    pub save_to_manifest: bool,

    /// Minutes before the cached catalog is considered stale.
    pub reload_catalog_minutes: u64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            save_to_manifest: true,
            reload_catalog_minutes: DEFAULT_RELOAD_MINUTES,
        }
    }
}

impl Preferences {
    /// Maximum catalog age before a refresh is forced.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.reload_catalog_minutes * 60)
    }
}
