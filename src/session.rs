//! Session facade wiring the catalog, search, and install components.
//!
//! One [`QuickInstall`] is created per active project and owns all mutable
//! state for the feature. There are no process-wide globals, so independent
//! sessions cannot interfere with each other.

use std::sync::Arc;

use crate::catalog::CatalogCache;
use crate::config::Preferences;
use crate::queue::InstallQueue;
use crate::search::{CatalogSearch, SEARCH_SIGIL};
use crate::source::{Installer, PackageSource};
use crate::status::StatusReporter;

/// What the host registers with its shared search surface.
#[derive(Debug, Clone, Copy)]
pub struct PluginDescriptor {
    pub name: &'static str,
    pub label: &'static str,
}

/// One quick-install session for an active project.
pub struct QuickInstall {
    cache: CatalogCache,
    queue: InstallQueue,
    search: CatalogSearch,
}

impl QuickInstall {
    pub fn new(
        source: Arc<dyn PackageSource>,
        installer: Arc<dyn Installer>,
        reporter: Arc<dyn StatusReporter>,
        prefs: Preferences,
    ) -> Self {
        let cache = CatalogCache::new(source, Arc::clone(&reporter));
        let queue = InstallQueue::new(installer, reporter, prefs.clone());
        let search = CatalogSearch::new(cache.clone(), queue.clone(), prefs);

        Self {
            cache,
            queue,
            search,
        }
    }

    /// Descriptor for registering with the host's search surface, alongside
    /// [`CatalogSearch::matches`], [`CatalogSearch::search`], and
    /// [`CatalogSearch::item_select`].
    pub fn descriptor(&self) -> PluginDescriptor {
        PluginDescriptor {
            name: "install-from-catalog",
            label: "Install from catalog",
        }
    }

    /// Query text the host preloads into its search box so input is routed
    /// to this feature.
    pub fn seed_query(&self) -> String {
        SEARCH_SIGIL.to_string()
    }

    pub fn search(&self) -> &CatalogSearch {
        &self.search
    }

    pub fn queue(&self) -> &InstallQueue {
        &self.queue
    }

    pub fn catalog_cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// Queue a package for installation directly, bypassing search.
    pub fn enqueue(&self, package: impl Into<String>) {
        self.queue.enqueue(package);
    }
}
