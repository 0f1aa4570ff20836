//! Catalog cache with time-based invalidation and single-flight refresh.
//!
//! The cache owns the last-fetched snapshot and its fetch timestamp. The
//! first caller to find the snapshot stale starts a refresh; callers that
//! arrive while that refresh is in flight attach to the same shared future
//! instead of starting a second fetch, and all of them observe the same
//! outcome.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::catalog::snapshot::CatalogSnapshot;
use crate::error::{Error, Result};
use crate::source::PackageSource;
use crate::status::StatusReporter;

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<CatalogSnapshot>>>>;

#[derive(Default)]
struct CacheState {
    snapshot: Option<Arc<CatalogSnapshot>>,

    /// When the last refresh *started*. Staleness is measured from fetch
    /// start, not completion, so a slow fetch does not extend the TTL.
    last_fetch: Option<Instant>,

    /// Set iff a refresh is in flight.
    pending: Option<SharedFetch>,
}

struct CacheInner {
    source: Arc<dyn PackageSource>,
    reporter: Arc<dyn StatusReporter>,
    state: Mutex<CacheState>,
}

/// In-memory package catalog with TTL invalidation and fetch deduplication.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct CatalogCache {
    inner: Arc<CacheInner>,
}

impl CatalogCache {
    pub fn new(source: Arc<dyn PackageSource>, reporter: Arc<dyn StatusReporter>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                source,
                reporter,
                state: Mutex::new(CacheState::default()),
            }),
        }
    }

    /// Current snapshot, refreshing first when it is older than `max_age`.
    ///
    /// A fresh snapshot (including a provisional one adopted while the
    /// authoritative fetch is still running) is returned immediately.
    /// Otherwise the call resolves once the in-flight (or newly started)
    /// refresh completes. State is never assumed unchanged across the
    /// await: everything is re-read under the lock when the fetch body
    /// runs.
    pub async fn catalog(&self, max_age: Duration) -> Result<Arc<CatalogSnapshot>> {
        let fetch = {
            let mut state = self.inner.state.lock().unwrap();

            let fresh = state.last_fetch.is_some_and(|t| t.elapsed() <= max_age);
            if fresh {
                if let Some(snapshot) = &state.snapshot {
                    return Ok(Arc::clone(snapshot));
                }
            } else {
                // A stale snapshot is discarded before deciding whether to
                // fetch; nothing serves it from here on.
                state.snapshot = None;
            }

            match &state.pending {
                Some(pending) => pending.clone(),
                None => {
                    state.last_fetch = Some(Instant::now());
                    let fetch = refresh(Arc::clone(&self.inner)).boxed().shared();
                    state.pending = Some(fetch.clone());
                    fetch
                }
            }
        };

        fetch.await
    }
}

/// Drive one refresh: fast local listing first, then the authoritative
/// remote fetch. Exactly one status transition (loading → ready/not loaded)
/// per refresh, shared by every attached waiter.
async fn refresh(inner: Arc<CacheInner>) -> Result<Arc<CatalogSnapshot>> {
    let status = inner.reporter.post("Loading package catalog…", true);

    // Best-effort fast path: adopt whatever the local cache already knows
    // so callers are not left empty-handed while the remote search runs.
    match inner.source.list_cache().await {
        Ok(entries) if !entries.is_empty() => {
            let provisional = Arc::new(CatalogSnapshot::from_entries(entries));
            debug!(count = provisional.len(), "adopted provisional catalog snapshot");
            inner.state.lock().unwrap().snapshot = Some(provisional);
        }
        Ok(_) => {}
        Err(err) => warn!("local catalog listing failed: {err:#}"),
    }

    let outcome = inner
        .source
        .search()
        .await
        .map_err(|err| Error::Fetch(format!("{err:#}")));

    let result = {
        let mut state = inner.state.lock().unwrap();
        // Cleared exactly once, success or failure, before any waiter's
        // continuation can run.
        state.pending = None;
        match outcome {
            Ok(entries) => {
                let snapshot = Arc::new(CatalogSnapshot::from_entries(entries));
                state.snapshot = Some(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            // The provisional snapshot, if one was adopted, stays in place
            // for the next staleness re-evaluation.
            Err(err) => Err(err),
        }
    };

    let message = match &result {
        Ok(snapshot) => {
            debug!(count = snapshot.len(), "package catalog refreshed");
            "Package catalog ready"
        }
        Err(err) => {
            warn!("package catalog refresh failed: {err}");
            "Package catalog not loaded"
        }
    };
    inner.reporter.update(status, message, false);
    inner.reporter.remove(status);

    result
}
