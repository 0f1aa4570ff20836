//! Fuzzy search adapter over the catalog cache.
//!
//! Implements the editor-facing search surface: a `+`-prefixed query from
//! the shared search box is routed here, matched fuzzily against the
//! current catalog snapshot, and ranked best-first. Because the catalog
//! loads asynchronously, results for a query that has been superseded by
//! newer input are discarded rather than delivered late.

use std::sync::Mutex;

use tracing::debug;

use crate::catalog::{CatalogCache, CatalogEntry, CatalogSnapshot};
use crate::config::Preferences;
use crate::error::{Error, Result};
use crate::queue::InstallQueue;

/// Leading character that routes a shared-search-box query to this feature.
pub const SEARCH_SIGIL: char = '+';

/// Scores a candidate name against a query.
///
/// `None` excludes the candidate; higher scores rank earlier. An empty
/// query must match everything at minimal score rather than panic; hosts
/// call this with whatever is left after the sigil is stripped.
pub trait Matcher: Send + Sync {
    fn score(&self, candidate: &str, query: &str) -> Option<i64>;
}

/// Default matcher: prefix beats substring beats in-order subsequence,
/// with penalties for longer candidates, later positions, and gaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyMatcher;

impl Matcher for FuzzyMatcher {
    fn score(&self, candidate: &str, query: &str) -> Option<i64> {
        let query = query.trim();
        if query.is_empty() {
            return Some(0);
        }

        let cand = candidate.to_lowercase();
        let query = query.to_lowercase();

        if cand.starts_with(&query) {
            // Shorter candidates win among prefix matches.
            return Some(1_000 - (cand.len() as i64 - query.len() as i64));
        }

        if let Some(idx) = cand.find(&query) {
            return Some(700 - idx as i64);
        }

        // In-order subsequence with a gap penalty.
        let mut score = 500i64;
        let mut from = 0usize;
        for ch in query.chars() {
            let pos = cand[from..].find(ch)?;
            score -= pos as i64;
            from += pos + ch.len_utf8();
        }
        Some(score - cand.len() as i64 / 10)
    }
}

/// A ranked search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub entry: CatalogEntry,
    pub score: i64,
}

/// Editor-facing search adapter.
///
/// One instance per session; it tracks the most recently issued query so
/// that a catalog fetch resolving late can tell whether its originating
/// query is still the one the user cares about.
pub struct CatalogSearch {
    cache: CatalogCache,
    queue: InstallQueue,
    prefs: Preferences,
    latest_query: Mutex<Option<String>>,
}

impl CatalogSearch {
    pub fn new(cache: CatalogCache, queue: InstallQueue, prefs: Preferences) -> Self {
        Self {
            cache,
            queue,
            prefs,
            latest_query: Mutex::new(None),
        }
    }

    /// Host-side predicate: only sigil-prefixed queries are routed here.
    pub fn matches(query: &str) -> bool {
        query.starts_with(SEARCH_SIGIL)
    }

    /// Rank catalog entries against `query`.
    ///
    /// Resolves once a snapshot (provisional or final) is available. If a
    /// newer query was issued while the catalog was loading, the result is
    /// discarded with [`Error::Superseded`]: only the most recent query's
    /// results are ever surfaced. A failed catalog fetch surfaces as
    /// [`Error::Fetch`].
    pub async fn search(&self, query: &str, matcher: &dyn Matcher) -> Result<Vec<SearchHit>> {
        let needle = query
            .strip_prefix(SEARCH_SIGIL)
            .unwrap_or(query)
            .to_string();
        *self.latest_query.lock().unwrap() = Some(needle.clone());

        let snapshot = self.cache.catalog(self.prefs.max_age()).await?;

        // The catalog may have loaded long after this query was typed;
        // re-check the token now that we have resumed.
        if self.latest_query.lock().unwrap().as_deref() != Some(needle.as_str()) {
            debug!(query = %needle, "discarding superseded search");
            return Err(Error::Superseded);
        }

        Ok(rank(&snapshot, &needle, matcher))
    }

    /// The user picked a result: queue its package for installation.
    pub fn item_select(&self, hit: &SearchHit) {
        self.queue.enqueue(hit.entry.name.clone());
    }
}

/// Score every entry, dropping non-matches, and sort best-first.
///
/// The snapshot is already name-sorted case-insensitively and the sort
/// here is stable, so equal scores fall back to alphabetical order.
fn rank(snapshot: &CatalogSnapshot, query: &str, matcher: &dyn Matcher) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = snapshot
        .entries()
        .iter()
        .filter_map(|entry| {
            matcher.score(&entry.name, query).map(|score| SearchHit {
                entry: entry.clone(),
                score,
            })
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits
}
