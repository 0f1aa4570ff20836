//! Error types for the quick-install core.
//!
//! Failures are recovered at the component boundary that produced them:
//! install failures are aggregated by the queue, fetch failures fan out to
//! every waiter attached to the in-flight fetch, and malformed external
//! payloads are converted here instead of surfacing as panics.

use thiserror::Error;

/// Errors surfaced by the catalog cache, search adapter, and install queue.
///
/// Every payload is cheap to clone: the single-flight catalog fetch resolves
/// once and hands its outcome, success or failure, to all attached waiters.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The authoritative catalog fetch failed. Any provisional snapshot
    /// stays in place for the next staleness check.
    #[error("catalog fetch failed: {0}")]
    Fetch(String),

    /// A single package failed to install. Local to that task; the queue
    /// reports it in the aggregated drain-time status.
    #[error("error installing '{package}': {reason}")]
    Install { package: String, reason: String },

    /// An external call returned a payload the core could not understand.
    #[error("malformed result from package source: {0}")]
    MalformedResult(String),

    /// The search result was discarded because a newer query replaced it
    /// before the catalog became available.
    #[error("search superseded by a newer query")]
    Superseded,
}

pub type Result<T> = std::result::Result<T, Error>;
