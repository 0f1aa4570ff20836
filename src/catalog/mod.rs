//! Package catalog: entry model, immutable snapshots, and the TTL cache.
//!
//! # Overview
//!
//! The catalog is the full list of installable packages known to the
//! external package source. The core keeps one in-memory snapshot of it:
//!
//! ```text
//! PackageSource (external)
//!     │
//!     ├── list_cache()  ← fast local listing, may be empty
//!     └── search()      ← authoritative remote fetch
//!            │
//!            ▼
//!     CatalogCache      ← TTL invalidation, single-flight refresh
//!            │
//!            ▼
//!     CatalogSnapshot   ← immutable, name-sorted, shared via Arc
//! ```
//!
//! Snapshots are replaced wholesale on refresh and never mutated, so every
//! reader holds a consistent view no matter how refreshes interleave.

mod cache;
mod snapshot;

pub use cache::CatalogCache;
pub use snapshot::{CatalogEntry, CatalogSnapshot};
