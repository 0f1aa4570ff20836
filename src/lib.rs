//! In-editor package quick-install core.
//!
//! Lets a user search a remote package catalog from the editor's shared
//! search box and install selected packages into the project without
//! blocking the editor.
//!
//! # Architecture
//!
//! ```text
//! shared search box ──match("+…")──▶ CatalogSearch ──▶ CatalogCache ──▶ PackageSource
//!        │                                │                (TTL + single-flight)
//!        │                                │ item_select
//!        ▼                                ▼
//!   StatusReporter ◀───────────── InstallQueue ─────────▶ Installer
//!                                 (FIFO, one at a time)
//! ```
//!
//! All coordination is cooperative: shared state is only touched between
//! await points, installs are strictly serialized, concurrent catalog
//! refreshes collapse into one shared fetch, and search results that were
//! superseded by newer input are discarded instead of delivered late.
//!
//! The host supplies the externals (a [`PackageSource`], an [`Installer`],
//! and a [`StatusReporter`]) and wires one [`QuickInstall`] session per
//! active project into its search surface via [`CatalogSearch::matches`],
//! [`CatalogSearch::search`], and [`CatalogSearch::item_select`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod queue;
pub mod search;
pub mod session;
pub mod source;
pub mod status;

pub use catalog::{CatalogCache, CatalogEntry, CatalogSnapshot};
pub use config::Preferences;
pub use error::{Error, Result};
pub use queue::InstallQueue;
pub use search::{CatalogSearch, FuzzyMatcher, Matcher, SearchHit, SEARCH_SIGIL};
pub use session::{PluginDescriptor, QuickInstall};
pub use source::{DependencyType, InstallResult, Installer, PackageSource};
pub use status::{NullReporter, StatusId, StatusReporter, TracingReporter};
