//! External capabilities consumed by the core.
//!
//! The hosting editor supplies implementations backed by its real package
//! manager; the core only ever talks to these narrow async seams, so it
//! stays independent of the transport and of the manager's on-disk formats.

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::catalog::CatalogEntry;
use crate::error::Error;

/// Where an installed package is recorded in the project manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyType {
    Production,
    Development,
}

/// Outcome of a successful install.
#[derive(Debug, Clone)]
pub struct InstallResult {
    /// Name of the installed package.
    pub package: String,

    /// Directory the package landed in, when the backend reports one.
    pub installation_dir: Option<PathBuf>,
}

/// Read access to the package catalog.
///
/// Neither call enforces a timeout; a fetch that never resolves stalls the
/// catalog slot until the host tears the session down.
#[async_trait]
pub trait PackageSource: Send + Sync {
    /// Fast local listing maintained by the package manager. May be empty.
    /// Used to serve provisional results while [`search`](Self::search) is
    /// still in flight.
    async fn list_cache(&self) -> Result<Vec<CatalogEntry>>;

    /// Authoritative remote catalog fetch.
    async fn search(&self) -> Result<Vec<CatalogEntry>>;
}

/// Installs a single package into the project.
#[async_trait]
pub trait Installer: Send + Sync {
    /// Install `package` into `target_dir` (the current project when `None`).
    ///
    /// Runs to completion once started; the queue never cancels an install.
    async fn install(
        &self,
        package: &str,
        target_dir: Option<&Path>,
        dependency_type: DependencyType,
        save: bool,
    ) -> Result<InstallResult>;
}

/// Decode a raw JSON payload into catalog entries.
///
/// Backends that receive loosely-typed responses can funnel them through
/// here; anything that does not fit the entry shape becomes
/// [`Error::MalformedResult`] instead of a crash further in.
pub fn parse_entries(payload: serde_json::Value) -> std::result::Result<Vec<CatalogEntry>, Error> {
    serde_json::from_value(payload).map_err(|err| Error::MalformedResult(err.to_string()))
}
