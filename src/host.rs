//! Host interface seams.
//!
//! Every side effect the provisioner performs goes through one of these
//! traits. The production implementations in `system` shell out to the
//! host's own utilities; the test suites substitute recording doubles.
//!
//! # Contract
//!
//! - All operations are synchronous and blocking; callers await completion
//!   before issuing the next operation.
//! - Implementations own their timeout behavior (delegated to the
//!   underlying utility); the reconciliation logic imposes none.
//! - `&mut self` so doubles can record call logs without interior
//!   mutability.

use crate::catalog::SettingValue;
use crate::error::Result;
use std::path::Path;

/// Host package registry operations.
pub trait PackageManager {
    /// Refresh the package index. Failure here is the run's only fatal
    /// condition.
    fn refresh_index(&mut self) -> Result<()>;

    /// Whether the named package is currently registered as installed.
    fn is_installed(&mut self, name: &str) -> Result<bool>;

    /// Request installation of the named package.
    fn install(&mut self, name: &str) -> Result<()>;

    /// Remove packages no longer required as dependencies.
    fn autoremove(&mut self) -> Result<()>;

    /// Purge the package manager's local download cache.
    fn clean_cache(&mut self) -> Result<()>;
}

/// Synchronous file download; overwrites the destination.
pub trait Downloader {
    fn fetch(&mut self, url: &str, dest: &Path) -> Result<()>;
}

/// Archive extraction into an existing directory.
pub trait ArchiveExtractor {
    fn extract(&mut self, archive: &Path, dest: &Path) -> Result<()>;
}

/// The desktop shell's extension-enable registry.
pub trait ExtensionRegistry {
    fn enable(&mut self, uuid: &str) -> Result<()>;
}

/// Desktop preferences key/value store. Fire-and-forget writes; re-writing
/// an identical value is a no-op at the host level.
pub trait SettingsStore {
    fn set(&mut self, schema: &str, key: &str, value: &SettingValue) -> Result<()>;
}
