//! Package Reconciler.
//!
//! Ensures every package named by the catalog is registered as installed.
//! The index is refreshed once, up front; a refresh failure is the run's
//! only fatal condition. Individual installs are warn-and-continue, and an
//! already-installed package is a pure no-op.

use crate::error::Result;
use crate::host::PackageManager;
use crate::provision::{Stage, StageReport};
use tracing::{debug, info};

/// Bring the host package registry in line with the catalog.
///
/// Re-queries installed-state per package immediately before acting; no
/// snapshot is taken, so a package installed by other means mid-run is
/// still skipped.
pub fn reconcile(pm: &mut dyn PackageManager, packages: &[String]) -> Result<StageReport> {
    info!("Refreshing package index");
    pm.refresh_index()?;

    let mut report = StageReport::new(Stage::Packages);
    for name in packages {
        match pm.is_installed(name) {
            Ok(true) => {
                debug!("{} already installed", name);
            }
            Ok(false) => {
                info!("Installing {}", name);
                match pm.install(name) {
                    Ok(()) => report.changed += 1,
                    Err(e) => report.warn(format!("install of {} failed: {}", name, e)),
                }
            }
            Err(e) => {
                // A failed query gets the same treatment as a failed
                // install: this package is skipped, the batch continues.
                report.warn(format!("could not query {}: {}", name, e));
            }
        }
    }
    Ok(report)
}
