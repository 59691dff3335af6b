//! Cleanup stage.
//!
//! Removes packages no longer required as dependencies and purges the
//! package manager's download cache. Strictly best-effort: failures are
//! logged as warnings and never affect the exit status of the run.

use crate::host::PackageManager;
use crate::provision::{Stage, StageReport};
use tracing::info;

pub fn run(pm: &mut dyn PackageManager) -> StageReport {
    let mut report = StageReport::new(Stage::Cleanup);

    info!("Removing unneeded packages");
    if let Err(e) = pm.autoremove() {
        report.warn(format!("autoremove failed: {}", e));
    }

    info!("Cleaning package cache");
    if let Err(e) = pm.clean_cache() {
        report.warn(format!("cache clean failed: {}", e));
    }

    report
}
