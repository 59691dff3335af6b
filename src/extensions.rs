//! Extension Reconciler.
//!
//! For each catalog entry: ensure the extension is on disk (download +
//! extract when its install directory is absent), request enablement, and
//! apply any per-uuid configuration. Entries are independent; a failure in
//! one never blocks the next.
//!
//! Per-entry state machine:
//! `{unknown} -> {present-on-disk?} -> {enabled-attempted} -> {configured|skipped}`
//! Terminal on configured-or-skipped; no entry transitions back.
//!
//! # Idempotence classes
//!
//! - Directory present: download and extract are skipped, but enable and
//!   configure still run, so configuration can be re-applied without a
//!   re-download.
//! - Directory absent: full install path.
//! The uuid is the sole key for both the on-disk check and the configure
//! dispatch; exact string match only.

use crate::catalog::{Extension, SettingValue};
use crate::error::Result;
use crate::host::{ArchiveExtractor, Downloader, ExtensionRegistry, SettingsStore};
use crate::provision::{Stage, StageReport};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Reconcile all catalog extensions under `root`.
///
/// `dry_run` gates the reconciler's own filesystem mutations (directory
/// creation, temp-archive removal); the host seams gate theirs.
pub fn reconcile(
    dl: &mut dyn Downloader,
    archive: &mut dyn ArchiveExtractor,
    registry: &mut dyn ExtensionRegistry,
    settings: &mut dyn SettingsStore,
    root: &Path,
    extensions: &[Extension],
    dry_run: bool,
) -> StageReport {
    let mut report = StageReport::new(Stage::Extensions);

    for ext in extensions {
        let install_dir = root.join(&ext.uuid);

        if install_dir.exists() {
            debug!("{} already present at {}", ext.name, install_dir.display());
        } else {
            info!("Installing {} ({})", ext.name, ext.uuid);
            let archive_path = std::env::temp_dir().join(ext.archive_name());

            if let Err(e) = dl.fetch(&ext.download_url(), &archive_path) {
                report.warn(format!("{}: download failed: {}", ext.name, e));
                continue;
            }
            if dry_run {
                info!(
                    "[dry-run] would extract {} -> {}",
                    archive_path.display(),
                    install_dir.display()
                );
            } else {
                if let Err(e) = fs::create_dir_all(&install_dir) {
                    report.warn(format!(
                        "{}: could not create {}: {}",
                        ext.name,
                        install_dir.display(),
                        e
                    ));
                    continue;
                }
                if let Err(e) = archive.extract(&archive_path, &install_dir) {
                    // The archive is left in place for post-mortem.
                    report.warn(format!("{}: extraction failed: {}", ext.name, e));
                    continue;
                }
                if let Err(e) = fs::remove_file(&archive_path) {
                    report.warn(format!(
                        "{}: could not remove {}: {}",
                        ext.name,
                        archive_path.display(),
                        e
                    ));
                }
            }
            report.changed += 1;
        }

        // Enable is attempted whether the directory pre-existed or was
        // just populated. The shell may report failure for an extension
        // that needs a session restart; that stays a warning.
        if let Err(e) = registry.enable(&ext.uuid) {
            report.warn(format!("{}: enable failed: {}", ext.name, e));
        }

        match configure(&ext.uuid, settings) {
            Ok(0) => debug!("{}: no extension-specific settings", ext.name),
            Ok(n) => info!("{}: applied {} setting(s)", ext.name, n),
            Err(e) => report.warn(format!("{}: configuration failed: {}", ext.name, e)),
        }
    }

    report
}

/// Per-uuid configuration dispatch.
///
/// A static mapping from uuid to the preference writes that extension
/// needs. The default arm is the documented no-op case: a uuid without a
/// routine is not an error. Returns the number of keys written.
pub fn configure(uuid: &str, store: &mut dyn SettingsStore) -> Result<usize> {
    match uuid {
        "dash-to-dock@micxgx.gmail.com" => {
            store.set(
                "org.gnome.shell.extensions.dash-to-dock",
                "dock-position",
                &SettingValue::string("BOTTOM"),
            )?;
            store.set(
                "org.gnome.shell.extensions.dash-to-dock",
                "dock-fixed",
                &SettingValue::Bool(false),
            )?;
            store.set(
                "org.gnome.shell.extensions.dash-to-dock",
                "click-action",
                &SettingValue::enum_token("minimize"),
            )?;
            Ok(3)
        }
        _ => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProvisionError;

    #[derive(Default)]
    struct RecordingStore {
        writes: Vec<(String, String, String)>,
    }

    impl SettingsStore for RecordingStore {
        fn set(&mut self, schema: &str, key: &str, value: &SettingValue) -> Result<()> {
            self.writes
                .push((schema.to_string(), key.to_string(), value.to_cli_arg()));
            Ok(())
        }
    }

    #[test]
    fn test_configure_default_case_is_noop() {
        let mut store = RecordingStore::default();
        let n = configure("unknown@nowhere", &mut store).unwrap();
        assert_eq!(n, 0);
        assert!(store.writes.is_empty());
    }

    #[test]
    fn test_configure_dash_to_dock_writes_dock_keys() {
        let mut store = RecordingStore::default();
        let n = configure("dash-to-dock@micxgx.gmail.com", &mut store).unwrap();
        assert_eq!(n, 3);
        assert!(store
            .writes
            .iter()
            .all(|w| w.0 == "org.gnome.shell.extensions.dash-to-dock"));
        let keys: Vec<&str> = store.writes.iter().map(|w| w.1.as_str()).collect();
        assert_eq!(keys, vec!["dock-position", "dock-fixed", "click-action"]);
    }

    #[test]
    fn test_configure_requires_exact_uuid_match() {
        let mut store = RecordingStore::default();
        // Prefix of a mapped uuid must hit the default arm.
        let n = configure("dash-to-dock@micxgx", &mut store).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn test_configure_propagates_store_failure() {
        struct FailingStore;
        impl SettingsStore for FailingStore {
            fn set(&mut self, _: &str, _: &str, _: &SettingValue) -> Result<()> {
                Err(ProvisionError::settings("dconf unavailable"))
            }
        }
        let mut store = FailingStore;
        assert!(configure("dash-to-dock@micxgx.gmail.com", &mut store).is_err());
    }
}
