//! Asset Fetcher.
//!
//! Ensures the wallpaper file exists at its target path, downloading it
//! when absent. A download failure is a warning; it additionally marks the
//! asset absent so the Theme Applier skips the wallpaper keys (and only
//! those).

use crate::catalog::Asset;
use crate::host::Downloader;
use crate::provision::{Stage, StageReport};
use std::fs;
use tracing::{debug, info};

/// Result of the asset stage: a stage report plus whether the file is on
/// disk afterwards. Later stages gate wallpaper behavior on `present`.
#[derive(Debug)]
pub struct AssetOutcome {
    pub present: bool,
    pub report: StageReport,
}

/// Ensure the asset exists, fetching it if needed.
///
/// Idempotence: a pre-existing target is never re-downloaded. Presence is
/// re-checked on disk after a successful fetch rather than assumed, so a
/// dry-run fetch correctly reports the asset as still absent. `dry_run`
/// gates the parent-directory creation this stage performs itself.
pub fn fetch(dl: &mut dyn Downloader, asset: &Asset, dry_run: bool) -> AssetOutcome {
    let mut report = StageReport::new(Stage::Wallpaper);

    if asset.target.exists() {
        debug!("{} already present", asset.target.display());
        return AssetOutcome {
            present: true,
            report,
        };
    }

    if let Some(parent) = asset.target.parent() {
        if dry_run {
            debug!("[dry-run] would ensure {} exists", parent.display());
        } else if let Err(e) = fs::create_dir_all(parent) {
            report.warn(format!(
                "could not create {}: {}",
                parent.display(),
                e
            ));
            return AssetOutcome {
                present: false,
                report,
            };
        }
    }

    info!("Downloading {} -> {}", asset.url, asset.target.display());
    match dl.fetch(&asset.url, &asset.target) {
        Ok(()) => {
            let present = asset.target.exists();
            if present {
                report.changed += 1;
            }
            AssetOutcome { present, report }
        }
        Err(e) => {
            report.warn(format!("wallpaper download failed: {}", e));
            AssetOutcome {
                present: false,
                report,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProvisionError, Result};
    use std::path::{Path, PathBuf};

    struct FakeDownloader {
        fail: bool,
        calls: Vec<String>,
    }

    impl Downloader for FakeDownloader {
        fn fetch(&mut self, url: &str, dest: &Path) -> Result<()> {
            self.calls.push(url.to_string());
            if self.fail {
                Err(ProvisionError::download("connection refused"))
            } else {
                fs::write(dest, b"jpg").map_err(Into::into)
            }
        }
    }

    fn asset_in(dir: &Path) -> Asset {
        Asset {
            target: dir.join("wallpaper.jpg"),
            url: "https://example.com/wallpaper.jpg".to_string(),
        }
    }

    #[test]
    fn test_existing_asset_is_never_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let asset = asset_in(dir.path());
        fs::write(&asset.target, b"already here").unwrap();

        let mut dl = FakeDownloader {
            fail: false,
            calls: vec![],
        };
        let outcome = fetch(&mut dl, &asset, false);
        assert!(outcome.present);
        assert!(dl.calls.is_empty());
        assert_eq!(outcome.report.changed, 0);
    }

    #[test]
    fn test_absent_asset_is_downloaded() {
        let dir = tempfile::tempdir().unwrap();
        let asset = asset_in(dir.path());

        let mut dl = FakeDownloader {
            fail: false,
            calls: vec![],
        };
        let outcome = fetch(&mut dl, &asset, false);
        assert!(outcome.present);
        assert_eq!(dl.calls, vec![asset.url.clone()]);
        assert_eq!(outcome.report.changed, 1);
        assert!(asset.target.exists());
    }

    #[test]
    fn test_download_failure_marks_asset_absent() {
        let dir = tempfile::tempdir().unwrap();
        let asset = asset_in(dir.path());

        let mut dl = FakeDownloader {
            fail: true,
            calls: vec![],
        };
        let outcome = fetch(&mut dl, &asset, false);
        assert!(!outcome.present);
        assert_eq!(outcome.report.warnings.len(), 1);
    }

    #[test]
    fn test_dry_run_creates_nothing_and_warns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let asset = Asset {
            target: dir.path().join("sub/wallpaper.jpg"),
            url: "https://example.com/wallpaper.jpg".to_string(),
        };
        let mut dl = crate::system::Wget::new(true);
        let outcome = fetch(&mut dl, &asset, true);
        assert!(!outcome.present);
        assert!(outcome.report.warnings.is_empty());
        assert!(!dir.path().join("sub").exists());
    }

    #[test]
    fn test_missing_parent_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let asset = Asset {
            target: dir.path().join("deep/nested/wallpaper.jpg"),
            url: "https://example.com/wallpaper.jpg".to_string(),
        };
        let mut dl = FakeDownloader {
            fail: false,
            calls: vec![],
        };
        let outcome = fetch(&mut dl, &asset, false);
        assert!(outcome.present);
        assert!(PathBuf::from(dir.path().join("deep/nested")).is_dir());
    }
}
