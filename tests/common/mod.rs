//! Recording host doubles shared by the integration suites.
//!
//! Each double implements one host seam, records every call, and can be
//! told to fail specific operations. The downloader and extractor touch
//! the real filesystem (under tempdirs owned by the tests) so the on-disk
//! idempotence checks are exercised for real.

use deskprov::catalog::SettingValue;
use deskprov::error::{ProvisionError, Result};
use deskprov::host::{
    ArchiveExtractor, Downloader, ExtensionRegistry, PackageManager, SettingsStore,
};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct MockPm {
    pub installed: HashSet<String>,
    pub refresh_fails: bool,
    pub refresh_calls: usize,
    pub install_calls: Vec<String>,
    pub fail_installs: HashSet<String>,
    pub autoremove_calls: usize,
    pub clean_calls: usize,
}

impl MockPm {
    pub fn with_installed(installed: &[&str]) -> Self {
        Self {
            installed: installed.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }
}

impl PackageManager for MockPm {
    fn refresh_index(&mut self) -> Result<()> {
        self.refresh_calls += 1;
        if self.refresh_fails {
            Err(ProvisionError::index_refresh("mirror unreachable"))
        } else {
            Ok(())
        }
    }

    fn is_installed(&mut self, name: &str) -> Result<bool> {
        Ok(self.installed.contains(name))
    }

    fn install(&mut self, name: &str) -> Result<()> {
        self.install_calls.push(name.to_string());
        if self.fail_installs.contains(name) {
            Err(ProvisionError::package(format!("{} has no candidate", name)))
        } else {
            self.installed.insert(name.to_string());
            Ok(())
        }
    }

    fn autoremove(&mut self) -> Result<()> {
        self.autoremove_calls += 1;
        Ok(())
    }

    fn clean_cache(&mut self) -> Result<()> {
        self.clean_calls += 1;
        Ok(())
    }
}

/// Downloader that writes a stub file on success. URLs containing any of
/// `fail_matches` fail.
#[derive(Default)]
pub struct MockDownloader {
    pub fail_matches: Vec<String>,
    pub calls: Vec<(String, PathBuf)>,
}

impl Downloader for MockDownloader {
    fn fetch(&mut self, url: &str, dest: &Path) -> Result<()> {
        self.calls.push((url.to_string(), dest.to_path_buf()));
        if self.fail_matches.iter().any(|m| url.contains(m.as_str())) {
            return Err(ProvisionError::download(format!("404 for {}", url)));
        }
        fs::write(dest, b"archive bytes")?;
        Ok(())
    }
}

/// Extractor that drops a marker file into the destination.
#[derive(Default)]
pub struct MockExtractor {
    pub calls: Vec<(PathBuf, PathBuf)>,
    pub fail: bool,
}

impl ArchiveExtractor for MockExtractor {
    fn extract(&mut self, archive: &Path, dest: &Path) -> Result<()> {
        self.calls.push((archive.to_path_buf(), dest.to_path_buf()));
        if self.fail {
            return Err(ProvisionError::extract("corrupt archive"));
        }
        fs::write(dest.join("extension.js"), b"// unpacked")?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MockRegistry {
    pub enabled: Vec<String>,
    pub fail_uuids: HashSet<String>,
}

impl ExtensionRegistry for MockRegistry {
    fn enable(&mut self, uuid: &str) -> Result<()> {
        self.enabled.push(uuid.to_string());
        if self.fail_uuids.contains(uuid) {
            Err(ProvisionError::enable(format!("{} not loadable", uuid)))
        } else {
            Ok(())
        }
    }
}

/// Settings store recording both the write sequence and the final value of
/// each key (for identical-final-state assertions).
#[derive(Default)]
pub struct MockStore {
    pub writes: Vec<(String, String, String)>,
    pub values: BTreeMap<String, String>,
}

impl SettingsStore for MockStore {
    fn set(&mut self, schema: &str, key: &str, value: &SettingValue) -> Result<()> {
        let rendered = value.to_cli_arg();
        self.writes
            .push((schema.to_string(), key.to_string(), rendered.clone()));
        self.values.insert(format!("{} {}", schema, key), rendered);
        Ok(())
    }
}
