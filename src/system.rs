//! Production host implementations.
//!
//! Each host seam from `host` is backed by the utility the desktop itself
//! uses: apt for packages, wget for downloads, unzip for archives,
//! `gnome-extensions` for the enable registry, `gsettings` for the
//! preferences store. All of them run as awaited child processes with
//! captured output; a non-zero exit turns stderr into the error message.
//!
//! # Dry-run
//!
//! Every mutating operation honors the `dry_run` flag: it logs what would
//! be executed and returns `Ok`. Read-only queries (`is_installed`) still
//! execute so a preview stays realistic.

use crate::catalog::SettingValue;
use crate::error::{ProvisionError, Result};
use crate::host::{ArchiveExtractor, Downloader, ExtensionRegistry, PackageManager, SettingsStore};
use directories::BaseDirs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Run a command to completion, returning stdout on success and stderr as
/// the error message on a non-zero exit.
fn run_checked(cmd: &mut Command, context: &str) -> std::result::Result<String, String> {
    debug!("exec: {:?}", cmd);
    let output = cmd
        .output()
        .map_err(|e| format!("{}: failed to spawn: {}", context, e))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(format!(
            "{} (exit code {}): {}",
            context,
            output.status.code().unwrap_or(-1),
            stderr.trim()
        ))
    }
}

/// Per-user GNOME Shell extensions root.
pub fn extensions_root() -> Result<PathBuf> {
    let base = BaseDirs::new()
        .ok_or_else(|| ProvisionError::general("could not resolve the user home directory"))?;
    Ok(base
        .home_dir()
        .join(".local/share/gnome-shell/extensions"))
}

// ============================================================================
// apt
// ============================================================================

/// Debian/Ubuntu package manager backed by apt-get and dpkg-query.
#[derive(Debug, Clone, Default)]
pub struct Apt {
    pub dry_run: bool,
}

impl Apt {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl PackageManager for Apt {
    fn refresh_index(&mut self) -> Result<()> {
        if self.dry_run {
            info!("[dry-run] would run: apt-get update");
            return Ok(());
        }
        run_checked(Command::new("apt-get").arg("update"), "apt-get update")
            .map(|_| ())
            .map_err(ProvisionError::index_refresh)
    }

    fn is_installed(&mut self, name: &str) -> Result<bool> {
        // dpkg-query exits non-zero for unknown packages; that is a clean
        // "not installed", not an error.
        let output = Command::new("dpkg-query")
            .args(["-W", "-f=${Status}", name])
            .output()
            .map_err(|e| ProvisionError::package(format!("dpkg-query {}: {}", name, e)))?;

        if !output.status.success() {
            return Ok(false);
        }
        let status = String::from_utf8_lossy(&output.stdout);
        Ok(status.contains("install ok installed"))
    }

    fn install(&mut self, name: &str) -> Result<()> {
        if self.dry_run {
            info!("[dry-run] would run: apt-get install -y {}", name);
            return Ok(());
        }
        run_checked(
            Command::new("apt-get").args(["install", "-y", name]),
            &format!("apt-get install {}", name),
        )
        .map(|_| ())
        .map_err(ProvisionError::package)
    }

    fn autoremove(&mut self) -> Result<()> {
        if self.dry_run {
            info!("[dry-run] would run: apt-get autoremove -y");
            return Ok(());
        }
        run_checked(
            Command::new("apt-get").args(["autoremove", "-y"]),
            "apt-get autoremove",
        )
        .map(|_| ())
        .map_err(ProvisionError::package)
    }

    fn clean_cache(&mut self) -> Result<()> {
        if self.dry_run {
            info!("[dry-run] would run: apt-get clean");
            return Ok(());
        }
        run_checked(Command::new("apt-get").arg("clean"), "apt-get clean")
            .map(|_| ())
            .map_err(ProvisionError::package)
    }
}

// ============================================================================
// wget
// ============================================================================

/// Downloader shelling out to wget. Overwrites the destination.
#[derive(Debug, Clone, Default)]
pub struct Wget {
    pub dry_run: bool,
}

impl Wget {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl Downloader for Wget {
    fn fetch(&mut self, url: &str, dest: &Path) -> Result<()> {
        if self.dry_run {
            info!("[dry-run] would download {} -> {}", url, dest.display());
            return Ok(());
        }
        run_checked(
            Command::new("wget")
                .arg("-q")
                .arg("-O")
                .arg(dest)
                .arg(url),
            &format!("wget {}", url),
        )
        .map(|_| ())
        .map_err(ProvisionError::download)
    }
}

// ============================================================================
// unzip
// ============================================================================

/// Archive extractor shelling out to unzip.
#[derive(Debug, Clone, Default)]
pub struct Unzip {
    pub dry_run: bool,
}

impl Unzip {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl ArchiveExtractor for Unzip {
    fn extract(&mut self, archive: &Path, dest: &Path) -> Result<()> {
        if self.dry_run {
            info!(
                "[dry-run] would extract {} -> {}",
                archive.display(),
                dest.display()
            );
            return Ok(());
        }
        run_checked(
            Command::new("unzip")
                .arg("-o")
                .arg("-q")
                .arg(archive)
                .arg("-d")
                .arg(dest),
            &format!("unzip {}", archive.display()),
        )
        .map(|_| ())
        .map_err(ProvisionError::extract)
    }
}

// ============================================================================
// gnome-extensions
// ============================================================================

/// GNOME Shell's extension-enable registry via the `gnome-extensions` CLI.
///
/// The tool does not distinguish "not installed" from "incompatible" from
/// "needs a session restart" on its exit status, so stderr is surfaced
/// verbatim in the error message and the caller treats all of it as a
/// warning.
#[derive(Debug, Clone, Default)]
pub struct GnomeShell {
    pub dry_run: bool,
}

impl GnomeShell {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl ExtensionRegistry for GnomeShell {
    fn enable(&mut self, uuid: &str) -> Result<()> {
        if self.dry_run {
            info!("[dry-run] would run: gnome-extensions enable {}", uuid);
            return Ok(());
        }
        run_checked(
            Command::new("gnome-extensions").args(["enable", uuid]),
            &format!("gnome-extensions enable {}", uuid),
        )
        .map(|_| ())
        .map_err(ProvisionError::enable)
    }
}

// ============================================================================
// gsettings
// ============================================================================

/// Preferences store via the `gsettings` CLI.
#[derive(Debug, Clone, Default)]
pub struct Gsettings {
    pub dry_run: bool,
}

impl Gsettings {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }
}

impl SettingsStore for Gsettings {
    fn set(&mut self, schema: &str, key: &str, value: &SettingValue) -> Result<()> {
        let arg = value.to_cli_arg();
        if self.dry_run {
            info!("[dry-run] would run: gsettings set {} {} {}", schema, key, arg);
            return Ok(());
        }
        run_checked(
            Command::new("gsettings").args(["set", schema, key, &arg]),
            &format!("gsettings set {} {}", schema, key),
        )
        .map(|_| ())
        .map_err(ProvisionError::settings)
    }
}
