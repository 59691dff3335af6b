//! Provisioning orchestration.
//!
//! Runs the five stages strictly in sequence: packages, wallpaper asset,
//! extensions, theme, cleanup. Stages never pass data to each other in
//! process; all coordination goes through host state, which each stage
//! re-queries before acting. The single exception is the wallpaper-present
//! flag, which is itself a host query result handed from stage 2 to stage 4.
//!
//! # Failure Policy
//!
//! Only a package-index-refresh failure aborts the run (and it aborts it
//! before any install and before any later stage). Everything else is
//! collected as a warning and the run continues at the next independent
//! unit of work.

use crate::assets;
use crate::catalog::Catalog;
use crate::cleanup;
use crate::extensions;
use crate::host::{ArchiveExtractor, Downloader, ExtensionRegistry, PackageManager, SettingsStore};
use crate::packages;
use crate::theming;

use std::fmt;
use std::path::Path;
use strum::Display;
use tracing::{info, warn};

/// The five stages, in execution order. Used for log/report labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    Packages,
    Wallpaper,
    Extensions,
    Theme,
    Cleanup,
}

/// Per-stage outcome: how many host mutations were issued and which
/// non-fatal failures occurred.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    /// Host mutations actually issued (installs, downloads, key writes).
    pub changed: usize,
    pub warnings: Vec<String>,
}

impl StageReport {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            changed: 0,
            warnings: Vec::new(),
        }
    }

    /// Record a non-fatal failure and keep going.
    pub fn warn(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        warn!("[{}] {}", self.stage, msg);
        self.warnings.push(format!("[{}] {}", self.stage, msg));
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone)]
pub enum ProvisionOutcome {
    /// Every stage completed with no warnings.
    Success,
    /// The run completed, but some units of work failed.
    PartialSuccess(Vec<String>),
}

impl ProvisionOutcome {
    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Success => &[],
            Self::PartialSuccess(w) => w,
        }
    }
}

impl fmt::Display for ProvisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "All provisioning stages succeeded"),
            Self::PartialSuccess(warnings) => {
                write!(f, "Provisioning completed with {} warning(s)", warnings.len())
            }
        }
    }
}

/// The host seams a run needs, bundled so `run` stays callable with both
/// the production implementations and test doubles.
pub struct Hosts<'a> {
    pub packages: &'a mut dyn PackageManager,
    pub downloader: &'a mut dyn Downloader,
    pub archive: &'a mut dyn ArchiveExtractor,
    pub registry: &'a mut dyn ExtensionRegistry,
    pub settings: &'a mut dyn SettingsStore,
}

/// Run all five stages against the host.
///
/// `extensions_root` is the per-user directory extension uuids are
/// installed under. `dry_run` gates the filesystem mutations the stages
/// perform directly, alongside the gating the host seams do themselves.
/// Returns `Err` only for the fatal index-refresh case.
pub fn run(
    hosts: &mut Hosts<'_>,
    catalog: &Catalog,
    extensions_root: &Path,
    dry_run: bool,
) -> crate::error::Result<ProvisionOutcome> {
    let mut warnings: Vec<String> = Vec::new();

    // 1. Packages. Index refresh failure propagates and ends the run here.
    let report = packages::reconcile(hosts.packages, &catalog.packages)?;
    info!("[{}] {} package(s) installed", report.stage, report.changed);
    warnings.extend(report.warnings);

    // 2. Wallpaper asset.
    let asset = assets::fetch(hosts.downloader, &catalog.wallpaper, dry_run);
    warnings.extend(asset.report.warnings);

    // 3. Extensions.
    let report = extensions::reconcile(
        hosts.downloader,
        hosts.archive,
        hosts.registry,
        hosts.settings,
        extensions_root,
        &catalog.extensions,
        dry_run,
    );
    info!("[{}] {} extension(s) installed", report.stage, report.changed);
    warnings.extend(report.warnings);

    // 4. Theme. Wallpaper keys only if the asset is actually on disk.
    let wallpaper = asset.present.then_some(catalog.wallpaper.target.as_path());
    let report = theming::apply(hosts.settings, &catalog.theme, wallpaper);
    warnings.extend(report.warnings);

    // 5. Cleanup, best-effort.
    let report = cleanup::run(hosts.packages);
    warnings.extend(report.warnings);

    if warnings.is_empty() {
        Ok(ProvisionOutcome::Success)
    } else {
        Ok(ProvisionOutcome::PartialSuccess(warnings))
    }
}

/// Read-only reconciliation preview: what `run` would change right now.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Packages not currently registered as installed.
    pub packages_to_install: Vec<String>,
    /// Extension uuids whose install directory is absent.
    pub extensions_to_install: Vec<String>,
    /// Whether the wallpaper asset would be downloaded.
    pub wallpaper_missing: bool,
}

impl Plan {
    pub fn is_noop(&self) -> bool {
        self.packages_to_install.is_empty()
            && self.extensions_to_install.is_empty()
            && !self.wallpaper_missing
    }

    /// Human-readable rendering for stdout.
    pub fn render(&self) -> String {
        if self.is_noop() {
            return "Host already matches the catalog; nothing to do.".to_string();
        }
        let mut out = String::new();
        if !self.packages_to_install.is_empty() {
            out.push_str(&format!(
                "Packages to install: {}\n",
                self.packages_to_install.join(", ")
            ));
        }
        if !self.extensions_to_install.is_empty() {
            out.push_str(&format!(
                "Extensions to install: {}\n",
                self.extensions_to_install.join(", ")
            ));
        }
        if self.wallpaper_missing {
            out.push_str("Wallpaper: would be downloaded\n");
        }
        out.push_str("(theme keys are always re-applied)");
        out
    }
}

/// Compute a [`Plan`] using only read-only host queries.
///
/// A failed installed-state query is treated as "would attempt install",
/// matching what `run` would do after logging the same warning.
pub fn plan(
    pm: &mut dyn PackageManager,
    catalog: &Catalog,
    extensions_root: &Path,
) -> Plan {
    let mut plan = Plan::default();

    for name in &catalog.packages {
        match pm.is_installed(name) {
            Ok(true) => {}
            Ok(false) => plan.packages_to_install.push(name.clone()),
            Err(e) => {
                warn!("could not query {}: {}", name, e);
                plan.packages_to_install.push(name.clone());
            }
        }
    }

    for ext in &catalog.extensions {
        if !extensions_root.join(&ext.uuid).exists() {
            plan.extensions_to_install.push(ext.uuid.clone());
        }
    }

    plan.wallpaper_missing = !catalog.wallpaper.target.exists();
    plan
}
