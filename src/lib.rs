//! deskprov library
//!
//! Declarative GNOME desktop provisioning: reconciles a catalog of
//! packages, shell extensions, theme keys and a wallpaper asset against a
//! single host, best-effort, in five fixed stages.

pub mod assets;
pub mod catalog;
pub mod catalog_file;
pub mod cleanup;
pub mod cli;
pub mod error;
pub mod extensions;
pub mod host;
pub mod packages;
pub mod provision;
pub mod system;
pub mod theming;

// Re-export main types for convenience
pub use catalog::{Asset, Catalog, Extension, SettingValue, Theme};
pub use error::{ProvisionError, Result};
pub use host::{ArchiveExtractor, Downloader, ExtensionRegistry, PackageManager, SettingsStore};
pub use provision::{Hosts, Plan, ProvisionOutcome, Stage, StageReport};
pub use system::{extensions_root, Apt, GnomeShell, Gsettings, Unzip, Wget};
