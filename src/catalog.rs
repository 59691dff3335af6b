//! Declarative catalogs driving the provisioning run.
//!
//! Three catalogs describe the desired end-state of the host: packages that
//! must be present, shell extensions that must be installed+enabled, and the
//! wallpaper asset plus theme keys. The built-in catalog is compiled in;
//! `catalog_file` can load a JSON replacement with the same shape.
//!
//! Nothing in here touches the host. Catalogs are immutable for a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Packages the built-in catalog keeps present on the host.
pub const DEFAULT_PACKAGES: &[&str] = &[
    "wget",
    "unzip",
    "gnome-tweaks",
    "gnome-shell-extensions",
    "chrome-gnome-shell",
    "arc-theme",
    "papirus-icon-theme",
];

/// Remote catalog serving packaged extension artifacts.
pub const EXTENSION_HOST: &str = "https://extensions.gnome.org";

/// A single GNOME Shell extension entry.
///
/// The uuid is the sole key for both the idempotence check (its install
/// directory) and the enable/configure steps. `version_tag` only
/// participates in download-URL construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    /// Human-readable name, used in logs only.
    pub name: String,
    /// Stable identifier, e.g. `dash-to-dock@micxgx.gmail.com`.
    pub uuid: String,
    /// Numeric tag addressing the packaged artifact on the remote catalog.
    pub version_tag: u32,
}

impl Extension {
    pub fn new(name: &str, uuid: &str, version_tag: u32) -> Self {
        Self {
            name: name.to_string(),
            uuid: uuid.to_string(),
            version_tag,
        }
    }

    /// URL of the packaged artifact for this entry.
    pub fn download_url(&self) -> String {
        format!(
            "{}/download-extension/{}.shell-extension.zip?version_tag={}",
            EXTENSION_HOST, self.uuid, self.version_tag
        )
    }

    /// Filename used for the temporary downloaded archive.
    pub fn archive_name(&self) -> String {
        format!("{}.shell-extension.zip", self.uuid)
    }
}

/// A (target-path, source-URL) pair for a file the host must have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Absolute path the file must exist at.
    pub target: PathBuf,
    /// Where to fetch it from when absent.
    pub url: String,
}

/// Theme keys written by the Theme Applier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub gtk_theme: String,
    pub icon_theme: String,
    pub cursor_theme: String,
    /// How the background picture is scaled (`zoom`, `centered`, ...).
    pub picture_options: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            gtk_theme: "Arc-Dark".to_string(),
            icon_theme: "Papirus-Dark".to_string(),
            cursor_theme: "Adwaita".to_string(),
            picture_options: "zoom".to_string(),
        }
    }
}

/// A value written to the preferences store.
///
/// Mirrors the three value kinds gsettings accepts from us: quoted strings,
/// booleans, and bare enum tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Str(String),
    Bool(bool),
    /// Enum-typed key token, passed unquoted (e.g. `zoom`).
    Enum(String),
}

impl SettingValue {
    pub fn string(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    pub fn enum_token(s: impl Into<String>) -> Self {
        Self::Enum(s.into())
    }

    /// Encoding used on the `gsettings set` command line. Strings are
    /// single-quoted so GVariant parses them as strings even when they
    /// look like something else (URIs, numbers); embedded backslashes and
    /// single quotes are backslash-escaped per GVariant text syntax.
    pub fn to_cli_arg(&self) -> String {
        match self {
            Self::Str(s) => {
                let escaped = s.replace('\\', "\\\\").replace('\'', "\\'");
                format!("'{}'", escaped)
            }
            Self::Bool(b) => b.to_string(),
            Self::Enum(s) => s.clone(),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cli_arg())
    }
}

/// The full desired end-state for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub packages: Vec<String>,
    pub extensions: Vec<Extension>,
    pub wallpaper: Asset,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            packages: DEFAULT_PACKAGES.iter().map(|s| s.to_string()).collect(),
            extensions: vec![
                Extension::new(
                    "User Themes",
                    "user-theme@gnome-shell-extensions.gcampax.github.com",
                    19,
                ),
                Extension::new("Dash to Dock", "dash-to-dock@micxgx.gmail.com", 307),
                Extension::new("Blur my Shell", "blur-my-shell@aunetx", 1211),
            ],
            wallpaper: Asset {
                target: PathBuf::from("/usr/share/backgrounds/deskprov-wallpaper.jpg"),
                url: "https://raw.githubusercontent.com/deskprov/assets/main/wallpaper.jpg"
                    .to_string(),
            },
            theme: Theme::default(),
        }
    }
}

impl Catalog {
    /// Validate catalog invariants.
    ///
    /// The uuid must be unique across the catalog: it doubles as the
    /// install directory name and the enable-registry key, so a duplicate
    /// would make two entries fight over the same host state.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ProvisionError;

        for pkg in &self.packages {
            if pkg.trim().is_empty() {
                return Err(ProvisionError::catalog("empty package name"));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for ext in &self.extensions {
            if ext.uuid.trim().is_empty() {
                return Err(ProvisionError::catalog(format!(
                    "extension {:?} has an empty uuid",
                    ext.name
                )));
            }
            if !seen.insert(ext.uuid.as_str()) {
                return Err(ProvisionError::catalog(format!(
                    "duplicate extension uuid: {}",
                    ext.uuid
                )));
            }
        }

        if !self.wallpaper.url.starts_with("http://") && !self.wallpaper.url.starts_with("https://")
        {
            return Err(ProvisionError::catalog(format!(
                "wallpaper url must be http(s): {}",
                self.wallpaper.url
            )));
        }
        if !self.wallpaper.target.is_absolute() {
            return Err(ProvisionError::catalog(format!(
                "wallpaper target must be an absolute path: {}",
                self.wallpaper.target.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = Catalog::default();
        assert!(catalog.validate().is_ok());
        assert!(!catalog.packages.is_empty());
        assert!(!catalog.extensions.is_empty());
    }

    #[test]
    fn test_download_url_carries_uuid_and_tag() {
        let ext = Extension::new("User Themes", "user-theme@gnome", 19);
        let url = ext.download_url();
        assert!(url.starts_with(EXTENSION_HOST));
        assert!(url.contains("user-theme@gnome.shell-extension.zip"));
        assert!(url.ends_with("version_tag=19"));
    }

    #[test]
    fn test_duplicate_uuid_rejected() {
        let mut catalog = Catalog::default();
        let dup = catalog.extensions[0].clone();
        catalog.extensions.push(dup);
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate extension uuid"));
    }

    #[test]
    fn test_relative_wallpaper_target_rejected() {
        let mut catalog = Catalog::default();
        catalog.wallpaper.target = PathBuf::from("backgrounds/w.jpg");
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_setting_value_cli_encoding() {
        assert_eq!(
            SettingValue::string("Arc-Dark").to_cli_arg(),
            "'Arc-Dark'"
        );
        assert_eq!(SettingValue::Bool(true).to_cli_arg(), "true");
        assert_eq!(SettingValue::enum_token("zoom").to_cli_arg(), "zoom");
    }

    #[test]
    fn test_setting_value_escapes_quotes_and_backslashes() {
        assert_eq!(
            SettingValue::string("it's a theme").to_cli_arg(),
            r"'it\'s a theme'"
        );
        assert_eq!(
            SettingValue::string(r"back\slash").to_cli_arg(),
            r"'back\\slash'"
        );
    }
}
