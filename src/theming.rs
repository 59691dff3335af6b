//! Theme Applier.
//!
//! Writes the interface/icon/cursor theme keys unconditionally and the
//! background keys only when the wallpaper file exists. No read-before-
//! write: re-writing an identical value is a no-op at the host level, so
//! the stage is idempotent as-is. Every write is independent; one failed
//! key never blocks the rest.

use crate::catalog::{SettingValue, Theme};
use crate::host::SettingsStore;
use crate::provision::{Stage, StageReport};
use std::path::Path;
use tracing::info;

pub const INTERFACE_SCHEMA: &str = "org.gnome.desktop.interface";
pub const BACKGROUND_SCHEMA: &str = "org.gnome.desktop.background";

/// Apply theme keys; `wallpaper` is `Some` only when the Asset Fetcher
/// left the file on disk.
pub fn apply(
    store: &mut dyn SettingsStore,
    theme: &Theme,
    wallpaper: Option<&Path>,
) -> StageReport {
    let mut report = StageReport::new(Stage::Theme);

    let mut write = |store: &mut dyn SettingsStore,
                     report: &mut StageReport,
                     schema: &str,
                     key: &str,
                     value: SettingValue| {
        match store.set(schema, key, &value) {
            Ok(()) => report.changed += 1,
            Err(e) => report.warn(format!("{} {}: {}", schema, key, e)),
        }
    };

    write(
        store,
        &mut report,
        INTERFACE_SCHEMA,
        "gtk-theme",
        SettingValue::string(&theme.gtk_theme),
    );
    write(
        store,
        &mut report,
        INTERFACE_SCHEMA,
        "icon-theme",
        SettingValue::string(&theme.icon_theme),
    );
    write(
        store,
        &mut report,
        INTERFACE_SCHEMA,
        "cursor-theme",
        SettingValue::string(&theme.cursor_theme),
    );

    match wallpaper {
        Some(path) => {
            write(
                store,
                &mut report,
                BACKGROUND_SCHEMA,
                "picture-uri",
                SettingValue::string(format!("file://{}", path.display())),
            );
            write(
                store,
                &mut report,
                BACKGROUND_SCHEMA,
                "picture-options",
                SettingValue::enum_token(&theme.picture_options),
            );
        }
        None => info!("Wallpaper not on disk; skipping background keys"),
    }

    report
}
