//! Catalog file handling for saving and loading JSON catalogs.
//!
//! The built-in catalog covers the common case; a site that wants its own
//! package set, extensions, or theme drops in a JSON file with the same
//! shape and passes `--catalog`. Loading always validates, so a duplicate
//! uuid or a relative wallpaper path is rejected before any stage runs.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::catalog::Catalog;

/// Load and validate a catalog from a JSON file.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read catalog from {:?}", path.as_ref()))?;

    let catalog: Catalog =
        serde_json::from_str(&content).context("Failed to parse catalog JSON")?;

    catalog
        .validate()
        .with_context(|| format!("Invalid catalog {:?}", path.as_ref()))?;

    Ok(catalog)
}

/// Save a catalog to a JSON file (pretty-printed).
pub fn save_to_file<P: AsRef<Path>>(catalog: &Catalog, path: P) -> Result<()> {
    let json =
        serde_json::to_string_pretty(catalog).context("Failed to serialize catalog to JSON")?;

    fs::write(&path, json)
        .with_context(|| format!("Failed to write catalog to {:?}", path.as_ref()))?;

    Ok(())
}
