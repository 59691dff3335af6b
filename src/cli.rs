use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// deskprov - declarative GNOME desktop provisioner
#[derive(Parser)]
#[command(name = "deskprov")]
#[command(about = "Reconciles packages, shell extensions, theming and wallpaper against a catalog")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: show what would be executed without making changes.
    ///
    /// In this mode, mutating operations (installs, downloads, settings
    /// writes) are skipped and logged. Read-only queries (installed-state,
    /// file existence) still execute so the preview is realistic.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Path to a JSON catalog replacing the built-in one
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run all provisioning stages (the default when no command is given)
    Apply,
    /// Read-only preview of what apply would change
    Plan,
    /// Validate a catalog file without touching the host
    Validate {
        /// Path to the catalog file to validate
        catalog: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
