//! deskprov - Main entry point
//!
//! One-shot sequential provisioning of a GNOME desktop host; see the
//! library crate for the reconciliation logic.

use std::path::Path;
use tracing::{error, info};

use deskprov::cli::{Cli, Commands};
use deskprov::provision::{self, Hosts};
use deskprov::system::{extensions_root, Apt, GnomeShell, Gsettings, Unzip, Wget};
use deskprov::{catalog_file, Catalog};

/// Initialize the logger with appropriate settings
fn init_logger() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging first
    init_logger();
    info!("deskprov starting up");

    let cli = Cli::parse_args();

    match cli.command {
        Some(Commands::Validate { catalog }) => {
            info!("Validating catalog file: {:?}", catalog);
            match catalog_file::load_from_file(&catalog) {
                Ok(_) => {
                    println!("✓ Catalog file is valid: {:?}", catalog);
                }
                Err(e) => {
                    error!("Catalog validation failed: {:#}", e);
                    eprintln!("✗ Catalog validation failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Plan) => {
            let catalog = load_catalog_or_exit(cli.catalog.as_deref());
            run_plan(&catalog)?;
        }
        Some(Commands::Apply) | None => {
            let catalog = load_catalog_or_exit(cli.catalog.as_deref());
            run_apply(&catalog, cli.dry_run)?;
        }
    }

    Ok(())
}

/// Load the catalog file when given, else the built-in catalog.
fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    match path {
        Some(path) => {
            info!("Loading catalog from {:?}", path);
            catalog_file::load_from_file(path)
        }
        None => Ok(Catalog::default()),
    }
}

/// Load the catalog, reporting a failure once and exiting, matching the
/// abort path of `run_apply`.
fn load_catalog_or_exit(path: Option<&Path>) -> Catalog {
    match load_catalog(path) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to load catalog: {:#}", e);
            eprintln!("✗ Failed to load catalog: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Run the full five-stage reconciliation.
fn run_apply(catalog: &Catalog, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let root = extensions_root()?;

    let mut apt = Apt::new(dry_run);
    let mut wget = Wget::new(dry_run);
    let mut unzip = Unzip::new(dry_run);
    let mut shell = GnomeShell::new(dry_run);
    let mut gsettings = Gsettings::new(dry_run);

    let mut hosts = Hosts {
        packages: &mut apt,
        downloader: &mut wget,
        archive: &mut unzip,
        registry: &mut shell,
        settings: &mut gsettings,
    };

    match provision::run(&mut hosts, catalog, &root, dry_run) {
        Ok(outcome) => {
            println!("✓ {}", outcome);
            for warning in outcome.warnings() {
                println!("  ⚠ {}", warning);
            }
            println!("Log out and back in for all changes to take effect.");
            Ok(())
        }
        Err(e) => {
            // Only the index-refresh failure lands here; nothing after it ran.
            error!("Provisioning aborted: {}", e);
            eprintln!("✗ Provisioning aborted: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a read-only reconciliation preview.
fn run_plan(catalog: &Catalog) -> Result<(), Box<dyn std::error::Error>> {
    let root = extensions_root()?;
    let mut apt = Apt::new(true);
    let plan = provision::plan(&mut apt, catalog, &root);
    println!("{}", plan.render());
    Ok(())
}
