//! Fetch pipeline orchestration.
//!
//! Coordinates a full catalog run: overrides → tree walk → build → write →
//! report. The catalog file is replaced wholesale on every run; nothing
//! from the previous catalog is carried over.
//!
//! Only configuration problems abort a run. A missing or unreadable
//! spreadsheet, unlistable folders and misfiled documents are all reported
//! at the end instead.

use anyhow::Result;
use chrono::{Datelike, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{GoogleCredentials, TokenProvider};
use crate::catalog::{self, BuildOptions, CatalogBuild};
use crate::config::Config;
use crate::connector_drive::DriveConnector;
use crate::connector_sheets::SheetsConnector;
use crate::overrides::load_overrides;
use crate::progress::{FetchProgressReporter, ProgressMode};
use crate::stats::{print_summary, summarize};
use crate::traits::{FileStore, SheetSource};
use crate::walk::{walk_tree, WalkOptions};

/// Build the catalog from the given stores without touching the disk.
pub async fn fetch_catalog(
    config: &Config,
    store: &dyn FileStore,
    sheets: Option<&dyn SheetSource>,
    progress: &dyn FetchProgressReporter,
    current_year: i32,
) -> Result<CatalogBuild> {
    let root_id = config.root_folder_id()?;

    let overrides = load_overrides(config, sheets).await;

    info!(root = root_id, store = store.name(), "scanning folders");
    let walk = walk_tree(store, root_id, &WalkOptions::from_config(&config.drive), progress).await;
    info!(
        documents = walk.documents.len(),
        folders = walk.folders_listed,
        "scan complete"
    );

    let options = BuildOptions::from_config(&config.catalog, current_year);
    Ok(catalog::build_from_walk(&walk, &overrides, &options))
}

/// What a run did with the catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
    DryRun,
}

/// Fetch with explicit stores, write the catalog and print the run report.
pub async fn run_fetch_with_stores(
    config: &Config,
    store: &dyn FileStore,
    sheets: Option<&dyn SheetSource>,
    dry_run: bool,
    progress: &dyn FetchProgressReporter,
) -> Result<WriteStatus> {
    let now = Utc::now();
    let build = fetch_catalog(config, store, sheets, progress, now.year()).await?;

    let path = &config.catalog.output;
    let status = if dry_run {
        WriteStatus::DryRun
    } else {
        let previous = catalog::read_catalog(path)
            .ok()
            .and_then(|records| catalog::fingerprint(&records).ok());
        let current = catalog::fingerprint(&build.records)?;
        catalog::write_catalog(path, &build.records)?;
        if previous.as_deref() == Some(current.as_str()) {
            WriteStatus::Unchanged
        } else {
            WriteStatus::Written
        }
    };

    print_report(config, &build, status);
    let summary = summarize(&build.records, now);
    println!();
    print_summary(&summary);
    println!("ok");

    Ok(status)
}

/// The `fetch` command: Google-backed stores, credentials from the
/// environment.
pub async fn run_fetch(config: &Config, dry_run: bool, progress: ProgressMode) -> Result<()> {
    // Configuration errors are fatal and must surface before any I/O.
    config.validate_for_fetch()?;
    let credentials = GoogleCredentials::from_env()?;

    let tokens = Arc::new(TokenProvider::readonly(credentials));
    let drive = DriveConnector::new(&config.drive, tokens.clone());
    let sheets = SheetsConnector::new(&config.sheet, tokens);
    let reporter = progress.reporter();

    run_fetch_with_stores(config, &drive, Some(&sheets), dry_run, reporter.as_ref()).await?;
    Ok(())
}

fn print_report(config: &Config, build: &CatalogBuild, status: WriteStatus) {
    let path = config.catalog.output.display();
    println!("fetch");
    println!("  processed: {} papers", build.records.len());

    if !build.errors.is_empty() {
        let shown = config.catalog.max_reported_errors;
        println!("  errors ({}):", build.errors.len());
        for e in build.errors.iter().take(shown) {
            println!("    - {}", e);
        }
        if build.errors.len() > shown {
            println!("    ... and {} more errors", build.errors.len() - shown);
        }
    }

    let dups = build.duplicate_ids();
    if !dups.is_empty() {
        warn!(count = dups.len(), "generated ids are not unique");
        println!("  duplicate ids ({}):", dups.len());
        for (id, n) in dups.iter().take(config.catalog.max_reported_errors) {
            println!("    - {} x{}", id, n);
        }
    }

    match status {
        WriteStatus::Written => println!("  catalog: {} (written)", path),
        WriteStatus::Unchanged => println!("  catalog: {} (unchanged)", path),
        WriteStatus::DryRun => println!("  catalog: {} (dry-run, not written)", path),
    }
}
