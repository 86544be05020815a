//! # Nenamaga CLI (`nenamaga`)
//!
//! Builds and inspects the past-paper catalog that the Nenamaga site is
//! generated from.
//!
//! ## Usage
//!
//! ```bash
//! nenamaga --config ./config/nenamaga.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `nenamaga fetch` | Walk the Drive tree and rewrite `papers.json` |
//! | `nenamaga stats` | Print per-grade, subject and medium counts |
//! | `nenamaga search "<query>"` | Run the site's search filter against the catalog |
//! | `nenamaga sitemap` | Render `sitemap.xml` from the catalog |
//! | `nenamaga sources` | Show which inputs are configured |
//! | `nenamaga serve` | Serve the catalog over HTTP for local preview |
//!
//! ## Examples
//!
//! ```bash
//! # Full fetch (needs FOLDER_ID and GOOGLE_CREDENTIALS)
//! nenamaga fetch
//!
//! # See what would change without writing the catalog
//! nenamaga fetch --dry-run
//!
//! # Search like the site's search bar does
//! nenamaga search "grade 6 science"
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use nenamaga::config::{self, Config};
use nenamaga::progress::ProgressMode;
use nenamaga::{ingest, logging, search, server, sitemap, sources, stats};

const DEFAULT_CONFIG_PATH: &str = "./config/nenamaga.toml";

/// Nenamaga catalog builder.
///
/// Settings come from an optional TOML file; `FOLDER_ID`,
/// `SPREADSHEET_ID` and `SITE_URL` in the environment take precedence.
#[derive(Parser)]
#[command(
    name = "nenamaga",
    about = "Build the Nenamaga past-paper catalog from Google Drive",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/nenamaga.toml`; a missing default file is
    /// fine, a missing explicit one is an error.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the Drive folder tree and write the catalog.
    ///
    /// The catalog file is replaced on every run. Misfiled documents and
    /// unreadable folders are reported at the end and do not fail the run.
    Fetch {
        /// Build and report, but leave the catalog file untouched.
        #[arg(long)]
        dry_run: bool,

        /// Progress output on stderr (default: human on a TTY, off otherwise).
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Summarize the persisted catalog.
    Stats {
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Filter the persisted catalog the way the site's search bar does.
    ///
    /// Queries shorter than two characters (after trimming) return
    /// nothing; at most ten results are shown.
    Search {
        /// Free-text query.
        query: String,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Render the sitemap for the persisted catalog.
    Sitemap {
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show configured inputs and whether they look usable.
    Sources,

    /// Serve the catalog, search, stats and sitemap over HTTP.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let cfg = load(cli.config.as_deref())?;

    match cli.command {
        Commands::Fetch { dry_run, progress } => {
            let mode = progress.unwrap_or_else(ProgressMode::default_for_tty);
            ingest::run_fetch(&cfg, dry_run, mode).await?;
        }
        Commands::Stats { json } => {
            stats::run_stats(&cfg, json)?;
        }
        Commands::Search { query, json } => {
            search::run_search(&cfg, &query, json)?;
        }
        Commands::Sitemap { output } => {
            sitemap::run_sitemap(&cfg, output.as_deref())?;
        }
        Commands::Sources => {
            sources::list_sources(&cfg)?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}

fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let mut cfg = match explicit {
        Some(path) => config::load_config_or_minimal(path, true)?,
        None => config::load_config_or_minimal(Path::new(DEFAULT_CONFIG_PATH), false)?,
    };
    cfg.apply_env(|key| std::env::var(key).ok());
    cfg.validate()?;
    Ok(cfg)
}
