//! # Nenamaga
//!
//! Build-time catalog of past examination papers for the Nenamaga site.
//!
//! Papers live in a Google Drive folder tree laid out as
//! `Grade <n>/<Subject>/<Medium>/<file>.pdf`. The fetch pipeline walks that
//! tree, derives each paper's grade, subject, medium, year and term from its
//! path and file name, merges optional hand-edited metadata from a Google
//! Sheet, and writes the result as `papers.json` for the static site.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Drive tree  │──▶│  walk +      │──▶│ papers.json  │
//! │ Sheet rows  │   │  extract +   │   │ (Record[])   │
//! └─────────────┘   │  overrides   │   └──────┬───────┘
//!                   └──────────────┘          │
//!                      ┌──────────────────────┤
//!                      ▼           ▼          ▼
//!                 ┌────────┐ ┌─────────┐ ┌─────────┐
//!                 │ search │ │ sitemap │ │  stats  │
//!                 └────────┘ └─────────┘ └─────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export FOLDER_ID=...            # Drive folder holding the Grade folders
//! export GOOGLE_CREDENTIALS="$(cat service-account.json)"
//! nenamaga fetch                  # writes src/data/papers.json
//! nenamaga stats
//! nenamaga search "maths"
//! nenamaga sitemap --output dist/sitemap.xml
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML + environment configuration |
//! | [`models`] | Core data types |
//! | [`extract`] | Path and file-name metadata extraction |
//! | [`walk`] | Recursive folder-tree walk |
//! | [`overrides`] | Manual metadata overrides |
//! | [`catalog`] | Record building, sorting and persistence |
//! | [`stats`] | Per-grade/subject/medium counts |
//! | [`search`] | Incremental search filter |
//! | [`sitemap`] | Sitemap rendering |
//! | [`connector_drive`] | Google Drive file store |
//! | [`connector_sheets`] | Google Sheets override source |
//! | [`server`] | Catalog preview HTTP server |

pub mod auth;
pub mod catalog;
pub mod config;
pub mod connector_drive;
pub mod connector_sheets;
pub mod extract;
pub mod ingest;
pub mod logging;
pub mod models;
pub mod overrides;
pub mod progress;
pub mod search;
pub mod server;
pub mod sitemap;
pub mod sources;
pub mod stats;
pub mod traits;
pub mod walk;
