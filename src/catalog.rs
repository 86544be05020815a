//! Catalog building and persistence.
//!
//! Turns walked documents into [`Record`]s: each document's path is run
//! through the extractor, the matching manual override (if any) is merged
//! in, and the result is sorted newest first. Documents that cannot be
//! placed never stop the run; they become [`CatalogError`] entries that are
//! returned next to the records.
//!
//! The catalog is persisted as a single pretty-printed JSON array and is
//! always rewritten whole.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::config::CatalogConfig;
use crate::extract::{parse_file_path, PaperKey, Rejection};
use crate::models::{Override, Record, WalkedDocument};
use crate::overrides::OverrideStore;
use crate::walk::WalkOutcome;

/// A document or folder that contributed no records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Invalid structure: {path} ({reason})")]
    InvalidStructure { path: String, reason: Rejection },
    #[error("Missing view link: {path}")]
    MissingViewLink { path: String },
    #[error("Missing modified time: {path}")]
    MissingModifiedTime { path: String },
    #[error("Folder listing failed: {path} ({message})")]
    ListingFailed { path: String, message: String },
}

impl CatalogError {
    pub fn path(&self) -> &str {
        match self {
            CatalogError::InvalidStructure { path, .. }
            | CatalogError::MissingViewLink { path }
            | CatalogError::MissingModifiedTime { path }
            | CatalogError::ListingFailed { path, .. } => path,
        }
    }
}

/// Record defaults that are policy rather than data.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub default_exam_type: String,
    /// Medium left out of generated titles.
    pub default_medium: String,
    /// Year used when a file name carries none.
    pub current_year: i32,
}

impl BuildOptions {
    pub fn from_config(config: &CatalogConfig, current_year: i32) -> Self {
        Self {
            default_exam_type: config.default_exam_type.clone(),
            default_medium: config.default_medium.clone(),
            current_year,
        }
    }
}

/// Output of a build: the sorted catalog and everything left out of it.
#[derive(Debug, Default)]
pub struct CatalogBuild {
    pub records: Vec<Record>,
    pub errors: Vec<CatalogError>,
}

impl CatalogBuild {
    /// Ids shared by more than one record, with their counts, sorted by id.
    pub fn duplicate_ids(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for r in &self.records {
            *counts.entry(r.id.as_str()).or_insert(0) += 1;
        }
        let mut dups: Vec<(String, usize)> = counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, n)| (id.to_string(), n))
            .collect();
        dups.sort();
        dups
    }
}

/// `Grade 6 Science 2023 Term 1`, plus ` Sinhala Medium` for non-default
/// mediums.
pub fn generated_title(key: &PaperKey, default_medium: &str) -> String {
    let mut title = format!(
        "Grade {} {} {} Term {}",
        key.grade, key.subject, key.year, key.term
    );
    if key.medium != default_medium {
        title.push_str(&format!(" {} Medium", key.medium));
    }
    title
}

/// Combine a placed document with its override into a record.
pub fn build_record(
    doc: &WalkedDocument,
    key: PaperKey,
    manual: Option<&Override>,
    pdf_url: String,
    added_date: NaiveDate,
    options: &BuildOptions,
) -> Record {
    let manual = manual.cloned().unwrap_or_default();
    let title = manual
        .custom_title
        .unwrap_or_else(|| generated_title(&key, &options.default_medium));

    Record {
        id: key.id,
        grade: key.grade,
        subject: key.subject,
        medium: key.medium,
        year: key.year,
        term: key.term,
        exam_type: manual
            .exam_type
            .unwrap_or_else(|| options.default_exam_type.clone()),
        title,
        pdf_url,
        download_url: doc.item.web_content_link.clone(),
        file_size: doc.item.size,
        notes: manual.notes,
        added_date,
    }
}

/// Build records from walked documents.
pub fn build_catalog(
    documents: &[WalkedDocument],
    overrides: &OverrideStore,
    options: &BuildOptions,
) -> CatalogBuild {
    let mut build = CatalogBuild::default();

    for doc in documents {
        let key = match parse_file_path(&doc.folder_path, &doc.item.name, options.current_year) {
            Ok(key) => key,
            Err(reason) => {
                build.errors.push(CatalogError::InvalidStructure {
                    path: doc.full_path(),
                    reason,
                });
                continue;
            }
        };

        let Some(pdf_url) = doc.item.web_view_link.clone() else {
            build.errors.push(CatalogError::MissingViewLink {
                path: doc.full_path(),
            });
            continue;
        };

        let Some(modified) = doc.item.modified_time else {
            build.errors.push(CatalogError::MissingModifiedTime {
                path: doc.full_path(),
            });
            continue;
        };

        let manual = overrides.get(&doc.item.name);
        build.records.push(build_record(
            doc,
            key,
            manual,
            pdf_url,
            modified.date_naive(),
            options,
        ));
    }

    sort_newest_first(&mut build.records);
    build
}

/// Build from a complete walk; folder listing failures lead the error list.
pub fn build_from_walk(
    walk: &WalkOutcome,
    overrides: &OverrideStore,
    options: &BuildOptions,
) -> CatalogBuild {
    let mut build = build_catalog(&walk.documents, overrides, options);
    let mut errors: Vec<CatalogError> = walk
        .failures
        .iter()
        .map(|f| CatalogError::ListingFailed {
            path: f.path.clone(),
            message: f.message.clone(),
        })
        .collect();
    errors.append(&mut build.errors);
    build.errors = errors;
    build
}

/// Most recently added first. Stable, so same-day records keep input order.
pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| b.added_date.cmp(&a.added_date));
}

/// The persisted form of the catalog.
pub fn catalog_json(records: &[Record]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize catalog")
}

/// SHA-256 of the persisted form, for telling whether a run changed anything.
pub fn fingerprint(records: &[Record]) -> Result<String> {
    let json = catalog_json(records)?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

pub fn write_catalog(path: &Path, records: &[Record]) -> Result<()> {
    let json = catalog_json(records)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write catalog: {}", path.display()))?;
    Ok(())
}

pub fn read_catalog(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))
}
