//! Core data models used throughout the catalog pipeline.
//!
//! These types represent the Drive items, walked documents, manual overrides
//! and catalog records that flow through ingestion and into the persisted
//! `papers.json`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// MIME type of the documents the catalog is built from.
pub const MIME_PDF: &str = "application/pdf";
/// MIME type Drive uses for folders.
pub const MIME_FOLDER: &str = "application/vnd.google-apps.folder";

/// What a listed Drive child is, as far as the walker is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A leaf of the recognized document type.
    Document,
    /// A sub-folder to recurse into.
    Folder,
    /// Anything else (images, shortcuts, docs). Ignored.
    Other,
}

/// Raw child entry produced by a file store listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub web_view_link: Option<String>,
    pub web_content_link: Option<String>,
    /// Absent when the store reported no usable timestamp.
    pub modified_time: Option<DateTime<Utc>>,
    pub size: Option<u64>,
}

impl DriveItem {
    pub fn kind(&self) -> ItemKind {
        match self.mime_type.as_str() {
            MIME_PDF => ItemKind::Document,
            MIME_FOLDER => ItemKind::Folder,
            _ => ItemKind::Other,
        }
    }
}

/// A document yielded by the tree walker, tagged with the folder path it
/// was found under (e.g. `Nenamaga/Grade 6/Science/English`).
#[derive(Debug, Clone, PartialEq)]
pub struct WalkedDocument {
    pub item: DriveItem,
    pub folder_path: String,
}

impl WalkedDocument {
    /// Full path of the file itself, used in error reports.
    pub fn full_path(&self) -> String {
        format!("{}/{}", self.folder_path, self.item.name)
    }
}

/// Manually supplied metadata for a single file, keyed by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Override {
    pub exam_type: Option<String>,
    pub custom_title: Option<String>,
    pub notes: Option<String>,
}

/// One catalog entry. Field names and optionality match `papers.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub grade: u32,
    pub subject: String,
    pub medium: String,
    pub year: i32,
    pub term: u32,
    pub exam_type: String,
    pub title: String,
    pub pdf_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub added_date: NaiveDate,
}
