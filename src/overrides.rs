//! Manual metadata overrides.
//!
//! Editors can correct or enrich auto-derived metadata in a spreadsheet.
//! Each row is `filename, examType, title, notes`; the file name is the
//! key and every other cell is optional. Loading never fails the run: no
//! spreadsheet, or an unreachable one, just means no overrides.

use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::Override;
use crate::traits::SheetSource;

/// File name → override. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct OverrideStore {
    entries: HashMap<String, Override>,
}

impl OverrideStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the store from sheet rows.
    ///
    /// Rows with an empty first cell are skipped. Keys and values are
    /// trimmed and blank cells count as absent. A blank exam type falls back
    /// to `default_exam_type`. When a file name appears twice, the later row
    /// wins.
    pub fn from_rows(rows: &[Vec<String>], default_exam_type: &str) -> Self {
        let mut entries = HashMap::new();
        for (index, row) in rows.iter().enumerate() {
            let Some(name) = row.first().map(|c| c.trim()).filter(|c| !c.is_empty()) else {
                continue;
            };
            let cell = |i: usize| {
                row.get(i)
                    .map(|c| c.trim())
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
            };
            let entry = Override {
                exam_type: Some(cell(1).unwrap_or_else(|| default_exam_type.to_string())),
                custom_title: cell(2),
                notes: cell(3),
            };
            if entries.insert(name.to_string(), entry).is_some() {
                warn!(file = name, row = index, "duplicate override row, keeping the later one");
            }
        }
        Self { entries }
    }

    /// Exact-match lookup by file display name.
    pub fn get(&self, file_name: &str) -> Option<&Override> {
        self.entries.get(file_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load overrides from the configured spreadsheet, degrading to an empty
/// store when none is configured or the read fails.
pub async fn load_overrides(config: &Config, source: Option<&dyn SheetSource>) -> OverrideStore {
    let (Some(sheet_id), Some(source)) = (config.spreadsheet_id(), source) else {
        info!("no spreadsheet configured, using auto-generated metadata only");
        return OverrideStore::empty();
    };

    match source.read_range(sheet_id, &config.sheet.range).await {
        Ok(rows) => {
            let store = OverrideStore::from_rows(&rows, &config.catalog.default_exam_type);
            info!(entries = store.len(), "loaded manual overrides");
            store
        }
        Err(e) => {
            warn!(error = %e, "could not read override spreadsheet (optional), continuing without it");
            OverrideStore::empty()
        }
    }
}
