//! Configuration loading.
//!
//! Settings come from an optional TOML file, then environment variables
//! override the values the deployment pipeline injects (`FOLDER_ID`,
//! `SPREADSHEET_ID`, `SITE_URL`). Credentials are never stored in the file;
//! see [`crate::auth`].
//!
//! ```toml
//! [drive]
//! root_folder_id = "1AbC..."
//! root_label = "Nenamaga"
//!
//! [sheet]
//! spreadsheet_id = "1XyZ..."
//! range = "Papers!A2:D"
//!
//! [catalog]
//! output = "src/data/papers.json"
//!
//! [site]
//! base_url = "https://nenamaga-website.pages.dev"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_FOLDER_ID: &str = "FOLDER_ID";
pub const ENV_SPREADSHEET_ID: &str = "SPREADSHEET_ID";
pub const ENV_SITE_URL: &str = "SITE_URL";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub drive: DriveConfig,
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DriveConfig {
    /// Folder whose tree holds the papers. Required for `fetch`.
    #[serde(default)]
    pub root_folder_id: Option<String>,
    /// Label used as the first path segment for the root folder.
    #[serde(default = "default_root_label")]
    pub root_label: String,
    /// Sort each folder's children by name before walking it, making
    /// same-day ordering in the catalog reproducible.
    #[serde(default)]
    pub sort_children: bool,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_drive_api")]
    pub api_base: String,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            root_folder_id: None,
            root_label: default_root_label(),
            sort_children: false,
            page_size: default_page_size(),
            api_base: default_drive_api(),
        }
    }
}

fn default_root_label() -> String {
    "Nenamaga".to_string()
}
fn default_page_size() -> u32 {
    1000
}
fn default_drive_api() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SheetConfig {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    /// A1 range holding `filename, examType, title, notes` rows.
    #[serde(default = "default_range")]
    pub range: String,
    #[serde(default = "default_sheets_api")]
    pub api_base: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            range: default_range(),
            api_base: default_sheets_api(),
        }
    }
}

fn default_range() -> String {
    "Papers!A2:D".to_string()
}
fn default_sheets_api() -> String {
    "https://sheets.googleapis.com/v4".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_exam_type")]
    pub default_exam_type: String,
    /// Medium whose name is left out of generated titles.
    #[serde(default = "default_medium")]
    pub default_medium: String,
    /// How many error entries the run report prints before summarizing.
    #[serde(default = "default_max_reported_errors")]
    pub max_reported_errors: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            default_exam_type: default_exam_type(),
            default_medium: default_medium(),
            max_reported_errors: default_max_reported_errors(),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("src/data/papers.json")
}
fn default_exam_type() -> String {
    "School Term Test".to_string()
}
fn default_medium() -> String {
    "English".to_string()
}
fn default_max_reported_errors() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://nenamaga-website.pages.dev".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:4321".to_string()
}

impl Config {
    /// All defaults, no file. Used when the default config path is absent.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Overlay environment variables. `lookup` is `std::env::var` in
    /// production and a map in tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = non_blank(lookup(ENV_FOLDER_ID)) {
            self.drive.root_folder_id = Some(id);
        }
        if let Some(id) = non_blank(lookup(ENV_SPREADSHEET_ID)) {
            self.sheet.spreadsheet_id = Some(id);
        }
        if let Some(url) = non_blank(lookup(ENV_SITE_URL)) {
            self.site.base_url = url;
        }
    }

    /// The configured root folder, or a configuration error.
    pub fn root_folder_id(&self) -> Result<&str> {
        match self.drive.root_folder_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => bail!(
                "{} environment variable (or drive.root_folder_id) is required",
                ENV_FOLDER_ID
            ),
        }
    }

    /// The configured spreadsheet, if any.
    pub fn spreadsheet_id(&self) -> Option<&str> {
        self.sheet
            .spreadsheet_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Value checks shared by the file and the environment overlay. Run again
    /// after [`Config::apply_env`].
    pub fn validate(&self) -> Result<()> {
        if self.drive.root_label.trim().is_empty() {
            bail!("drive.root_label must not be empty");
        }
        if self.catalog.default_exam_type.trim().is_empty() {
            bail!("catalog.default_exam_type must not be empty");
        }
        let url = self.site.base_url.as_str();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!(
                "site.base_url (or {}) must be an http(s) URL, got '{}'",
                ENV_SITE_URL,
                url
            );
        }
        Ok(())
    }

    /// Checks that must pass before `fetch` performs any I/O.
    pub fn validate_for_fetch(&self) -> Result<()> {
        self.root_folder_id()?;
        if self.drive.page_size == 0 || self.drive.page_size > 1000 {
            bail!("drive.page_size must be in 1..=1000");
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}

/// Load `path` if it exists; a missing file is only acceptable when the
/// caller did not ask for it explicitly.
pub fn load_config_or_minimal(path: &Path, explicit: bool) -> Result<Config> {
    if !explicit && !path.exists() {
        return Ok(Config::minimal());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn minimal_has_site_defaults() {
        let cfg = Config::minimal();
        assert_eq!(cfg.drive.root_label, "Nenamaga");
        assert_eq!(cfg.sheet.range, "Papers!A2:D");
        assert_eq!(cfg.catalog.default_exam_type, "School Term Test");
        assert_eq!(cfg.catalog.default_medium, "English");
        assert_eq!(cfg.catalog.max_reported_errors, 10);
    }

    #[test]
    fn missing_folder_id_is_fatal() {
        let cfg = Config::minimal();
        let err = cfg.validate_for_fetch().unwrap_err();
        assert!(err.to_string().contains("FOLDER_ID"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg: Config = toml::from_str(
            r#"
            [drive]
            root_folder_id = "from-file"
            "#,
        )
        .unwrap();
        cfg.apply_env(env(&[("FOLDER_ID", "from-env"), ("SPREADSHEET_ID", "  ")]));
        assert_eq!(cfg.root_folder_id().unwrap(), "from-env");
        assert_eq!(cfg.spreadsheet_id(), None);
        assert!(cfg.validate_for_fetch().is_ok());
    }

    #[test]
    fn blank_env_does_not_clear_file_value() {
        let mut cfg = Config::minimal();
        cfg.sheet.spreadsheet_id = Some("sheet-1".to_string());
        cfg.apply_env(env(&[("SPREADSHEET_ID", "")]));
        assert_eq!(cfg.spreadsheet_id(), Some("sheet-1"));
    }

    #[test]
    fn load_rejects_bad_base_url() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nenamaga.toml");
        std::fs::write(&path, "[site]\nbase_url = \"ftp://example.org\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn site_url_from_env_is_validated() {
        let mut cfg = Config::minimal();
        cfg.apply_env(env(&[("SITE_URL", "papers.example.org")]));
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("SITE_URL"));

        cfg.apply_env(env(&[("SITE_URL", "https://papers.example.org")]));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_default_file_falls_back() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("absent.toml");
        assert!(load_config_or_minimal(&path, false).is_ok());
        assert!(load_config_or_minimal(&path, true).is_err());
    }
}
