//! Google Drive connector.
//!
//! Implements [`FileStore`] on top of the Drive v3 `files.list` endpoint.
//! Each call lists the non-trashed children of one folder and follows
//! `nextPageToken` until the folder is exhausted, so folders with more
//! than `page_size` entries are listed completely.
//!
//! # Request
//!
//! ```text
//! GET {api_base}/files
//!     ?q='<folder id>' in parents and trashed=false
//!     &fields=nextPageToken, files(id, name, mimeType, webViewLink, webContentLink, modifiedTime, size)
//!     &pageSize=1000
//! Authorization: Bearer <token>
//! ```
//!
//! Drive reports `size` as a decimal string and omits it for folders and
//! Google-native documents.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::auth::TokenProvider;
use crate::config::DriveConfig;
use crate::models::DriveItem;
use crate::traits::FileStore;

const LIST_FIELDS: &str =
    "nextPageToken, files(id, name, mimeType, webViewLink, webContentLink, modifiedTime, size)";

pub struct DriveConnector {
    api_base: String,
    page_size: u32,
    tokens: Arc<TokenProvider>,
    client: reqwest::Client,
}

impl DriveConnector {
    pub fn new(config: &DriveConfig, tokens: Arc<TokenProvider>) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            tokens,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl FileStore for DriveConnector {
    fn name(&self) -> &str {
        "drive"
    }

    async fn list_children(&self, folder_id: &str) -> Result<Vec<DriveItem>> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/files", self.api_base);
        let query = folder_query(folder_id);
        let page_size = self.page_size.to_string();

        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params: Vec<(&str, &str)> = vec![
                ("q", query.as_str()),
                ("fields", LIST_FIELDS),
                ("pageSize", page_size.as_str()),
            ];
            if let Some(ref t) = page_token {
                params.push(("pageToken", t.as_str()));
            }

            let resp = self
                .client
                .get(&url)
                .bearer_auth(&token)
                .query(&params)
                .send()
                .await
                .with_context(|| format!("Failed to list Drive folder {}", folder_id))?;

            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                bail!(
                    "Drive files.list failed (HTTP {}): {}",
                    status,
                    body.chars().take(500).collect::<String>()
                );
            }

            let page: FileList = resp
                .json()
                .await
                .with_context(|| format!("Malformed Drive listing for folder {}", folder_id))?;

            items.extend(page.files.into_iter().map(DriveFile::into_item));

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        Ok(items)
    }
}

/// Drive search query selecting the live children of a folder. Single
/// quotes and backslashes in the id are escaped as the query language
/// requires.
fn folder_query(folder_id: &str) -> String {
    let escaped = folder_id.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}' in parents and trashed=false", escaped)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    mime_type: String,
    #[serde(default)]
    web_view_link: Option<String>,
    #[serde(default)]
    web_content_link: Option<String>,
    #[serde(default)]
    modified_time: Option<String>,
    #[serde(default)]
    size: Option<String>,
}

impl DriveFile {
    /// Never fails: an entry with a missing or unparseable `modifiedTime`
    /// keeps `None` so the rest of the folder is still listed.
    fn into_item(self) -> DriveItem {
        let modified_time = match self.modified_time.as_deref() {
            Some(raw) => match DateTime::parse_from_rfc3339(raw) {
                Ok(t) => Some(t.with_timezone(&Utc)),
                Err(e) => {
                    warn!(
                        file = %self.id,
                        name = %self.name,
                        value = raw,
                        error = %e,
                        "bad modifiedTime on Drive file"
                    );
                    None
                }
            },
            None => None,
        };

        DriveItem {
            id: self.id,
            name: self.name,
            mime_type: self.mime_type,
            web_view_link: self.web_view_link.filter(|s| !s.is_empty()),
            web_content_link: self.web_content_link.filter(|s| !s.is_empty()),
            modified_time,
            size: self.size.and_then(|s| s.parse::<u64>().ok()),
        }
    }
}
