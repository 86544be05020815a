//! Google Sheets connector.
//!
//! Implements [`SheetSource`] with the Sheets v4 `spreadsheets.values.get`
//! endpoint. Only formatted string values are read; the sheet is expected
//! to hold `filename, examType, title, notes` rows.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::TokenProvider;
use crate::config::SheetConfig;
use crate::traits::SheetSource;

pub struct SheetsConnector {
    api_base: String,
    tokens: Arc<TokenProvider>,
    client: reqwest::Client,
}

impl SheetsConnector {
    pub fn new(config: &SheetConfig, tokens: Arc<TokenProvider>) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            tokens,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[async_trait]
impl SheetSource for SheetsConnector {
    async fn read_range(&self, sheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let token = self.tokens.access_token().await?;
        let url = format!(
            "{}/spreadsheets/{}/values/{}",
            self.api_base,
            path_encode(sheet_id),
            path_encode(range)
        );

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .query(&[("majorDimension", "ROWS")])
            .send()
            .await
            .with_context(|| format!("Failed to read sheet range {}", range))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!(
                "Sheets values.get failed (HTTP {}): {}",
                status,
                body.chars().take(500).collect::<String>()
            );
        }

        let data: ValueRange = resp.json().await.context("Malformed Sheets response")?;
        Ok(rows_to_strings(data.values))
    }
}

fn rows_to_strings(values: Vec<Vec<serde_json::Value>>) -> Vec<Vec<String>> {
    values
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

/// Percent-encode a single URL path segment (RFC 3986 unreserved set kept).
fn path_encode(s: &str) -> String {
    let mut result = String::new();
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                result.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_a1_range() {
        assert_eq!(path_encode("Papers!A2:D"), "Papers%21A2%3AD");
        assert_eq!(path_encode("My Sheet!A:B"), "My%20Sheet%21A%3AB");
    }

    #[test]
    fn non_string_cells_are_stringified() {
        let data: ValueRange = serde_json::from_str(
            r#"{"range":"Papers!A2:D","majorDimension":"ROWS","values":[["a.pdf", 3, null],["b.pdf"]]}"#,
        )
        .unwrap();
        let rows = rows_to_strings(data.values);
        assert_eq!(rows[0], vec!["a.pdf", "3", ""]);
        assert_eq!(rows[1], vec!["b.pdf"]);
    }

    #[test]
    fn empty_range_has_no_values_key() {
        let data: ValueRange = serde_json::from_str(r#"{"range":"Papers!A2:D"}"#).unwrap();
        assert!(rows_to_strings(data.values).is_empty());
    }
}
