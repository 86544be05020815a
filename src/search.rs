//! Incremental catalog search.
//!
//! The same filter the site's search box runs on every keystroke: a plain
//! case-insensitive substring match over a few record fields, first ten
//! hits in catalog order, no ranking. Queries shorter than two characters
//! (after trimming) do not search at all, which is reported as
//! [`SearchOutcome::Inactive`] rather than as an empty match list.

use anyhow::Result;
use serde::Serialize;

use crate::catalog::read_catalog;
use crate::config::Config;
use crate::models::Record;

/// Trimmed queries shorter than this (in UTF-16 code units, as the browser
/// measures string length) do not search.
pub const MIN_QUERY_CHARS: usize = 2;
/// Maximum number of hits returned.
pub const MAX_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<'a> {
    /// Query too short; nothing was searched.
    Inactive,
    /// Hits in catalog order, possibly none.
    Matches(Vec<&'a Record>),
}

impl<'a> SearchOutcome<'a> {
    pub fn is_active(&self) -> bool {
        matches!(self, SearchOutcome::Matches(_))
    }

    pub fn records(&self) -> &[&'a Record] {
        match self {
            SearchOutcome::Inactive => &[],
            SearchOutcome::Matches(hits) => hits,
        }
    }
}

/// Does `record` contain the (already lowercased) needle in any searched
/// field?
fn record_matches(record: &Record, needle: &str) -> bool {
    record.title.to_lowercase().contains(needle)
        || record.subject.to_lowercase().contains(needle)
        || record.grade.to_string().contains(needle)
        || record.year.to_string().contains(needle)
        || record.medium.to_lowercase().contains(needle)
}

/// Filter `records` by `query`.
///
/// The length gate looks at the trimmed query, but the match itself uses
/// the query as typed (lowercased), so a trailing space narrows results the
/// same way it does in the browser.
pub fn search_catalog<'a>(records: &'a [Record], query: &str) -> SearchOutcome<'a> {
    if query.trim().encode_utf16().count() < MIN_QUERY_CHARS {
        return SearchOutcome::Inactive;
    }
    let needle = query.to_lowercase();
    SearchOutcome::Matches(
        records
            .iter()
            .filter(|r| record_matches(r, &needle))
            .take(MAX_RESULTS)
            .collect(),
    )
}

/// JSON shape shared by `nenamaga search --json` and `GET /search`.
#[derive(Debug, Serialize)]
pub struct SearchResponse<'a> {
    pub query: &'a str,
    pub active: bool,
    pub results: Vec<&'a Record>,
}

impl<'a> SearchResponse<'a> {
    pub fn new(query: &'a str, outcome: SearchOutcome<'a>) -> Self {
        let active = outcome.is_active();
        let results = match outcome {
            SearchOutcome::Inactive => Vec::new(),
            SearchOutcome::Matches(hits) => hits,
        };
        Self {
            query,
            active,
            results,
        }
    }
}

/// Run the search command over the persisted catalog.
pub fn run_search(config: &Config, query: &str, json: bool) -> Result<()> {
    let records = read_catalog(&config.catalog.output)?;
    let outcome = search_catalog(&records, query);

    if json {
        let response = SearchResponse::new(query, outcome);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    match outcome {
        SearchOutcome::Inactive => {
            println!(
                "Type at least {} characters to search.",
                MIN_QUERY_CHARS
            );
        }
        SearchOutcome::Matches(hits) if hits.is_empty() => {
            println!("No papers found. Try a different search term.");
        }
        SearchOutcome::Matches(hits) => {
            for (i, r) in hits.iter().enumerate() {
                println!("{}. {}", i + 1, r.title);
                println!(
                    "    Grade {} • {} • {} • {}",
                    r.grade, r.subject, r.year, r.medium
                );
                println!("    /paper/{}", r.id);
            }
        }
    }
    Ok(())
}
