//! Path metadata extraction.
//!
//! Papers are filed in Drive as `<root>/Grade <n>/<Subject>/<Medium>/<file>.pdf`
//! and the file name carries the year and term (`2023_Term1_Test.pdf`,
//! `Term2_2022.pdf`). This module turns a folder path and file name into a
//! [`PaperKey`], or a [`Rejection`] saying why the document cannot be placed.
//!
//! Everything here is pure. The year fallback depends on "now", so the
//! caller passes the current year in; [`parse_file_name`] exposes the raw
//! hints so the fallback can be tested on its own.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Minimum number of non-empty path segments: root, grade, subject, medium.
pub const MIN_PATH_SEGMENTS: usize = 4;
/// Term assumed when the file name has no `Term<n>` token.
pub const DEFAULT_TERM: u32 = 1;

/// Why a document could not be turned into a catalog key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("expected at least 4 path segments, found {found}")]
    TooFewSegments { found: usize },
    #[error("segment '{segment}' is not a grade folder")]
    NoGrade { segment: String },
    #[error("{0} is empty")]
    MissingField(&'static str),
}

/// Year and term as they appear in a file name, before defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileNameHints {
    pub year: Option<i32>,
    pub term: Option<u32>,
}

impl FileNameHints {
    pub fn year_or(&self, current_year: i32) -> i32 {
        self.year.unwrap_or(current_year)
    }

    pub fn term_or_default(&self) -> u32 {
        self.term.unwrap_or(DEFAULT_TERM)
    }
}

/// Canonical key of a paper: everything derivable from where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperKey {
    pub id: String,
    pub grade: u32,
    pub subject: String,
    pub medium: String,
    pub year: i32,
    pub term: u32,
}

fn grade_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Grade\s+([0-9]+)").expect("valid grade regex"))
}

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]{4}").expect("valid year regex"))
}

fn term_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Term\s*([0-9]+)").expect("valid term regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Pull the year (first run of four digits) and term (`Term<n>`, any case)
/// out of a file name.
pub fn parse_file_name(file_name: &str) -> FileNameHints {
    let year = year_re()
        .find(file_name)
        .and_then(|m| m.as_str().parse::<i32>().ok());
    let term = term_re()
        .captures(file_name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());
    FileNameHints { year, term }
}

/// Extract the grade number from a folder name such as `Grade 11`.
pub fn parse_grade(segment: &str) -> Option<u32> {
    grade_re()
        .captures(segment)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Build the paper id, e.g. `g11-combined-maths-2023-t1-si`.
pub fn paper_id(grade: u32, subject: &str, year: i32, term: u32, medium: &str) -> String {
    let subject_slug = whitespace_re()
        .replace_all(&subject.to_lowercase(), "-")
        .into_owned();
    let medium_code: String = medium.to_lowercase().chars().take(2).collect();
    format!(
        "g{}-{}-{}-t{}-{}",
        grade, subject_slug, year, term, medium_code
    )
}

/// Map a folder path and file name to a [`PaperKey`].
///
/// `current_year` is used when the file name carries no year.
pub fn parse_file_path(
    folder_path: &str,
    file_name: &str,
    current_year: i32,
) -> Result<PaperKey, Rejection> {
    let parts: Vec<&str> = folder_path.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() < MIN_PATH_SEGMENTS {
        return Err(Rejection::TooFewSegments { found: parts.len() });
    }

    let grade = parse_grade(parts[1]).ok_or_else(|| Rejection::NoGrade {
        segment: parts[1].to_string(),
    })?;
    let subject = parts[2];
    let medium = parts[3];

    if grade == 0 {
        return Err(Rejection::MissingField("grade"));
    }
    if subject.is_empty() {
        return Err(Rejection::MissingField("subject"));
    }
    if medium.is_empty() {
        return Err(Rejection::MissingField("medium"));
    }

    let hints = parse_file_name(file_name);
    let year = hints.year_or(current_year);
    let term = hints.term_or_default();

    Ok(PaperKey {
        id: paper_id(grade, subject, year, term, medium),
        grade,
        subject: subject.to_string(),
        medium: medium.to_string(),
        year,
        term,
    })
}
