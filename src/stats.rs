//! Catalog summary.
//!
//! Counts papers per grade, subject and medium. Printed at the end of a
//! fetch and by `nenamaga stats`, which reads the persisted catalog.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::Config;
use crate::models::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub total_papers: usize,
    pub last_updated: DateTime<Utc>,
    pub by_grade: BTreeMap<u32, usize>,
    pub by_subject: BTreeMap<String, usize>,
    pub by_medium: BTreeMap<String, usize>,
}

/// Reduce a catalog to its frequency tables.
pub fn summarize(records: &[Record], now: DateTime<Utc>) -> CatalogSummary {
    let mut summary = CatalogSummary {
        total_papers: records.len(),
        last_updated: now,
        by_grade: BTreeMap::new(),
        by_subject: BTreeMap::new(),
        by_medium: BTreeMap::new(),
    };
    for r in records {
        *summary.by_grade.entry(r.grade).or_insert(0) += 1;
        *summary.by_subject.entry(r.subject.clone()).or_insert(0) += 1;
        *summary.by_medium.entry(r.medium.clone()).or_insert(0) += 1;
    }
    summary
}

fn join_keys<K: ToString>(keys: impl Iterator<Item = K>) -> String {
    keys.map(|k| k.to_string()).collect::<Vec<_>>().join(", ")
}

/// The short summary block of the fetch report.
pub fn print_summary(summary: &CatalogSummary) {
    println!("Summary:");
    println!("  Total:    {} papers", summary.total_papers);
    println!("  Grades:   {}", join_keys(summary.by_grade.keys()));
    println!("  Subjects: {}", join_keys(summary.by_subject.keys()));
    println!("  Mediums:  {}", join_keys(summary.by_medium.keys()));
}

fn print_table<K: ToString>(heading: &str, rows: impl Iterator<Item = (K, usize)>) {
    println!();
    println!("  By {}:", heading);
    for (key, count) in rows {
        println!("  {:<28} {:>6}", key.to_string(), count);
    }
}

/// Run the stats command over the persisted catalog.
pub fn run_stats(config: &Config, json: bool) -> Result<()> {
    let path = &config.catalog.output;
    let records = crate::catalog::read_catalog(path)?;
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());
    let summary = summarize(&records, modified);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Nenamaga — Catalog Stats");
    println!("========================");
    println!();
    println!("  Catalog:     {}", path.display());
    println!(
        "  Updated:     {}",
        summary.last_updated.format("%Y-%m-%d %H:%M")
    );
    println!("  Papers:      {}", summary.total_papers);

    print_table("grade", summary.by_grade.iter().map(|(g, n)| (format!("Grade {}", g), *n)));
    print_table("subject", summary.by_subject.iter().map(|(s, n)| (s, *n)));
    print_table("medium", summary.by_medium.iter().map(|(m, n)| (m, *n)));
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(grade: u32, subject: &str, medium: &str) -> Record {
        Record {
            id: format!("g{}-{}", grade, subject),
            grade,
            subject: subject.to_string(),
            medium: medium.to_string(),
            year: 2023,
            term: 1,
            exam_type: "School Term Test".to_string(),
            title: String::new(),
            pdf_url: String::new(),
            download_url: None,
            file_size: None,
            notes: None,
            added_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn counts_each_dimension() {
        let records = vec![
            record(10, "Science", "English"),
            record(6, "Science", "Sinhala"),
            record(6, "Maths", "Sinhala"),
        ];
        let s = summarize(&records, Utc::now());
        assert_eq!(s.total_papers, 3);
        assert_eq!(s.by_grade.get(&6), Some(&2));
        assert_eq!(s.by_grade.get(&10), Some(&1));
        assert_eq!(s.by_subject.get("Science"), Some(&2));
        assert_eq!(s.by_medium.get("Sinhala"), Some(&2));
    }

    #[test]
    fn grades_are_numerically_ordered() {
        let records = vec![record(10, "A", "E"), record(2, "A", "E"), record(6, "A", "E")];
        let s = summarize(&records, Utc::now());
        assert_eq!(join_keys(s.by_grade.keys()), "2, 6, 10");
    }

    #[test]
    fn empty_catalog() {
        let s = summarize(&[], Utc::now());
        assert_eq!(s.total_papers, 0);
        assert!(s.by_grade.is_empty() && s.by_subject.is_empty() && s.by_medium.is_empty());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let s = summarize(&[record(6, "Science", "English")], Utc::now());
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["totalPapers"], 1);
        assert_eq!(v["byGrade"]["6"], 1);
        assert_eq!(v["bySubject"]["Science"], 1);
    }
}
