//! Sitemap generation.
//!
//! Derives `sitemap.xml` from the catalog: the fixed site pages, one page
//! per grade present in the catalog (ascending) and one page per paper in
//! catalog order, dated by the paper's `addedDate`.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::escape::escape;
use std::collections::BTreeSet;
use std::path::Path;

use crate::catalog::read_catalog;
use crate::config::Config;
use crate::models::Record;

pub const CONTENT_TYPE: &str = "application/xml";
pub const CACHE_CONTROL: &str = "public, max-age=3600";

/// A fixed page of the site.
struct StaticPage {
    path: &'static str,
    changefreq: &'static str,
    priority: &'static str,
}

const STATIC_PAGES: &[StaticPage] = &[
    StaticPage { path: "/", changefreq: "daily", priority: "1.0" },
    StaticPage { path: "/about", changefreq: "monthly", priority: "0.8" },
    StaticPage { path: "/contact", changefreq: "monthly", priority: "0.8" },
    StaticPage { path: "/privacy-policy", changefreq: "yearly", priority: "0.5" },
    StaticPage { path: "/disclaimer", changefreq: "yearly", priority: "0.5" },
    StaticPage { path: "/dmca", changefreq: "yearly", priority: "0.5" },
];

fn push_url(out: &mut String, loc: &str, lastmod: &str, changefreq: &str, priority: &str) {
    out.push_str("  <url>\n");
    out.push_str(&format!("    <loc>{}</loc>\n", escape(loc)));
    out.push_str(&format!("    <lastmod>{}</lastmod>\n", escape(lastmod)));
    out.push_str(&format!("    <changefreq>{}</changefreq>\n", changefreq));
    out.push_str(&format!("    <priority>{}</priority>\n", priority));
    out.push_str("  </url>\n");
}

/// Render the sitemap. `now` dates the static and grade pages.
pub fn render_sitemap(records: &[Record], base_url: &str, now: DateTime<Utc>) -> String {
    let base = base_url.trim_end_matches('/');
    let now = now.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    for page in STATIC_PAGES {
        let loc = format!("{}{}", base, page.path);
        push_url(&mut out, &loc, &now, page.changefreq, page.priority);
    }

    let grades: BTreeSet<u32> = records.iter().map(|r| r.grade).collect();
    for grade in grades {
        let loc = format!("{}/grade/{}", base, grade);
        push_url(&mut out, &loc, &now, "weekly", "0.9");
    }

    for record in records {
        let loc = format!("{}/paper/{}", base, record.id);
        let lastmod = record.added_date.format("%Y-%m-%d").to_string();
        push_url(&mut out, &loc, &lastmod, "monthly", "0.7");
    }

    out.push_str("</urlset>\n");
    out
}

/// Run the sitemap command: render from the persisted catalog to a file or
/// stdout.
pub fn run_sitemap(config: &Config, output: Option<&Path>) -> Result<()> {
    let records = read_catalog(&config.catalog.output)?;
    let xml = render_sitemap(&records, &config.site.base_url, Utc::now());

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, &xml)
                .with_context(|| format!("Failed to write sitemap: {}", path.display()))?;
            eprintln!(
                "Wrote sitemap with {} paper URLs to {}",
                records.len(),
                path.display()
            );
        }
        None => {
            print!("{}", xml);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn record(id: &str, grade: u32, day: u32) -> Record {
        Record {
            id: id.to_string(),
            grade,
            subject: "Science".to_string(),
            medium: "English".to_string(),
            year: 2023,
            term: 1,
            exam_type: "School Term Test".to_string(),
            title: String::new(),
            pdf_url: String::new(),
            download_url: None,
            file_size: None,
            notes: None,
            added_date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn lists_static_grade_and_paper_pages() {
        let records = vec![record("g10-a", 10, 2), record("g6-b", 6, 1), record("g6-c", 6, 1)];
        let xml = render_sitemap(&records, "https://papers.test/", now());

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(xml.matches("<url>").count(), 6 + 2 + 3);
        assert!(xml.contains("<loc>https://papers.test/</loc>"));
        assert!(xml.contains("<loc>https://papers.test/dmca</loc>"));
        assert!(xml.contains("<lastmod>2024-03-01T12:00:00.000Z</lastmod>"));

        let g6 = xml.find("/grade/6<").unwrap();
        let g10 = xml.find("/grade/10<").unwrap();
        assert!(g6 < g10, "grades ascending");

        assert!(xml.contains(
            "<loc>https://papers.test/paper/g10-a</loc>\n    <lastmod>2024-02-02</lastmod>"
        ));
    }

    #[test]
    fn ids_are_escaped() {
        let xml = render_sitemap(&[record("g6-r&d", 6, 1)], "https://papers.test", now());
        assert!(xml.contains("/paper/g6-r&amp;d</loc>"));
    }

    #[test]
    fn empty_catalog_has_only_static_pages() {
        let xml = render_sitemap(&[], "https://papers.test", now());
        assert_eq!(xml.matches("<url>").count(), STATIC_PAGES.len());
        assert!(!xml.contains("/grade/"));
    }
}
