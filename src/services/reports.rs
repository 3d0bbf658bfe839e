// src/services/reports.rs

//! Regional trail-report service.
//!
//! Queries one listing page per configured region, all regions at once,
//! and keeps the reports whose location matches the allowlist. Duplicate
//! locations across regions keep the report with the latest parseable
//! date.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use futures::future;
use reqwest::Client;
use scraper::{ElementRef, Html};

use crate::error::Result;
use crate::models::{Config, TrailReport};
use crate::utils::http;
use crate::utils::retry::with_retry_config;
use crate::utils::{normalize_whitespace, parse_report_date};

use super::parse_selector;

/// A report paired with its parsed comparison date.
///
/// The date exists only to pick the newest of duplicate locations and is
/// dropped before the report reaches the published document.
#[derive(Debug, Clone)]
struct DatedReport {
    report: TrailReport,
    date: Option<NaiveDate>,
}

/// Service for fetching regional trail reports.
pub struct TrailReportService {
    config: Arc<Config>,
    client: Client,
}

impl TrailReportService {
    /// Create a new trail-report service with the given configuration.
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }

    /// Fetch all regions concurrently and merge their reports.
    ///
    /// A failed region is logged and contributes nothing; region results
    /// are collected independently and merged sequentially afterwards, so
    /// no map is mutated from concurrent handlers.
    pub async fn fetch_all(&self) -> BTreeMap<String, TrailReport> {
        let reports = &self.config.reports;
        let year = Local::now().year();

        let fetches = reports.regions.iter().map(|region| {
            let url = reports.url_template.replace("{region}", region);
            async move {
                let label = format!("trail reports {}", region);
                let fetch = &self.config.fetch;
                let result = with_retry_config(
                    &label,
                    fetch.max_attempts,
                    Duration::from_secs(fetch.retry_base_secs),
                    || http::fetch_text(&self.client, &url),
                )
                .await;
                (region.as_str(), result)
            }
        });

        let mut merged: BTreeMap<String, DatedReport> = BTreeMap::new();
        for (region, result) in future::join_all(fetches).await {
            let html = match result {
                Ok(html) => html,
                Err(error) => {
                    log::warn!("Trail reports for region {} failed: {}", region, error);
                    continue;
                }
            };
            match parse_region(&html, &reports.heading_selector, &reports.locations, year) {
                Ok(entries) => {
                    for entry in entries {
                        merge_report(&mut merged, entry);
                    }
                }
                Err(error) => {
                    log::warn!("Trail reports for region {} unparseable: {}", region, error);
                }
            }
        }

        merged
            .into_iter()
            .map(|(location, dated)| (location, dated.report))
            .collect()
    }
}

/// Merge one report into the accumulated map, keyed by the raw matched
/// location segment.
///
/// An existing entry is replaced only when both dates parsed and the new
/// one is strictly later; unknown recency never wins.
fn merge_report(map: &mut BTreeMap<String, DatedReport>, incoming: DatedReport) {
    let replace = match map.get(&incoming.report.location) {
        Some(existing) => {
            matches!((existing.date, incoming.date), (Some(old), Some(new)) if new > old)
        }
        None => true,
    };
    if replace {
        map.insert(incoming.report.location.clone(), incoming);
    }
}

/// Extract allowlisted reports from one region page.
///
/// Each heading's text splits on the first ':' into a date segment and a
/// location segment; headings without that shape are skipped. The report
/// body is the first following paragraph.
fn parse_region(
    html: &str,
    heading_selector: &str,
    locations: &[String],
    year: i32,
) -> Result<Vec<DatedReport>> {
    let document = Html::parse_document(html);
    let heading_sel = parse_selector(heading_selector)?;

    let mut entries = Vec::new();
    for heading in document.select(&heading_sel) {
        let text = normalize_whitespace(&heading.text().collect::<String>());
        let Some((date_part, location_part)) = text.split_once(':') else {
            continue;
        };
        let location = location_part.trim();
        if !matches_location(location, locations) {
            continue;
        }

        entries.push(DatedReport {
            date: parse_report_date(date_part, year),
            report: TrailReport {
                location: location.to_string(),
                updated: date_part.trim().to_string(),
                report: following_paragraph(&heading).unwrap_or_default(),
            },
        });
    }
    Ok(entries)
}

/// Case-insensitive substring match against the allowlist.
fn matches_location(segment: &str, locations: &[String]) -> bool {
    let lower = segment.to_lowercase();
    locations.iter().any(|loc| lower.contains(&loc.to_lowercase()))
}

/// Text of the first `<p>` element following the heading, if any.
fn following_paragraph(heading: &ElementRef) -> Option<String> {
    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "p")
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGION_HTML: &str = r#"
        <html><body>
        <h3>Tue, Jan 14: Nubs Nob - XC</h3>
        <p>Groomed this morning. Classic tracks set, skating lane firm.</p>
        <h3>Mon, Jan 13: Avalanche Preserve</h3>
        <p>Thin cover on the south loop.</p>
        <h3>Community meeting notes</h3>
        <p>Not a trail report.</p>
        <h3>Sun, Jan 12: Somewhere Else</h3>
        <p>Unlisted trail system.</p>
        </body></html>
    "#;

    fn allowlist() -> Vec<String> {
        vec!["Nubs Nob".to_string(), "Avalanche Preserve".to_string()]
    }

    fn report(location: &str, updated: &str, year: i32) -> DatedReport {
        DatedReport {
            date: parse_report_date(updated, year),
            report: TrailReport {
                location: location.to_string(),
                updated: updated.to_string(),
                report: "body".to_string(),
            },
        }
    }

    #[test]
    fn test_parse_region_filters_and_extracts() {
        let entries = parse_region(REGION_HTML, "h3", &allowlist(), 2025).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].report.location, "Nubs Nob - XC");
        assert_eq!(entries[0].report.updated, "Tue, Jan 14");
        assert_eq!(
            entries[0].report.report,
            "Groomed this morning. Classic tracks set, skating lane firm."
        );
        assert_eq!(
            entries[0].date,
            Some(NaiveDate::from_ymd_opt(2025, 1, 14).unwrap())
        );
        assert_eq!(entries[1].report.location, "Avalanche Preserve");
    }

    #[test]
    fn test_parse_region_skips_headings_without_colon() {
        let entries = parse_region(REGION_HTML, "h3", &allowlist(), 2025).unwrap();
        assert!(entries.iter().all(|e| e.report.location != "Community meeting notes"));
    }

    #[test]
    fn test_merge_keeps_latest_in_either_order() {
        let older = report("Nubs Nob - XC", "Mon, Jan 13", 2025);
        let newer = report("Nubs Nob - XC", "Tue, Jan 14", 2025);

        let mut map = BTreeMap::new();
        merge_report(&mut map, older.clone());
        merge_report(&mut map, newer.clone());
        assert_eq!(map["Nubs Nob - XC"].report.updated, "Tue, Jan 14");

        let mut map = BTreeMap::new();
        merge_report(&mut map, newer);
        merge_report(&mut map, older);
        assert_eq!(map["Nubs Nob - XC"].report.updated, "Tue, Jan 14");
    }

    #[test]
    fn test_merge_unparseable_date_never_replaces() {
        let existing = report("Nubs Nob - XC", "Mon, Jan 13", 2025);
        let undated = report("Nubs Nob - XC", "sometime last week", 2025);
        assert!(undated.date.is_none());

        let mut map = BTreeMap::new();
        merge_report(&mut map, existing.clone());
        merge_report(&mut map, undated.clone());
        assert_eq!(map["Nubs Nob - XC"].report.updated, "Mon, Jan 13");

        // An undated existing entry is also kept over a dated newcomer
        let mut map = BTreeMap::new();
        merge_report(&mut map, undated);
        merge_report(&mut map, existing);
        assert_eq!(map["Nubs Nob - XC"].report.updated, "sometime last week");
    }

    #[tokio::test]
    async fn test_fetch_all_survives_failing_regions() {
        let mut config = Config::default();
        config.reports.url_template = "::not-a-url::{region}".to_string();
        config.fetch.retry_base_secs = 0;
        let service = TrailReportService::new(Arc::new(config), reqwest::Client::new());

        let reports = service.fetch_all().await;
        assert!(reports.is_empty());
    }
}
