// src/services/bulletins.rs

//! Park bulletin service.
//!
//! Extracts the relevant sections of each monitored park's panel on the
//! shared closures page. One fetch per park; a park's panel is located by
//! its configured selector and scanned for bolded lead-in phrases matching
//! that park's term list.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Html};

use crate::error::{AppError, Result};
use crate::models::{BulletinSection, Config, ParkBulletin, ParkRule};
use crate::utils::http;
use crate::utils::normalize_whitespace;
use crate::utils::retry::with_retry_config;

use super::parse_selector;

/// Service for fetching park bulletins.
pub struct BulletinService {
    config: Arc<Config>,
    client: Client,
}

impl BulletinService {
    /// Create a new bulletin service with the given configuration.
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }

    /// Fetch bulletins for all monitored parks.
    ///
    /// A failed park yields a degraded entry carrying the error text; its
    /// siblings are unaffected. Every configured park always has an entry.
    pub async fn fetch_all(&self) -> BTreeMap<String, ParkBulletin> {
        let mut bulletins = BTreeMap::new();
        for rule in &self.config.bulletins.parks {
            let bulletin = match self.fetch_park(rule).await {
                Ok(bulletin) => bulletin,
                Err(error) => {
                    log::warn!("Bulletin for {} failed: {}", rule.id, error);
                    ParkBulletin::unavailable(rule.id.clone(), error.to_string())
                }
            };
            bulletins.insert(rule.id.clone(), bulletin);
        }
        bulletins
    }

    /// Fetch and extract a single park's bulletin.
    async fn fetch_park(&self, rule: &ParkRule) -> Result<ParkBulletin> {
        let bulletins = &self.config.bulletins;
        let url = match &rule.fragment {
            Some(fragment) => format!("{}#{}", bulletins.page_url, fragment),
            None => bulletins.page_url.clone(),
        };

        let label = format!("bulletin {}", rule.id);
        let fetch = &self.config.fetch;
        let html = with_retry_config(
            &label,
            fetch.max_attempts,
            Duration::from_secs(fetch.retry_base_secs),
            || http::fetch_text(&self.client, &url),
        )
        .await?;

        parse_park(&html, rule, &bulletins.title_selector)
    }
}

/// Extract a park's bulletin from the fetched page.
fn parse_park(html: &str, rule: &ParkRule, title_selector: &str) -> Result<ParkBulletin> {
    let document = Html::parse_document(html);
    let panel_sel = parse_selector(&rule.panel_selector)?;
    let title_sel = parse_selector(title_selector)?;
    let strong_sel = parse_selector("strong, b")?;

    let panel = document.select(&panel_sel).next().ok_or_else(|| {
        AppError::fetch(
            rule.id.clone(),
            format!("panel {} not found", rule.panel_selector),
        )
    })?;

    let title = panel
        .select(&title_sel)
        .next()
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| rule.id.clone());

    let mut sections = Vec::new();
    for strong in panel.select(&strong_sel) {
        let heading = normalize_whitespace(&strong.text().collect::<String>());
        if heading.is_empty() || !matches_terms(&heading, &rule.terms) {
            continue;
        }

        let block = strong
            .parent()
            .and_then(ElementRef::wrap)
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default();

        sections.push(BulletinSection {
            content: strip_heading(&block, &heading),
            heading,
        });
    }

    Ok(ParkBulletin {
        park_id: rule.id.clone(),
        title,
        sections,
        error: None,
    })
}

/// A heading is relevant when any configured term is a case-insensitive
/// substring of it.
fn matches_terms(heading: &str, terms: &[String]) -> bool {
    let lower = heading.to_lowercase();
    terms.iter().any(|term| lower.contains(&term.to_lowercase()))
}

/// Remove the bolded prefix (and any separator left behind) from the
/// enclosing block's text.
fn strip_heading(block: &str, heading: &str) -> String {
    block
        .strip_prefix(heading)
        .unwrap_or(block)
        .trim_start_matches(':')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANEL_HTML: &str = r#"
        <html><body>
        <div id="pnlPark497" class="panel">
            <h3>Wilderness State Park</h3>
            <p><strong>Cross-country ski trails:</strong> Groomed weekly. Conditions fair to good.</p>
            <p><strong>Campground:</strong> Closed for the season.</p>
            <p><strong>Sturgeon Bay Trail:</strong> Open, not groomed.</p>
        </div>
        <div id="pnlPark446" class="panel">
            <h3>Petoskey State Park</h3>
            <p><strong>Old Baldy Trail:</strong> Icy near the overlook.</p>
            <p><strong>Beach house:</strong> Closed.</p>
        </div>
        </body></html>
    "#;

    fn rule(id: &str, panel: &str, terms: &[&str]) -> ParkRule {
        ParkRule {
            id: id.to_string(),
            panel_selector: panel.to_string(),
            fragment: None,
            terms: terms.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_park_matches_ski_substring() {
        let rule = rule("wilderness", "#pnlPark497", &["ski"]);
        let bulletin = parse_park(PANEL_HTML, &rule, "h3").unwrap();

        assert_eq!(bulletin.title, "Wilderness State Park");
        assert_eq!(bulletin.sections.len(), 1);
        assert_eq!(bulletin.sections[0].heading, "Cross-country ski trails:");
        assert_eq!(
            bulletin.sections[0].content,
            "Groomed weekly. Conditions fair to good."
        );
        assert!(bulletin.error.is_none());
    }

    #[test]
    fn test_parse_park_matches_named_terms_case_insensitively() {
        let rule = rule("petoskey-sp", "#pnlPark446", &["old baldy trail"]);
        let bulletin = parse_park(PANEL_HTML, &rule, "h3").unwrap();

        assert_eq!(bulletin.sections.len(), 1);
        assert_eq!(bulletin.sections[0].heading, "Old Baldy Trail:");
        assert_eq!(bulletin.sections[0].content, "Icy near the overlook.");
    }

    #[test]
    fn test_parse_park_only_scans_own_panel() {
        // "Trail" appears in both panels; only the configured one is scanned
        let rule = rule("petoskey-sp", "#pnlPark446", &["trail"]);
        let bulletin = parse_park(PANEL_HTML, &rule, "h3").unwrap();

        assert_eq!(bulletin.sections.len(), 1);
        assert_eq!(bulletin.sections[0].heading, "Old Baldy Trail:");
    }

    #[test]
    fn test_parse_park_missing_panel_is_error() {
        let rule = rule("missing", "#pnlPark999", &["ski"]);
        assert!(parse_park(PANEL_HTML, &rule, "h3").is_err());
    }

    #[test]
    fn test_strip_heading_without_prefix_keeps_block() {
        assert_eq!(strip_heading("some content", "Other:"), "some content");
    }

    #[tokio::test]
    async fn test_fetch_all_isolates_park_failures() {
        let mut config = Config::default();
        // A URL reqwest cannot even build a request for fails without
        // touching the network.
        config.bulletins.page_url = "::not-a-url::".to_string();
        config.fetch.retry_base_secs = 0;
        let service = BulletinService::new(Arc::new(config.clone()), reqwest::Client::new());

        let bulletins = service.fetch_all().await;

        assert_eq!(bulletins.len(), config.bulletins.parks.len());
        for rule in &config.bulletins.parks {
            let bulletin = &bulletins[&rule.id];
            assert!(bulletin.sections.is_empty());
            assert!(bulletin.error.is_some());
        }
    }
}
