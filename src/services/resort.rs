// src/services/resort.rs

//! Single-resort conditions service.
//!
//! Scrapes the resort's own conditions page, a table of label/value rows.
//! Fields are found by scanning row labels rather than by fixed per-field
//! selectors, which survives markup reshuffles. Unlike the other sources
//! this one has no per-field isolation: a failed fetch aborts the run.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use scraper::Html;

use crate::error::Result;
use crate::models::{Config, ResortConditions, SnowTotals};
use crate::utils::http;
use crate::utils::normalize_whitespace;
use crate::utils::retry::with_retry_config;

use super::parse_selector;

const DATE_LABEL: &str = "Date";
const LIFTS_LABEL: &str = "Lifts Open";
const TRAILS_LABEL: &str = "Trail System";
const NIGHT_LABEL: &str = "Night Skiing";
const COMMENTS_LABEL: &str = "Comments";
/// This row carries four value cells: 24h / 3-day / 7-day / season.
const SNOW_LABEL: &str = "New Snow since yesterday";

/// Service for fetching the resort's conditions record.
pub struct ResortConditionsService {
    config: Arc<Config>,
    client: Client,
}

impl ResortConditionsService {
    /// Create a new resort-conditions service with the given configuration.
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }

    /// Fetch and extract the conditions record. Errors propagate.
    pub async fn fetch(&self) -> Result<ResortConditions> {
        let fetch = &self.config.fetch;
        let url = &self.config.resort.page_url;
        let html = with_retry_config(
            "resort conditions",
            fetch.max_attempts,
            Duration::from_secs(fetch.retry_base_secs),
            || http::fetch_text(&self.client, url),
        )
        .await?;

        parse_conditions(&html)
    }
}

/// Extract the conditions record from the page.
fn parse_conditions(html: &str) -> Result<ResortConditions> {
    let document = Html::parse_document(html);
    let row_sel = parse_selector("tr")?;
    let cell_sel = parse_selector("th, td")?;

    let rows: Vec<Vec<String>> = document
        .select(&row_sel)
        .map(|row| {
            row.select(&cell_sel)
                .map(|cell| normalize_whitespace(&cell.text().collect::<String>()))
                .collect()
        })
        .collect();

    let snow_cells = lookup_values(&rows, SNOW_LABEL);
    let snow_cell = |i: usize| snow_cells.get(i).cloned().unwrap_or_default();

    Ok(ResortConditions {
        date: lookup_value(&rows, DATE_LABEL),
        lifts_open: lookup_value(&rows, LIFTS_LABEL),
        trail_system: lookup_value(&rows, TRAILS_LABEL),
        night_skiing: lookup_value(&rows, NIGHT_LABEL),
        comments: lookup_value(&rows, COMMENTS_LABEL),
        snow: SnowTotals {
            last_24h: snow_cell(0),
            last_3_days: snow_cell(1),
            last_7_days: snow_cell(2),
            season: snow_cell(3),
        },
    })
}

/// Value of the row whose first cell exactly equals `label`, "" if absent.
fn lookup_value(rows: &[Vec<String>], label: &str) -> String {
    lookup_values(rows, label).into_iter().next().unwrap_or_default()
}

/// All value cells of the row whose first cell exactly equals `label`.
fn lookup_values(rows: &[Vec<String>], label: &str) -> Vec<String> {
    rows.iter()
        .find(|cells| cells.first().map(String::as_str) == Some(label))
        .map(|cells| cells[1..].to_vec())
        .unwrap_or_default()
}
