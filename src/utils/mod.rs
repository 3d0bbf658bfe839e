//! Utility functions and helpers.

pub mod http;
pub mod retry;

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Collapse runs of whitespace (including newlines from HTML text nodes)
/// into single spaces and trim.
pub fn normalize_whitespace(s: &str) -> String {
    static WS: OnceLock<Regex> = OnceLock::new();
    let ws = WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"));
    ws.replace_all(s.trim(), " ").to_string()
}

/// Parse a report date label like "Tue, Jan 14" into a date in the given
/// year. Best-effort: `None` means the recency of the report cannot be
/// determined, never "earliest possible date".
pub fn parse_report_date(label: &str, year: i32) -> Option<NaiveDate> {
    let trimmed = label.trim();
    // The weekday prefix is dropped rather than validated; sources get it
    // wrong often enough that validation would discard usable dates.
    let month_day = trimmed
        .split_once(',')
        .map(|(_, rest)| rest.trim())
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(&format!("{} {}", month_day, year), "%b %d %Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a\n\t b  c "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_parse_report_date() {
        let date = parse_report_date("Tue, Jan 14", 2025).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 14).unwrap());

        // Weekday prefix is ignored, not validated
        let date = parse_report_date("Mon, Jan 14", 2025).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 14).unwrap());
    }

    #[test]
    fn test_parse_report_date_garbage_is_none() {
        assert!(parse_report_date("updated recently", 2025).is_none());
        assert!(parse_report_date("", 2025).is_none());
        assert!(parse_report_date("Tue, Foo 99", 2025).is_none());
    }
}
