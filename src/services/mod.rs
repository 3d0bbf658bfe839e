//! Service layer for the collector application.
//!
//! One service per external source:
//! - Weather forecasts (`ForecastService`)
//! - Park bulletins (`BulletinService`)
//! - Regional trail reports (`TrailReportService`)
//! - Single-resort conditions (`ResortConditionsService`)

mod bulletins;
mod reports;
mod resort;
mod weather;

pub use bulletins::BulletinService;
pub use reports::TrailReportService;
pub use resort::ResortConditionsService;
pub use weather::ForecastService;

use scraper::Selector;

use crate::error::{AppError, Result};

/// Parse a CSS selector, mapping the opaque parse error into `AppError`.
pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
