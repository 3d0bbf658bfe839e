//! The published conditions document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{LocationForecast, ParkBulletin, ResortConditions, TrailReport};

/// Root document published for the display application.
///
/// Every top-level key is always present, even when a source degraded to an
/// empty or placeholder value. The document is rebuilt whole on every run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConditionsDocument {
    /// Generation timestamp
    pub generated_at: DateTime<Utc>,

    /// Location id -> forecast
    pub weather: BTreeMap<String, LocationForecast>,

    /// Park id -> bulletin
    pub bulletins: BTreeMap<String, ParkBulletin>,

    /// Raw location segment -> newest trail report
    pub trail_reports: BTreeMap<String, TrailReport>,

    /// Single-resort conditions record
    pub resort_conditions: ResortConditions,
}
