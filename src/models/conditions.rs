//! Resort conditions data structures.

use serde::{Deserialize, Serialize};

/// Snow accumulation totals from the resort's conditions page.
///
/// All values are free text as published ("3\"", "Trace", ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SnowTotals {
    pub last_24h: String,
    pub last_3_days: String,
    pub last_7_days: String,
    pub season: String,
}

/// Flat conditions record scraped from the resort's own page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResortConditions {
    /// Report date as published
    pub date: String,

    /// Lifts open, as published
    pub lifts_open: String,

    /// Trail-system status
    pub trail_system: String,

    /// Night-skiing status
    pub night_skiing: String,

    /// Free-text comments
    pub comments: String,

    /// Nested snow accumulation record
    pub snow: SnowTotals,
}
