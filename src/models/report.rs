//! Trail report data structure.

use serde::{Deserialize, Serialize};

/// A groomed-trail report for one location.
///
/// The date used to pick the newest of duplicate reports is parsed
/// best-effort inside the trail-report service and never serialized; only
/// the raw label as published survives here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrailReport {
    /// Location name exactly as it appeared in the source heading
    pub location: String,

    /// Raw last-updated label as published, e.g. "Tue, Jan 14"
    pub updated: String,

    /// Report body text
    pub report: String,
}
