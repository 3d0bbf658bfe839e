//! Park bulletin data structures.

use serde::{Deserialize, Serialize};

/// One labeled section extracted from a park's bulletin panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulletinSection {
    /// Bolded lead-in phrase from the source markup
    pub heading: String,

    /// Remainder of the enclosing text block, bold prefix stripped
    pub content: String,
}

/// Bulletin for a single monitored park.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParkBulletin {
    /// Park identifier (document key)
    pub park_id: String,

    /// Panel title as published
    pub title: String,

    /// Matched sections in document order
    pub sections: Vec<BulletinSection>,

    /// Set when the park's fetch or extraction failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParkBulletin {
    /// Degraded bulletin for a park whose fetch failed.
    pub fn unavailable(park_id: impl Into<String>, error: impl Into<String>) -> Self {
        let park_id = park_id.into();
        Self {
            title: park_id.clone(),
            park_id,
            sections: Vec::new(),
            error: Some(error.into()),
        }
    }
}
