//! Monitored forecast locations.

use serde::{Deserialize, Serialize};

/// A statically configured location to fetch forecasts for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    /// Stable key used in the published document
    pub id: String,

    /// Display name
    pub name: String,

    /// How to reach the provider's forecast for this location
    #[serde(flatten)]
    pub geo: GeoRef,
}

/// Geolocation reference understood by the weather provider.
///
/// A `Grid` reference maps straight to a gridpoint forecast URL; a `Point`
/// requires the two-step point lookup to resolve the forecast URL first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GeoRef {
    Grid { office: String, x: u32, y: u32 },
    Point { lat: f64, lon: f64 },
}
