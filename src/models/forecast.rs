//! Forecast data structures.

use serde::{Deserialize, Serialize};

/// A single forecast period as published by the weather provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastPeriod {
    /// Period label, e.g. "Tonight"
    pub name: String,

    /// Period start instant, kept exactly as published
    pub start_time: String,

    /// Temperature in the provider's implied unit (None only for placeholders)
    pub temperature: Option<i64>,

    /// Precipitation probability 0-100 (None only for placeholders)
    pub precip_chance: Option<i64>,

    /// One-line summary
    pub short_forecast: String,

    /// Full prose forecast
    pub detailed_forecast: String,

    /// Snow-accumulation sentence pulled from the detailed text, "" if absent
    pub snow_accumulation: String,
}

impl ForecastPeriod {
    /// Degraded placeholder substituted when a location's fetch fails.
    pub fn unavailable() -> Self {
        Self {
            name: "Unavailable".to_string(),
            start_time: String::new(),
            temperature: None,
            precip_chance: None,
            short_forecast: "Forecast unavailable".to_string(),
            detailed_forecast:
                "Forecast data could not be retrieved. Check weather.gov for current conditions."
                    .to_string(),
            snow_accumulation: String::new(),
        }
    }
}

/// Forecast fragment for one monitored location.
///
/// Both sequences keep the provider's chronological order and are truncated,
/// never re-sorted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LocationForecast {
    /// Display name of the location
    pub name: String,

    /// Leading general-forecast periods
    pub periods: Vec<ForecastPeriod>,

    /// Leading hourly-forecast periods (empty when the source has none)
    pub hourly: Vec<ForecastPeriod>,
}

impl LocationForecast {
    /// Degraded fragment for a location whose fetch failed.
    pub fn unavailable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            periods: vec![ForecastPeriod::unavailable()],
            hourly: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_has_null_numerics() {
        let period = ForecastPeriod::unavailable();
        assert_eq!(period.name, "Unavailable");
        assert!(period.temperature.is_none());
        assert!(period.precip_chance.is_none());
        assert!(!period.detailed_forecast.is_empty());
    }

    #[test]
    fn test_unavailable_fragment() {
        let forecast = LocationForecast::unavailable("Petoskey");
        assert_eq!(forecast.name, "Petoskey");
        assert_eq!(forecast.periods.len(), 1);
        assert!(forecast.hourly.is_empty());
    }
}
