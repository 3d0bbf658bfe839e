// src/services/weather.rs

//! Weather forecast service.
//!
//! Fetches gridpoint forecasts from the National Weather Service API for
//! each configured location. Locations with a lat/lon pair go through the
//! two-step point lookup first; grid references resolve directly.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{Config, ForecastPeriod, GeoRef, Location, LocationForecast};
use crate::utils::http;
use crate::utils::retry::with_retry_config;

/// Marker phrase for the snow-accumulation sentence in detailed forecasts.
const SNOW_MARKER: &str = "New snow accumulation";

/// Service for fetching weather forecasts per location.
pub struct ForecastService {
    config: Arc<Config>,
    client: Client,
}

impl ForecastService {
    /// Create a new forecast service with the given configuration.
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }

    /// Fetch forecasts for all configured locations.
    ///
    /// A location whose fetch fails maps to the degraded placeholder; the
    /// other locations are unaffected. If the API host does not resolve at
    /// all, the whole section short-circuits to an empty map without any
    /// per-location request.
    pub async fn fetch_all(&self) -> BTreeMap<String, LocationForecast> {
        let weather = &self.config.weather;

        if !http::host_reachable(&weather.api_base).await {
            log::warn!(
                "Weather host {} did not resolve, skipping all forecasts",
                weather.api_base
            );
            return BTreeMap::new();
        }

        let mut forecasts = BTreeMap::new();
        for location in &weather.locations {
            match self.fetch_location(location).await {
                Ok(forecast) => {
                    forecasts.insert(location.id.clone(), forecast);
                }
                Err(error) => {
                    log::warn!("Forecast for {} failed: {}", location.name, error);
                    forecasts.insert(
                        location.id.clone(),
                        LocationForecast::unavailable(location.name.clone()),
                    );
                }
            }
        }
        forecasts
    }

    /// Fetch the general and hourly forecasts for a single location.
    async fn fetch_location(&self, location: &Location) -> Result<LocationForecast> {
        let weather = &self.config.weather;
        let (forecast_url, hourly_url) = self.resolve_endpoints(location).await?;

        let general_label = format!("forecast {}", location.name);
        let general_fut = self.fetch_forecast(&general_label, &forecast_url);

        let hourly_label = format!("hourly forecast {}", location.name);
        let hourly_fut = async {
            match &hourly_url {
                Some(url) => self.fetch_forecast(&hourly_label, url).await.map(Some),
                None => Ok(None),
            }
        };

        let (general, hourly) = tokio::join!(general_fut, hourly_fut);
        let general = general?;

        // A missing hourly feed degrades to an empty list; the general
        // periods are still worth publishing.
        let hourly = match hourly {
            Ok(Some(response)) => convert_periods(response, weather.hourly_limit),
            Ok(None) => Vec::new(),
            Err(error) => {
                log::warn!("Hourly forecast for {} failed: {}", location.name, error);
                Vec::new()
            }
        };

        Ok(LocationForecast {
            name: location.name.clone(),
            periods: convert_periods(general, weather.period_limit),
            hourly,
        })
    }

    async fn fetch_forecast(&self, label: &str, url: &str) -> Result<ForecastResponse> {
        let fetch = &self.config.fetch;
        with_retry_config(
            label,
            fetch.max_attempts,
            Duration::from_secs(fetch.retry_base_secs),
            || http::fetch_json(&self.client, url),
        )
        .await
    }

    /// Resolve the forecast (and, where available, hourly) endpoint for a
    /// location. Grid references map straight to URLs; points need the
    /// lookup request.
    async fn resolve_endpoints(&self, location: &Location) -> Result<(String, Option<String>)> {
        let api_base = self.config.weather.api_base.trim_end_matches('/');
        match &location.geo {
            GeoRef::Grid { office, x, y } => {
                let forecast = format!("{}/gridpoints/{}/{},{}/forecast", api_base, office, x, y);
                let hourly = format!("{}/hourly", forecast);
                Ok((forecast, Some(hourly)))
            }
            GeoRef::Point { lat, lon } => {
                let point_url = format!("{}/points/{},{}", api_base, lat, lon);
                let label = format!("point lookup {}", location.name);
                let fetch = &self.config.fetch;
                let point: PointResponse = with_retry_config(
                    &label,
                    fetch.max_attempts,
                    Duration::from_secs(fetch.retry_base_secs),
                    || http::fetch_json(&self.client, &point_url),
                )
                .await?;

                let forecast = point.properties.forecast.ok_or_else(|| {
                    AppError::fetch(location.name.clone(), "point lookup returned no forecast URL")
                })?;
                Ok((forecast, point.properties.forecast_hourly))
            }
        }
    }
}

/// Truncate to the leading periods and normalize into the document model.
fn convert_periods(response: ForecastResponse, limit: usize) -> Vec<ForecastPeriod> {
    response
        .properties
        .periods
        .into_iter()
        .take(limit)
        .map(|period| ForecastPeriod {
            snow_accumulation: extract_snow_accumulation(&period.detailed_forecast),
            name: period.name,
            start_time: period.start_time,
            temperature: period.temperature,
            // Absent probability means "none stated", not "unknown"
            precip_chance: Some(
                period
                    .probability_of_precipitation
                    .and_then(|p| p.value)
                    .unwrap_or(0),
            ),
            short_forecast: period.short_forecast,
            detailed_forecast: period.detailed_forecast,
        })
        .collect()
}

/// Pull the first sentence containing the snow-accumulation marker out of a
/// detailed forecast, trimmed; empty string when absent.
fn extract_snow_accumulation(detailed: &str) -> String {
    detailed
        .split('.')
        .find(|sentence| sentence.contains(SNOW_MARKER))
        .map(|sentence| sentence.trim().to_string())
        .unwrap_or_default()
}

// --- Provider wire format ---

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    periods: Vec<WirePeriod>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePeriod {
    name: String,
    start_time: String,
    temperature: Option<i64>,
    #[serde(default)]
    probability_of_precipitation: Option<WireValue>,
    #[serde(default)]
    short_forecast: String,
    #[serde(default)]
    detailed_forecast: String,
}

#[derive(Debug, Deserialize)]
struct WireValue {
    value: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct PointResponse {
    properties: PointProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointProperties {
    forecast: Option<String>,
    forecast_hourly: Option<String>,
}
