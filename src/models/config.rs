//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

use super::{GeoRef, Location};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and retry behavior settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Weather source settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Park bulletin source settings
    #[serde(default)]
    pub bulletins: BulletinsConfig,

    /// Regional trail-report source settings
    #[serde(default)]
    pub reports: ReportsConfig,

    /// Single-resort conditions source settings
    #[serde(default)]
    pub resort: ResortConfig,

    /// Destination path and commit message
    #[serde(default)]
    pub publish: PublishConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        if self.fetch.max_attempts == 0 {
            return Err(AppError::validation("fetch.max_attempts must be > 0"));
        }
        if self.weather.locations.is_empty() {
            return Err(AppError::validation("No weather locations defined"));
        }
        if self.bulletins.parks.is_empty() {
            return Err(AppError::validation("No parks defined"));
        }
        for park in &self.bulletins.parks {
            if park.terms.is_empty() {
                return Err(AppError::validation(format!(
                    "Park {} has no section terms",
                    park.id
                )));
            }
        }
        if self.reports.regions.is_empty() {
            return Err(AppError::validation("No report regions defined"));
        }
        if self.reports.locations.is_empty() {
            return Err(AppError::validation("No report locations defined"));
        }
        if !self.reports.url_template.contains("{region}") {
            return Err(AppError::validation(
                "reports.url_template must contain {region}",
            ));
        }
        if self.publish.path.trim().is_empty() {
            return Err(AppError::validation("publish.path is empty"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            weather: WeatherConfig::default(),
            bulletins: BulletinsConfig::default(),
            reports: ReportsConfig::default(),
            resort: ResortConfig::default(),
            publish: PublishConfig::default(),
        }
    }
}

/// HTTP client and retry behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header; the weather API requires a contact string here
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Total attempts per network call, including the first
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Backoff base delay in seconds, doubled per attempt
    #[serde(default = "defaults::retry_base")]
    pub retry_base_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_attempts: defaults::max_attempts(),
            retry_base_secs: defaults::retry_base(),
        }
    }
}

/// Weather source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Forecast API base URL
    #[serde(default = "defaults::weather_api_base")]
    pub api_base: String,

    /// Monitored locations
    #[serde(default = "defaults::default_locations")]
    pub locations: Vec<Location>,

    /// General-forecast periods kept per location
    #[serde(default = "defaults::period_limit")]
    pub period_limit: usize,

    /// Hourly-forecast periods kept per location
    #[serde(default = "defaults::hourly_limit")]
    pub hourly_limit: usize,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::weather_api_base(),
            locations: defaults::default_locations(),
            period_limit: defaults::period_limit(),
            hourly_limit: defaults::hourly_limit(),
        }
    }
}

/// Park bulletin source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletinsConfig {
    /// Shared closures/conditions page
    #[serde(default = "defaults::bulletins_page_url")]
    pub page_url: String,

    /// Selector for the panel title within a park's panel
    #[serde(default = "defaults::bulletin_title_selector")]
    pub title_selector: String,

    /// Monitored parks with their per-park extraction rules
    #[serde(default = "defaults::default_parks")]
    pub parks: Vec<ParkRule>,
}

impl Default for BulletinsConfig {
    fn default() -> Self {
        Self {
            page_url: defaults::bulletins_page_url(),
            title_selector: defaults::bulletin_title_selector(),
            parks: defaults::default_parks(),
        }
    }
}

/// Extraction rule for one monitored park.
///
/// Term lists are deliberately independent per park; one park may match on
/// a single generic word while another matches named trails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkRule {
    /// Park identifier (document key)
    pub id: String,

    /// CSS selector for the park's collapsible panel
    pub panel_selector: String,

    /// Optional URL fragment appended to the shared page URL
    #[serde(default)]
    pub fragment: Option<String>,

    /// Case-insensitive substrings a bolded lead-in must contain
    pub terms: Vec<String>,
}

/// Regional trail-report source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Region listing URL; `{region}` is replaced with each region code
    #[serde(default = "defaults::reports_url_template")]
    pub url_template: String,

    /// Region codes queried concurrently
    #[serde(default = "defaults::default_regions")]
    pub regions: Vec<String>,

    /// Selector for report headings ("date: location")
    #[serde(default = "defaults::report_heading_selector")]
    pub heading_selector: String,

    /// Allowlist of relevant location names (substring match)
    #[serde(default = "defaults::default_report_locations")]
    pub locations: Vec<String>,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            url_template: defaults::reports_url_template(),
            regions: defaults::default_regions(),
            heading_selector: defaults::report_heading_selector(),
            locations: defaults::default_report_locations(),
        }
    }
}

/// Single-resort conditions source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResortConfig {
    /// Conditions page URL
    #[serde(default = "defaults::resort_page_url")]
    pub page_url: String,
}

impl Default for ResortConfig {
    fn default() -> Self {
        Self {
            page_url: defaults::resort_page_url(),
        }
    }
}

/// Destination path and commit message for the published document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// File path within the destination repository
    #[serde(default = "defaults::publish_path")]
    pub path: String,

    /// Commit message for each update
    #[serde(default = "defaults::publish_message")]
    pub message: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            path: defaults::publish_path(),
            message: defaults::publish_message(),
        }
    }
}

mod defaults {
    use super::{GeoRef, Location, ParkRule};

    // Fetch defaults
    pub fn user_agent() -> String {
        "snowline/0.1 (https://github.com/harborsnow/snowline; powder@harborsnow.org)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_attempts() -> u32 {
        3
    }
    pub fn retry_base() -> u64 {
        1
    }

    // Weather defaults
    pub fn weather_api_base() -> String {
        "https://api.weather.gov".into()
    }
    pub fn period_limit() -> usize {
        4
    }
    pub fn hourly_limit() -> usize {
        20
    }
    pub fn default_locations() -> Vec<Location> {
        vec![
            Location {
                id: "harbor-springs".to_string(),
                name: "Harbor Springs".to_string(),
                geo: GeoRef::Grid {
                    office: "APX".to_string(),
                    x: 55,
                    y: 91,
                },
            },
            Location {
                id: "petoskey".to_string(),
                name: "Petoskey".to_string(),
                geo: GeoRef::Point {
                    lat: 45.3735,
                    lon: -84.9553,
                },
            },
        ]
    }

    // Bulletin defaults
    pub fn bulletins_page_url() -> String {
        "https://www2.dnr.state.mi.us/parksandtrails/Closures.aspx".into()
    }
    pub fn bulletin_title_selector() -> String {
        "h3".into()
    }
    pub fn default_parks() -> Vec<ParkRule> {
        vec![
            ParkRule {
                id: "wilderness".to_string(),
                panel_selector: "#pnlPark497".to_string(),
                fragment: Some("497".to_string()),
                terms: vec!["ski".to_string()],
            },
            ParkRule {
                id: "petoskey-sp".to_string(),
                panel_selector: "#pnlPark446".to_string(),
                fragment: Some("446".to_string()),
                terms: vec!["Old Baldy Trail".to_string(), "Portage Trail".to_string()],
            },
        ]
    }

    // Trail report defaults
    pub fn reports_url_template() -> String {
        "https://www.skinnyski.com/trails/reports.asp?region={region}".into()
    }
    pub fn default_regions() -> Vec<String> {
        vec!["nwmich".to_string(), "upmich".to_string()]
    }
    pub fn report_heading_selector() -> String {
        "h3".into()
    }
    pub fn default_report_locations() -> Vec<String> {
        vec![
            "Nubs Nob".to_string(),
            "Boyne Highlands".to_string(),
            "Avalanche Preserve".to_string(),
        ]
    }

    // Resort defaults
    pub fn resort_page_url() -> String {
        "https://www.nubsnob.com/snow-report/".into()
    }

    // Publish defaults
    pub fn publish_path() -> String {
        "data/conditions.json".into()
    }
    pub fn publish_message() -> String {
        "Update ski conditions".into()
    }
}
