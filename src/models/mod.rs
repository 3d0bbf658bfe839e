// src/models/mod.rs

//! Domain models for the collector application.
//!
//! This module contains all data structures used throughout the application:
//! the published document and its fragments, plus the typed configuration.

mod bulletin;
mod conditions;
mod config;
mod document;
mod forecast;
mod location;
mod report;

// Re-export all public types
pub use bulletin::{BulletinSection, ParkBulletin};
pub use conditions::{ResortConditions, SnowTotals};
pub use config::{
    BulletinsConfig, Config, FetchConfig, ParkRule, PublishConfig, ReportsConfig, ResortConfig,
    WeatherConfig,
};
pub use document::ConditionsDocument;
pub use forecast::{ForecastPeriod, LocationForecast};
pub use location::{GeoRef, Location};
pub use report::TrailReport;
