// src/pipeline/collect.rs

//! Document collection pipeline.

use std::sync::Arc;

use chrono::Utc;
use reqwest::Client;

use crate::error::Result;
use crate::models::{Config, ConditionsDocument};
use crate::services::{
    BulletinService, ForecastService, ResortConditionsService, TrailReportService,
};

/// Run all four source services and assemble the conditions document.
///
/// The weather, bulletin and trail-report services degrade internally and
/// always return a value; the resort service has no isolation, so its
/// error aborts the run here, before anything is written. Partial data is
/// never published.
pub async fn run_collect(config: Arc<Config>, client: &Client) -> Result<ConditionsDocument> {
    log::info!("Collecting ski conditions");

    let forecast_service = ForecastService::new(Arc::clone(&config), client.clone());
    let bulletin_service = BulletinService::new(Arc::clone(&config), client.clone());
    let report_service = TrailReportService::new(Arc::clone(&config), client.clone());
    let resort_service = ResortConditionsService::new(Arc::clone(&config), client.clone());

    let (weather, bulletins, trail_reports, resort_conditions) = tokio::join!(
        forecast_service.fetch_all(),
        bulletin_service.fetch_all(),
        report_service.fetch_all(),
        resort_service.fetch(),
    );
    let resort_conditions = resort_conditions?;

    let document = ConditionsDocument {
        generated_at: Utc::now(),
        weather,
        bulletins,
        trail_reports,
        resort_conditions,
    };

    log::info!(
        "Collected {} forecasts, {} bulletins, {} trail reports",
        document.weather.len(),
        document.bulletins.len(),
        document.trail_reports.len()
    );

    Ok(document)
}
