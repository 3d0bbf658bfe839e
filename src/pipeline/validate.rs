// src/pipeline/validate.rs

//! Offline validation of configuration and environment.

use crate::config::{self, StoreConfig};
use crate::error::Result;
use crate::models::Config;

/// Validate the loaded config and the process environment without any
/// network activity.
pub fn run_validate(config: &Config) -> Result<()> {
    config.validate()?;
    log::info!(
        "Config OK: {} locations, {} parks, {} regions, {} report locations",
        config.weather.locations.len(),
        config.bulletins.parks.len(),
        config.reports.regions.len(),
        config.reports.locations.len()
    );

    let store = StoreConfig::from_env()?;
    log::info!("Destination store: {}/{}", store.owner, store.repo);

    if config::alert_webhook_from_env().is_none() {
        log::warn!("ALERT_WEBHOOK_URL not set; failures will not alert");
    }

    Ok(())
}
