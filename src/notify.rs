// src/notify.rs

//! Failure alerting.
//!
//! One fire-and-forget webhook POST on unrecoverable failure. Alerting is
//! independent of the main flow's exit behavior: a failed (or unconfigured)
//! alert never masks the error that triggered it.

use reqwest::Client;

use crate::config;

/// Out-of-band failure notifier.
pub struct Notifier {
    client: Client,
    webhook_url: Option<String>,
}

impl Notifier {
    /// Create a notifier; `None` disables alerting.
    pub fn new(client: Client, webhook_url: Option<String>) -> Self {
        Self {
            client,
            webhook_url,
        }
    }

    /// Create a notifier from the optional `ALERT_WEBHOOK_URL` variable.
    pub fn from_env(client: Client) -> Self {
        Self::new(client, config::alert_webhook_from_env())
    }

    /// Send an alert with a human-readable message and a technical trace.
    ///
    /// Best-effort: delivery failures are logged and swallowed.
    pub async fn alert(&self, message: &str, trace: &str) {
        let Some(url) = &self.webhook_url else {
            log::warn!("No alert webhook configured; skipping alert: {}", message);
            return;
        };

        let payload = serde_json::json!({
            "message": message,
            "trace": trace,
        });

        match self.client.post(url).json(&payload).send().await {
            Ok(response) => {
                if let Err(error) = response.error_for_status() {
                    log::warn!("Alert delivery rejected: {}", error);
                }
            }
            Err(error) => log::warn!("Alert delivery failed: {}", error),
        }
    }
}
