// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::Result;
use crate::models::FetchConfig;

/// Create the shared asynchronous HTTP client.
pub fn create_client(config: &FetchConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a URL and return the response body as text.
///
/// Non-2xx statuses are errors.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let text = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(text)
}

/// Fetch a URL and deserialize the JSON response body.
pub async fn fetch_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T> {
    let value = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(value)
}

/// Pre-flight name-resolution check for a base URL's host.
///
/// Returns false when the host cannot be resolved, letting callers
/// short-circuit a whole source instead of timing out per request.
pub async fn host_reachable(base_url: &str) -> bool {
    let Ok(url) = Url::parse(base_url) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    let port = url.port_or_known_default().unwrap_or(443);
    tokio::net::lookup_host((host, port)).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_host_reachable_rejects_invalid_url() {
        assert!(!host_reachable("not a url").await);
        assert!(!host_reachable("file:///tmp/x").await);
    }

    #[tokio::test]
    async fn test_host_reachable_unresolvable_host() {
        // .invalid is reserved and never resolves
        assert!(!host_reachable("https://api.definitely-not-real.invalid").await);
    }
}
