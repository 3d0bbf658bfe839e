//! GitHub contents-API storage implementation.
//!
//! The published document lives as a single JSON file in a repository; the
//! contents API's `sha` field is the revision marker. A read of that field
//! immediately precedes every write.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::error::{AppError, Result};
use crate::models::FetchConfig;
use crate::storage::{DocumentStore, WriteMetadata};
use crate::utils::retry::with_retry_config;

const GITHUB_API: &str = "https://api.github.com";
const ACCEPT_JSON: &str = "application/vnd.github+json";

/// GitHub-backed document store.
pub struct GitHubStore {
    client: Client,
    api_base: String,
    owner: String,
    repo: String,
    token: String,
    max_attempts: u32,
    retry_base: Duration,
}

impl GitHubStore {
    /// Create a new store against the public GitHub API.
    pub fn new(client: Client, store: StoreConfig, fetch: &FetchConfig) -> Self {
        Self {
            client,
            api_base: GITHUB_API.to_string(),
            owner: store.owner,
            repo: store.repo,
            token: store.token,
            max_attempts: fetch.max_attempts,
            retry_base: Duration::from_secs(fetch.retry_base_secs),
        }
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base,
            self.owner,
            self.repo,
            path.trim_start_matches('/')
        )
    }

    async fn read_revision_once(&self, url: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, ACCEPT_JSON)
            .send()
            .await?;

        // A missing file is the create case, not an error
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let meta: ContentMeta = response.error_for_status()?.json().await?;
        Ok(Some(meta.sha))
    }

    async fn write_once(
        &self,
        url: &str,
        request: &PutRequest<'_>,
        path: &str,
    ) -> Result<WriteMetadata> {
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, ACCEPT_JSON)
            .json(request)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(AppError::publish(format!(
                "revision marker for {} is stale",
                path
            )));
        }

        let body: PutResponse = response.error_for_status()?.json().await?;
        Ok(WriteMetadata {
            path: path.to_string(),
            revision: body.content.map(|c| c.sha),
            timestamp: Utc::now(),
        })
    }
}

#[async_trait]
impl DocumentStore for GitHubStore {
    async fn read_revision(&self, path: &str) -> Result<Option<String>> {
        let url = self.contents_url(path);
        with_retry_config(
            "read revision",
            self.max_attempts,
            self.retry_base,
            || self.read_revision_once(&url),
        )
        .await
    }

    async fn write_document(
        &self,
        path: &str,
        content: &str,
        message: &str,
        revision: Option<&str>,
    ) -> Result<WriteMetadata> {
        let url = self.contents_url(path);
        let request = PutRequest {
            message,
            content: BASE64.encode(content),
            sha: revision,
        };

        let metadata = with_retry_config(
            "write document",
            self.max_attempts,
            self.retry_base,
            || self.write_once(&url, &request, path),
        )
        .await?;

        log::info!(
            "Wrote {} bytes to {}/{}:{}",
            content.len(),
            self.owner,
            self.repo,
            path
        );
        Ok(metadata)
    }
}

// --- Wire format ---

#[derive(Debug, Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    content: Option<ContentMeta>,
}

#[derive(Debug, Deserialize)]
struct ContentMeta {
    sha: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> GitHubStore {
        GitHubStore::new(
            Client::new(),
            StoreConfig {
                token: "t".to_string(),
                owner: "harborsnow".to_string(),
                repo: "conditions-data".to_string(),
            },
            &FetchConfig::default(),
        )
    }

    #[test]
    fn test_contents_url() {
        assert_eq!(
            store().contents_url("data/conditions.json"),
            "https://api.github.com/repos/harborsnow/conditions-data/contents/data/conditions.json"
        );
        // Leading slash does not produce a double slash
        assert_eq!(
            store().contents_url("/data/conditions.json"),
            "https://api.github.com/repos/harborsnow/conditions-data/contents/data/conditions.json"
        );
    }

    #[test]
    fn test_put_request_omits_sha_on_create() {
        let request = PutRequest {
            message: "Update ski conditions",
            content: BASE64.encode("{}"),
            sha: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("\"sha\""));

        let request = PutRequest {
            sha: Some("abc123"),
            ..request
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"sha\":\"abc123\""));
    }
}
