// src/pipeline/publish.rs

//! Publish step.
//!
//! The remote revision marker is read immediately before every write and
//! passed back verbatim, so an update never blindly overwrites a
//! concurrent edit. The marker is discarded afterwards; nothing about the
//! previous version is retained.

use crate::error::Result;
use crate::models::{ConditionsDocument, PublishConfig};
use crate::storage::{DocumentStore, WriteMetadata};

/// Serialize the document and write it to the destination store.
pub async fn run_publish(
    store: &dyn DocumentStore,
    publish: &PublishConfig,
    document: &ConditionsDocument,
) -> Result<WriteMetadata> {
    let json = serde_json::to_string_pretty(document)?;

    let revision = store.read_revision(&publish.path).await?;
    match &revision {
        Some(marker) => log::info!("Updating {} (revision {})", publish.path, marker),
        None => log::info!("Creating {}", publish.path),
    }

    let metadata = store
        .write_document(&publish.path, &json, &publish.message, revision.as_deref())
        .await?;

    log::info!("Published {} at {}", metadata.path, metadata.timestamp);
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::error::AppError;
    use crate::models::ResortConditions;

    /// In-memory store that enforces the revision protocol the way the
    /// real destination does: updates must carry the current marker,
    /// creates must carry none.
    #[derive(Default)]
    struct FakeStore {
        files: Mutex<HashMap<String, (String, u64)>>,
    }

    impl FakeStore {
        fn content(&self, path: &str) -> Option<String> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .map(|(content, _)| content.clone())
        }
    }

    #[async_trait]
    impl DocumentStore for FakeStore {
        async fn read_revision(&self, path: &str) -> Result<Option<String>> {
            Ok(self
                .files
                .lock()
                .unwrap()
                .get(path)
                .map(|(_, rev)| rev.to_string()))
        }

        async fn write_document(
            &self,
            path: &str,
            content: &str,
            _message: &str,
            revision: Option<&str>,
        ) -> Result<WriteMetadata> {
            let mut files = self.files.lock().unwrap();
            let next_rev = match (files.get(path), revision) {
                (None, None) => 1,
                (Some((_, current)), Some(marker)) if marker == current.to_string() => current + 1,
                _ => return Err(AppError::publish("revision marker mismatch")),
            };
            files.insert(path.to_string(), (content.to_string(), next_rev));
            Ok(WriteMetadata {
                path: path.to_string(),
                revision: Some(next_rev.to_string()),
                timestamp: Utc::now(),
            })
        }
    }

    fn document() -> ConditionsDocument {
        ConditionsDocument {
            generated_at: Utc::now(),
            weather: BTreeMap::new(),
            bulletins: BTreeMap::new(),
            trail_reports: BTreeMap::new(),
            resort_conditions: ResortConditions::default(),
        }
    }

    fn publish_config() -> PublishConfig {
        PublishConfig {
            path: "data/conditions.json".to_string(),
            message: "Update ski conditions".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_update() {
        let store = FakeStore::default();
        let publish = publish_config();
        let doc = document();

        // First write: no marker exists, create path
        let metadata = run_publish(&store, &publish, &doc).await.unwrap();
        assert_eq!(metadata.revision.as_deref(), Some("1"));

        // Second write: marker exists and must be passed through exactly
        let metadata = run_publish(&store, &publish, &doc).await.unwrap();
        assert_eq!(metadata.revision.as_deref(), Some("2"));

        let content = store.content(&publish.path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(value.get("resort_conditions").is_some());
    }

    #[tokio::test]
    async fn test_fake_store_rejects_mismatched_markers() {
        let store = FakeStore::default();
        store
            .write_document("x.json", "{}", "m", None)
            .await
            .unwrap();

        // Blind create over an existing file
        assert!(store.write_document("x.json", "{}", "m", None).await.is_err());
        // Stale marker
        assert!(
            store
                .write_document("x.json", "{}", "m", Some("99"))
                .await
                .is_err()
        );
    }
}
