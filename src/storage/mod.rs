//! Storage abstraction for the published document.
//!
//! The destination store versions files itself; all we hold client-side is
//! the revision marker read immediately before each write. The marker is
//! required for updates so a concurrent edit is never blindly overwritten.

pub mod github;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

// Re-export for convenience
pub use github::GitHubStore;

/// Metadata about a completed write.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Path written within the store
    pub path: String,

    /// Revision marker of the newly written content, when reported
    pub revision: Option<String>,

    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,
}

/// Trait for destination document stores.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the current revision marker for a path.
    ///
    /// Absence is not an error: `Ok(None)` means the path does not exist
    /// yet and the next write is a create.
    async fn read_revision(&self, path: &str) -> Result<Option<String>>;

    /// Create or update the file at `path`.
    ///
    /// `revision` must be the marker read beforehand (update) or `None`
    /// (create); stores reject mismatches.
    async fn write_document(
        &self,
        path: &str,
        content: &str,
        message: &str,
        revision: Option<&str>,
    ) -> Result<WriteMetadata>;
}
