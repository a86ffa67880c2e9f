//! Storage abstractions for snapshot persistence.
//!
//! Keys are snapshot-relative paths using `/` separators, exactly as they
//! appear in the archiver's work queues (`sessions/42.json`, `media/pic.jpg`).

pub mod local;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Write a JSON document, pretty-printed, replacing any previous content.
    async fn write_json(&self, key: &str, value: &Value) -> Result<()>;

    /// Write raw bytes, replacing any previous content.
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Whether something is already stored under `key`.
    async fn exists(&self, key: &str) -> bool;

    /// Ensure a directory (or the root when `key` is empty) exists.
    async fn ensure_dir(&self, key: &str) -> Result<()>;

    /// Human-readable location of `key`, for logs.
    fn location(&self, key: &str) -> String;
}
