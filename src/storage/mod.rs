//! Key-value persistence for client-side state.
//!
//! [`KeyValueStore`] is the single persistence seam the cart depends on.
//! Adapters:
//! - [`MemoryStore`]: process-local map, for tests and short-lived sessions.
//! - [`FileStore`]: one JSON file per key in a directory.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage I/O failed for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Async string-valued persistence keyed by name.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when nothing has been written under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}
