//! Store configuration.

use std::path::PathBuf;

/// Book store configuration.
#[derive(Debug, Clone)]
pub struct BookStoreConfig {
    /// Collection name, also the snapshot file stem
    pub collection: String,
    /// Directory for collection snapshots (None = in-memory only)
    pub data_dir: Option<PathBuf>,
    /// Request body timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Maximum retry attempts for transient I/O errors
    pub persistence_max_retries: u32,
    /// Delay between retry attempts in milliseconds
    pub persistence_retry_delay_ms: u64,
}

impl BookStoreConfig {
    /// Path of the snapshot file for the configured collection, if persistent.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", self.collection)))
    }
}

impl Default for BookStoreConfig {
    fn default() -> Self {
        Self {
            collection: "book".to_string(),
            data_dir: None,
            request_timeout_ms: 5000,
            persistence_max_retries: 3,
            persistence_retry_delay_ms: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_path() {
        let config = BookStoreConfig::default();
        assert!(config.snapshot_path().is_none());

        let config = BookStoreConfig {
            data_dir: Some(PathBuf::from("/var/lib/books")),
            ..Default::default()
        };
        assert_eq!(
            config.snapshot_path(),
            Some(PathBuf::from("/var/lib/books/book.json"))
        );
    }
}
