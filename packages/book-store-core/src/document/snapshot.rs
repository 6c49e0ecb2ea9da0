//! Collection snapshot files.
//!
//! Each collection is stored as a single JSON file holding every
//! document plus a CRC32 of the serialized document array. Writes go
//! through a temporary file and an atomic rename.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::BookStoreConfig;
use crate::error::StoreError;

use super::io_utils::retry_transient;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk snapshot layout.
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub version: u32,
    pub collection: String,
    pub checksum: u32,
    pub documents: Vec<Value>,
}

/// Reads and writes the snapshot file of one collection.
#[derive(Debug)]
pub struct SnapshotManager {
    path: PathBuf,
    collection: String,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl SnapshotManager {
    /// Returns a manager when the configuration names a data directory.
    pub fn from_config(config: &BookStoreConfig) -> Option<Self> {
        config.snapshot_path().map(|path| Self {
            path,
            collection: config.collection.clone(),
            max_retries: config.persistence_max_retries,
            retry_delay_ms: config.persistence_retry_delay_ms,
        })
    }

    /// Snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads all documents. A missing file is an empty collection.
    pub fn load(&self) -> Result<Vec<Value>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut file = File::open(&self.path)
            .map_err(|e| StoreError::io("Failed to open snapshot file", e))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| StoreError::io("Failed to read snapshot file", e))?;

        let snapshot: SnapshotFile = serde_json::from_str(&contents).map_err(|e| {
            StoreError::SerializationError(format!("Failed to parse snapshot: {}", e))
        })?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::SerializationError(format!(
                "Unsupported snapshot version: {}",
                snapshot.version
            )));
        }
        if snapshot.collection != self.collection {
            return Err(StoreError::DataCorruption(format!(
                "Snapshot {} holds collection '{}', expected '{}'",
                self.path.display(),
                snapshot.collection,
                self.collection
            )));
        }
        let actual = checksum(&snapshot.documents)?;
        if actual != snapshot.checksum {
            return Err(StoreError::DataCorruption(format!(
                "Checksum mismatch in {}: stored {:08x}, computed {:08x}",
                self.path.display(),
                snapshot.checksum,
                actual
            )));
        }

        tracing::debug!(
            "Loaded {} documents from {}",
            snapshot.documents.len(),
            self.path.display()
        );
        Ok(snapshot.documents)
    }

    /// Writes all documents, retrying transient I/O failures.
    pub fn save(&self, documents: &[Value]) -> Result<(), StoreError> {
        retry_transient(
            || self.save_internal(documents),
            self.max_retries,
            self.retry_delay_ms,
            "save_snapshot",
        )
    }

    fn save_internal(&self, documents: &[Value]) -> Result<(), StoreError> {
        let snapshot = SnapshotFile {
            version: SNAPSHOT_VERSION,
            collection: self.collection.clone(),
            checksum: checksum(documents)?,
            documents: documents.to_vec(),
        };
        let json = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| StoreError::io("Failed to create data directory", e))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = File::create(&temp_path)
            .map_err(|e| StoreError::io("Failed to create temp file", e))?;
        file.write_all(&json)
            .map_err(|e| StoreError::io("Failed to write snapshot", e))?;
        file.sync_all()
            .map_err(|e| StoreError::io("Failed to sync snapshot", e))?;

        fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::io("Failed to rename snapshot file", e))?;

        Ok(())
    }
}

/// CRC32 of the serialized document array.
fn checksum(documents: &[Value]) -> Result<u32, StoreError> {
    let bytes = serde_json::to_vec(documents)
        .map_err(|e| StoreError::SerializationError(e.to_string()))?;
    Ok(crc32fast::hash(&bytes))
}
