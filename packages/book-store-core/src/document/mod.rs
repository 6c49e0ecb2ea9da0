//! JSON document store.
//!
//! A `DocumentStore` holds one named collection of JSON objects keyed
//! by a string `id`. Stores opened with a data directory rewrite their
//! snapshot file after every mutation.

pub mod io_utils;
pub mod snapshot;

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::config::BookStoreConfig;
use crate::error::StoreError;

use self::snapshot::SnapshotManager;

/// Field holding a document's identity.
pub const ID_FIELD: &str = "id";

/// Stored document with its insertion sequence number.
#[derive(Debug)]
struct Entry {
    seq: u64,
    doc: Value,
}

#[derive(Debug, Default)]
struct Collection {
    next_seq: u64,
    entries: HashMap<String, Entry>,
}

impl Collection {
    /// Returns the replaced document, if any.
    fn upsert(&mut self, id: String, doc: Value) -> Option<Value> {
        match self.entries.get_mut(&id) {
            Some(entry) => Some(std::mem::replace(&mut entry.doc, doc)),
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.entries.insert(id, Entry { seq, doc });
                None
            }
        }
    }

    /// Documents in insertion order.
    fn ordered(&self) -> Vec<Value> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.doc.clone()).collect()
    }
}

/// A single collection of JSON documents.
#[derive(Debug)]
pub struct DocumentStore {
    name: String,
    collection: RwLock<Collection>,
    snapshots: Option<SnapshotManager>,
}

impl DocumentStore {
    /// Creates an empty, volatile store.
    pub fn in_memory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: RwLock::new(Collection::default()),
            snapshots: None,
        }
    }

    /// Opens the configured collection, loading its snapshot if one exists.
    pub fn open(config: &BookStoreConfig) -> Result<Self, StoreError> {
        let snapshots = SnapshotManager::from_config(config);
        let mut collection = Collection::default();

        if let Some(snapshots) = &snapshots {
            for doc in snapshots.load()? {
                let id = document_id(&doc).ok_or_else(|| {
                    StoreError::DataCorruption(format!(
                        "Document without id in {}",
                        snapshots.path().display()
                    ))
                })?
                .to_string();
                collection.upsert(id, doc);
            }
            tracing::info!(
                "Opened collection '{}' with {} documents from {}",
                config.collection,
                collection.entries.len(),
                snapshots.path().display()
            );
        }

        Ok(Self {
            name: config.collection.clone(),
            collection: RwLock::new(collection),
            snapshots,
        })
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether mutations are written to disk.
    pub fn is_persistent(&self) -> bool {
        self.snapshots.is_some()
    }

    /// Inserts or replaces a document and returns its id.
    ///
    /// A document without a non-empty string `id` gets a fresh one, which
    /// is written into the stored document.
    pub fn insert(&self, mut doc: Value) -> Result<String, StoreError> {
        let object = doc.as_object_mut().ok_or_else(|| {
            StoreError::SerializationError("Document must be a JSON object".to_string())
        })?;
        let id = match object.get(ID_FIELD).and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let id = generate_id();
                object.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
        };

        let mut collection = self.collection.write().map_err(|_| StoreError::LockPoisoned)?;
        let previous = collection.upsert(id.clone(), doc);
        if let Err(e) = self.flush(&collection) {
            // Memory must not run ahead of the snapshot.
            match previous {
                Some(doc) => {
                    collection.upsert(id, doc);
                }
                None => {
                    collection.entries.remove(&id);
                }
            }
            return Err(e);
        }
        tracing::debug!("Saved document {} in '{}'", id, self.name);
        Ok(id)
    }

    /// Returns a copy of the document with the given id.
    pub fn get(&self, id: &str) -> Result<Option<Value>, StoreError> {
        let collection = self.collection.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(collection.entries.get(id).map(|entry| entry.doc.clone()))
    }

    /// Returns every document in insertion order.
    pub fn all(&self) -> Result<Vec<Value>, StoreError> {
        let collection = self.collection.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(collection.ordered())
    }

    /// Removes a document. Returns false if there was nothing to remove.
    pub fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut collection = self.collection.write().map_err(|_| StoreError::LockPoisoned)?;
        let Some(entry) = collection.entries.remove(id) else {
            return Ok(false);
        };
        if let Err(e) = self.flush(&collection) {
            // Re-inserting keeps the original sequence number and position.
            collection.entries.insert(id.to_string(), entry);
            return Err(e);
        }
        tracing::debug!("Removed document {} from '{}'", id, self.name);
        Ok(true)
    }

    /// Whether a document with the given id exists.
    pub fn contains(&self, id: &str) -> Result<bool, StoreError> {
        let collection = self.collection.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(collection.entries.contains_key(id))
    }

    /// Number of documents.
    pub fn len(&self) -> Result<usize, StoreError> {
        let collection = self.collection.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(collection.entries.len())
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    // Runs under the write lock so snapshots land in mutation order.
    fn flush(&self, collection: &Collection) -> Result<(), StoreError> {
        if let Some(snapshots) = &self.snapshots {
            snapshots.save(&collection.ordered()).map_err(|e| {
                tracing::error!("Failed to flush collection '{}': {}", self.name, e);
                e
            })?;
        }
        Ok(())
    }
}

fn document_id(doc: &Value) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

/// Generates a 32-character lowercase hex identity.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
