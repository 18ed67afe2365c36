//! Persistence layer for the Content Store

use crate::error::StorageError;
use crate::store::ContentStore;
use crate::types::ContentId;
use sled;
use std::path::Path;
use tracing::trace;

/// Sled-based implementation of ContentStore
///
/// Keys are the 32 raw bytes of the ContentId, values the stored bytes.
pub struct SledContentStore {
    db: sled::Db,
}

impl SledContentStore {
    /// Open (or create) a SledContentStore at the given directory
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path).map_err(|e| {
            StorageError::StoreUnavailable(format!("Failed to open sled database: {}", e))
        })?;
        Ok(Self { db })
    }

    /// Get the underlying sled database (for advanced operations)
    pub fn db(&self) -> &sled::Db {
        &self.db
    }
}

impl ContentStore for SledContentStore {
    fn add(&self, bytes: &[u8]) -> Result<ContentId, StorageError> {
        let id = ContentId::of(bytes);

        // Insert only if absent; a concurrent writer of the same bytes wins harmlessly.
        let outcome = self
            .db
            .compare_and_swap(id.as_bytes(), None as Option<&[u8]>, Some(bytes))
            .map_err(|e| {
                StorageError::StoreUnavailable(format!("Failed to add object {}: {}", id, e))
            })?;

        match outcome {
            Ok(()) => trace!(id = %id.short(), size = bytes.len(), "Stored new object"),
            Err(_) => trace!(id = %id.short(), "Object already present"),
        }

        Ok(id)
    }

    fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>, StorageError> {
        let value = self.db.get(id.as_bytes()).map_err(|e| {
            StorageError::StoreUnavailable(format!("Failed to get object {}: {}", id, e))
        })?;

        match value {
            Some(bytes) => {
                if ContentId::of(&bytes) != *id {
                    return Err(StorageError::Corrupt(format!(
                        "object {} does not hash to its key",
                        id
                    )));
                }
                Ok(Some(bytes.to_vec()))
            }
            None => Ok(None),
        }
    }

    fn contains(&self, id: &ContentId) -> Result<bool, StorageError> {
        self.db.contains_key(id.as_bytes()).map_err(|e| {
            StorageError::StoreUnavailable(format!("Failed to check object existence: {}", e))
        })
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.db.len())
    }

    fn sync(&self) -> Result<(), StorageError> {
        let bytes = self.db.flush().map_err(|e| {
            StorageError::StoreUnavailable(format!("Failed to flush database: {}", e))
        })?;
        trace!(bytes, "Flushed content store");
        Ok(())
    }
}
