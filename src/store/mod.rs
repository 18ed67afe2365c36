//! Content Store
//!
//! Add-once, hash-addressed blob storage. Blobs and committed directories
//! both live here, keyed by the BLAKE3 ContentId of their bytes.

pub mod persistence;

pub use persistence::SledContentStore;

use crate::error::StorageError;
use crate::types::ContentId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Content Store interface
///
/// `add` must be idempotent and safe to call concurrently: adding the same
/// bytes twice returns the same identifier and stores them once.
pub trait ContentStore: Send + Sync {
    fn add(&self, bytes: &[u8]) -> Result<ContentId, StorageError>;
    fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>, StorageError>;
    fn contains(&self, id: &ContentId) -> Result<bool, StorageError>;

    /// Number of distinct objects held
    fn len(&self) -> Result<usize, StorageError>;

    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    /// Make every completed `add` durable. No-op for volatile stores.
    fn sync(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// In-memory content store, used for ephemeral nodes and tests
#[derive(Default)]
pub struct MemoryContentStore {
    objects: RwLock<HashMap<ContentId, Vec<u8>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentStore for MemoryContentStore {
    fn add(&self, bytes: &[u8]) -> Result<ContentId, StorageError> {
        let id = ContentId::of(bytes);
        self.objects
            .write()
            .entry(id)
            .or_insert_with(|| bytes.to_vec());
        Ok(id)
    }

    fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.objects.read().get(id).cloned())
    }

    fn contains(&self, id: &ContentId) -> Result<bool, StorageError> {
        Ok(self.objects.read().contains_key(id))
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.objects.read().len())
    }
}
