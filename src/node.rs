//! Node context
//!
//! Pairs a Content Store with the Pin Manager that protects its contents.
//! Passed explicitly to everything that seeds or pins; there is no global
//! pin state.

use crate::config::StorageConfig;
use crate::error::{ApiError, PinError};
use crate::pin::{FilePinStore, MemoryPinStore, PinManager, PinStore};
use crate::store::{ContentStore, MemoryContentStore, SledContentStore};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Handle to an initialized store and pin manager
#[derive(Clone)]
pub struct Node {
    store: Arc<dyn ContentStore>,
    pins: Arc<PinManager>,
}

impl Node {
    pub fn new(store: Arc<dyn ContentStore>, pins: Arc<PinManager>) -> Self {
        Self { store, pins }
    }

    /// Ephemeral node backed entirely by memory
    pub fn in_memory() -> Result<Self, PinError> {
        Self::with_pin_store(
            Arc::new(MemoryContentStore::new()),
            Arc::new(MemoryPinStore::new()),
        )
    }

    /// Build a node over the given store, loading pins from `durable`
    pub fn with_pin_store(
        store: Arc<dyn ContentStore>,
        durable: Arc<dyn PinStore>,
    ) -> Result<Self, PinError> {
        let pins = PinManager::load(durable)?;
        Ok(Self::new(store, Arc::new(pins)))
    }

    /// Open the on-disk repository at `repo_root`
    pub fn open(repo_root: &Path, storage: &StorageConfig) -> Result<Self, ApiError> {
        storage.validate().map_err(ApiError::ConfigError)?;

        let store_path = storage.store_path(repo_root);
        let pins_path = storage.pins_path(repo_root);

        let store = SledContentStore::new(&store_path)?;
        let node = Self::with_pin_store(Arc::new(store), Arc::new(FilePinStore::new(&pins_path)))?;

        info!(
            store = %store_path.display(),
            pins = %pins_path.display(),
            pinned = node.pins.len(),
            "Opened repository"
        );
        Ok(node)
    }

    pub fn store(&self) -> &dyn ContentStore {
        self.store.as_ref()
    }

    /// Shared handle to the store, for work moved onto other threads
    pub fn store_handle(&self) -> Arc<dyn ContentStore> {
        Arc::clone(&self.store)
    }

    pub fn pins(&self) -> &Arc<PinManager> {
        &self.pins
    }
}
