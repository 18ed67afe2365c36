//! Asset Seeder
//!
//! Turns an ordered list of named byte blobs into one pinned directory:
//!
//! 1. add every asset to the content store (abort on the first failure)
//! 2. link each asset into a directory builder under its base name
//! 3. commit the directory, producing the root key
//! 4. pin the root recursively
//! 5. flush the pin set
//!
//! Every step is idempotent, so after any failure the whole call can simply
//! be repeated.

pub mod bundled;

use crate::config::SeedConfig;
use crate::dag::{self, DirectoryBuilder};
use crate::error::{SeedError, StorageError};
use crate::node::Node;
use crate::pin::{PinManager, PinMode};
use crate::store::ContentStore;
use crate::types::ContentId;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument};

/// One named asset to seed
#[derive(Debug, Clone)]
pub struct Asset {
    path: PathBuf,
    bytes: Arc<[u8]>,
}

/// Ordered assets making up one directory
pub type AssetList = Vec<Asset>;

impl Asset {
    pub fn new(path: impl Into<PathBuf>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
        }
    }

    /// Logical path the asset was registered under
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Directory entry name: the last component of the logical path
    pub fn name(&self) -> String {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.path.to_string_lossy().into_owned(),
        }
    }
}

/// Tunables for a seeding run
#[derive(Debug, Clone, Copy)]
pub struct SeedOptions {
    /// Bound on the pin flush for [`AssetSeeder::seed_concurrent`]
    pub flush_timeout: Duration,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self::from(&SeedConfig::default())
    }
}

impl From<&SeedConfig> for SeedOptions {
    fn from(config: &SeedConfig) -> Self {
        Self {
            flush_timeout: config.flush_timeout(),
        }
    }
}

/// Seeds asset lists into a node
pub struct AssetSeeder {
    store: Arc<dyn ContentStore>,
    pins: Arc<PinManager>,
    options: SeedOptions,
}

impl AssetSeeder {
    pub fn new(node: &Node) -> Self {
        Self {
            store: node.store_handle(),
            pins: Arc::clone(node.pins()),
            options: SeedOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SeedOptions) -> Self {
        self.options = options;
        self
    }

    /// Seed sequentially and return the root ContentId
    #[instrument(skip_all, fields(assets = assets.len()))]
    pub fn seed(&self, assets: &[Asset]) -> Result<ContentId, SeedError> {
        let start = Instant::now();
        let mut builder = DirectoryBuilder::new();

        for asset in assets {
            let name = asset.name();
            let id = self.store.add(asset.bytes()).map_err(|source| {
                error!(asset = %name, error = %source, "Failed to add asset");
                SeedError::AddAsset {
                    name: name.clone(),
                    source,
                }
            })?;
            debug!(asset = %name, id = %id.short(), size = asset.bytes().len(), "Added asset");
            accumulate(&mut builder, name, id)?;
        }

        let root = self.commit_and_pin(builder)?;
        self.pins.flush().map_err(SeedError::Flush)?;

        info!(root = %root, duration_ms = start.elapsed().as_millis() as u64, "Seeded assets");
        Ok(root)
    }

    /// Seed with concurrent adds and a timeout-bounded flush.
    ///
    /// Produces the same root as [`AssetSeeder::seed`]. When one add fails,
    /// adds already in flight for later assets may still land in the store.
    #[instrument(skip_all, fields(assets = assets.len()))]
    pub async fn seed_concurrent(&self, assets: &[Asset]) -> Result<ContentId, SeedError> {
        let start = Instant::now();

        let adds = assets.iter().map(|asset| {
            let store = Arc::clone(&self.store);
            let bytes = Arc::clone(&asset.bytes);
            let name = asset.name();
            async move {
                let added = match tokio::task::spawn_blocking(move || store.add(&bytes)).await {
                    Ok(result) => result,
                    Err(e) => Err(StorageError::StoreUnavailable(format!(
                        "Add task failed: {}",
                        e
                    ))),
                };
                match added {
                    Ok(id) => Ok((name, id)),
                    Err(source) => {
                        error!(asset = %name, error = %source, "Failed to add asset");
                        Err(SeedError::AddAsset { name, source })
                    }
                }
            }
        });

        // Results come back in list order
        let added = futures::future::try_join_all(adds).await?;

        let mut builder = DirectoryBuilder::new();
        for (name, id) in added {
            debug!(asset = %name, id = %id.short(), "Added asset");
            accumulate(&mut builder, name, id)?;
        }

        let root = self.commit_and_pin(builder)?;
        self.pins
            .flush_within(self.options.flush_timeout)
            .await
            .map_err(SeedError::Flush)?;

        info!(root = %root, duration_ms = start.elapsed().as_millis() as u64, "Seeded assets concurrently");
        Ok(root)
    }

    fn commit_and_pin(&self, builder: DirectoryBuilder) -> Result<ContentId, SeedError> {
        let root = dag::commit(self.store.as_ref(), &builder.build()).map_err(|e| {
            error!(error = %e, "Failed to commit directory");
            SeedError::Commit(e)
        })?;
        // The tree must be durable before a persisted pin can name it
        self.store.sync().map_err(|e| {
            error!(error = %e, "Failed to sync content store");
            SeedError::Commit(e.into())
        })?;
        self.pins.pin(root, PinMode::Recursive);
        Ok(root)
    }
}

fn accumulate(builder: &mut DirectoryBuilder, name: String, id: ContentId) -> Result<(), SeedError> {
    // A duplicate here is a bug in the asset list, not a transient failure
    builder.add_child(name.clone(), id).map_err(|source| {
        error!(asset = %name, error = %source, "Failed to add directory entry");
        SeedError::AddChild { name, source }
    })
}

/// Seed `assets` into `node` with default options
pub fn seed_assets(node: &Node, assets: &[Asset]) -> Result<ContentId, SeedError> {
    AssetSeeder::new(node).seed(assets)
}
