//! Merkle DAG directories
//!
//! Directory nodes link names to ContentIds. Committing a node stores its
//! canonical encoding in the Content Store; the resulting ContentId is the
//! directory's root key.

pub mod codec;
pub mod directory;

pub use directory::{DirectoryBuilder, DirectoryEntry, DirectoryNode};

use crate::error::DagError;
use crate::store::ContentStore;
use crate::types::ContentId;
use tracing::{debug, instrument};

/// Serialize a directory node canonically and add it to the store
#[instrument(skip_all, fields(entries = node.len()))]
pub fn commit(store: &dyn ContentStore, node: &DirectoryNode) -> Result<ContentId, DagError> {
    let bytes = codec::encode(node)?;
    let root = store.add(&bytes)?;
    debug!(root = %root, size = bytes.len(), "Committed directory");
    Ok(root)
}

/// Load and decode a committed directory
pub fn load_directory(store: &dyn ContentStore, id: &ContentId) -> Result<DirectoryNode, DagError> {
    let bytes = store.get(id)?.ok_or(DagError::NotFound(*id))?;
    codec::decode(&bytes)
}
