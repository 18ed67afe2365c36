//! Error types for the seeding pipeline and its storage layers.

use crate::types::{ContentId, InvalidContentId};
use std::time::Duration;
use thiserror::Error;

/// Content store errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Content store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Stored object corrupt: {0}")]
    Corrupt(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Directory building and commit errors
#[derive(Debug, Error)]
pub enum DagError {
    #[error("Duplicate directory entry name: {0}")]
    DuplicateName(String),

    #[error("Invalid directory entry name: {0:?}")]
    InvalidName(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid content identifier: {0}")]
    InvalidId(#[from] InvalidContentId),

    #[error("Object not found: {0}")]
    NotFound(ContentId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Pin manager errors
#[derive(Debug, Error)]
pub enum PinError {
    #[error("Not pinned: {0}")]
    NotPinned(ContentId),

    #[error("Pin set persistence failed: {0}")]
    Persistence(String),

    #[error("Pin set flush timed out after {0:?}")]
    FlushTimeout(Duration),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Seeding phase a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPhase {
    Add,
    Accumulate,
    Commit,
    Persist,
}

impl std::fmt::Display for SeedPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SeedPhase::Add => "add",
            SeedPhase::Accumulate => "accumulate",
            SeedPhase::Commit => "commit",
            SeedPhase::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// Coarse error classification surfaced to callers for alerting and retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StoreUnavailable,
    DuplicateName,
    SerializationError,
    PersistenceError,
    /// Caller asked for something that does not apply, e.g. unpinning an unpinned id
    InvalidArgument,
}

impl ErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::StoreUnavailable | ErrorKind::PersistenceError)
    }
}

/// Asset seeding errors, tagged with the phase and (where relevant) the asset
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("assets: could not add '{name}': {source}")]
    AddAsset {
        name: String,
        #[source]
        source: StorageError,
    },

    #[error("assets: could not add '{name}' as a child: {source}")]
    AddChild {
        name: String,
        #[source]
        source: DagError,
    },

    #[error("assets: committing directory failed: {0}")]
    Commit(#[source] DagError),

    #[error("assets: pin flush failed: {0}")]
    Flush(#[source] PinError),
}

impl SeedError {
    pub fn phase(&self) -> SeedPhase {
        match self {
            SeedError::AddAsset { .. } => SeedPhase::Add,
            SeedError::AddChild { .. } => SeedPhase::Accumulate,
            SeedError::Commit(_) => SeedPhase::Commit,
            SeedError::Flush(_) => SeedPhase::Persist,
        }
    }

    /// Name of the asset involved, for per-asset phases
    pub fn asset(&self) -> Option<&str> {
        match self {
            SeedError::AddAsset { name, .. } | SeedError::AddChild { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SeedError::AddAsset { source, .. } => source.kind(),
            SeedError::AddChild { source, .. } | SeedError::Commit(source) => source.kind(),
            SeedError::Flush(source) => source.kind(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::Corrupt(_) => ErrorKind::SerializationError,
            StorageError::StoreUnavailable(_) | StorageError::IoError(_) => {
                ErrorKind::StoreUnavailable
            }
        }
    }
}

impl DagError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DagError::DuplicateName(_) => ErrorKind::DuplicateName,
            DagError::InvalidName(_)
            | DagError::Serialization(_)
            | DagError::InvalidId(_)
            | DagError::NotFound(_) => ErrorKind::SerializationError,
            DagError::Storage(e) => e.kind(),
        }
    }
}

impl PinError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PinError::Persistence(_) | PinError::FlushTimeout(_) => ErrorKind::PersistenceError,
            PinError::NotPinned(_) => ErrorKind::InvalidArgument,
            PinError::Storage(e) => e.kind(),
        }
    }
}

/// Errors at the configuration, logging and command layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error(transparent)]
    Dag(#[from] DagError),

    #[error(transparent)]
    Pin(#[from] PinError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
