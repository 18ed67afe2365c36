//! Pin Manager
//!
//! Tracks which ContentIds are protected from garbage collection. Pins are
//! records of intent: a recursive pin is only expanded into the identifiers it
//! protects when a collector asks for the live set.
//!
//! Lifecycle: load at start, mutate in memory, flush on demand.

pub mod store;

pub use store::{FilePinStore, MemoryPinStore, PinStore};

use crate::dag::codec;
use crate::error::PinError;
use crate::store::ContentStore;
use crate::types::ContentId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// How much a pin protects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinMode {
    /// Only the identifier itself
    Direct,
    /// The identifier and everything reachable from it
    Recursive,
}

impl PinMode {
    pub fn from_recursive(recursive: bool) -> Self {
        if recursive {
            PinMode::Recursive
        } else {
            PinMode::Direct
        }
    }

    pub fn is_recursive(self) -> bool {
        matches!(self, PinMode::Recursive)
    }
}

impl std::fmt::Display for PinMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PinMode::Direct => f.write_str("direct"),
            PinMode::Recursive => f.write_str("recursive"),
        }
    }
}

/// Pinned identifiers and their modes
pub type PinSet = BTreeMap<ContentId, PinMode>;

/// Effect of a `pin` call on the in-memory set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinChange {
    Added,
    Unchanged,
    ModeChanged { from: PinMode },
}

struct PinState {
    pins: PinSet,
    dirty: bool,
}

/// Owner of the pin set
///
/// All mutation and flushing goes through one mutex, so a flush always
/// writes a consistent snapshot.
pub struct PinManager {
    durable: Arc<dyn PinStore>,
    state: Mutex<PinState>,
}

impl PinManager {
    /// Load the persisted pin set from the durable store
    pub fn load(durable: Arc<dyn PinStore>) -> Result<Self, PinError> {
        let pins = durable.load()?;
        debug!(pins = pins.len(), "Loaded pin set");
        Ok(Self {
            durable,
            state: Mutex::new(PinState { pins, dirty: false }),
        })
    }

    /// Record a pin. Re-pinning with the same mode is a no-op; a different
    /// mode replaces the old one.
    pub fn pin(&self, id: ContentId, mode: PinMode) -> PinChange {
        let mut state = self.state.lock();
        let change = match state.pins.insert(id, mode) {
            None => PinChange::Added,
            Some(previous) if previous == mode => PinChange::Unchanged,
            Some(previous) => PinChange::ModeChanged { from: previous },
        };
        if change != PinChange::Unchanged {
            state.dirty = true;
        }
        debug!(id = %id.short(), %mode, ?change, "Pin recorded");
        change
    }

    /// Remove a pin, returning the mode it had
    pub fn unpin(&self, id: &ContentId) -> Result<PinMode, PinError> {
        let mut state = self.state.lock();
        let mode = state.pins.remove(id).ok_or(PinError::NotPinned(*id))?;
        state.dirty = true;
        debug!(id = %id.short(), %mode, "Pin removed");
        Ok(mode)
    }

    pub fn mode(&self, id: &ContentId) -> Option<PinMode> {
        self.state.lock().pins.get(id).copied()
    }

    pub fn is_pinned(&self, id: &ContentId) -> bool {
        self.state.lock().pins.contains_key(id)
    }

    /// All pins, ordered by identifier
    pub fn list(&self) -> Vec<(ContentId, PinMode)> {
        self.state
            .lock()
            .pins
            .iter()
            .map(|(id, mode)| (*id, *mode))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether in-memory changes have not reached durable storage yet
    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }

    /// Persist the current pin set.
    ///
    /// On failure the in-memory set is unchanged and the call can be retried.
    #[instrument(skip(self))]
    pub fn flush(&self) -> Result<(), PinError> {
        let mut state = self.state.lock();
        self.durable.replace(&state.pins)?;
        state.dirty = false;
        debug!(pins = state.pins.len(), "Pin set flushed");
        Ok(())
    }

    /// Flush on a blocking thread, giving up after `timeout`.
    ///
    /// A timed-out write may still complete in the background; since the
    /// durable store replaces atomically, the persisted set is either the old
    /// or the new one.
    pub async fn flush_within(self: &Arc<Self>, timeout: Duration) -> Result<(), PinError> {
        let manager = Arc::clone(self);
        let task = tokio::task::spawn_blocking(move || manager.flush());

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(PinError::Persistence(format!("Flush task failed: {}", e))),
            Err(_) => {
                warn!(?timeout, "Pin set flush timed out");
                Err(PinError::FlushTimeout(timeout))
            }
        }
    }

    /// Every identifier the current pins protect.
    ///
    /// Direct pins contribute themselves; recursive pins contribute everything
    /// reachable through committed directories. Missing objects are skipped.
    #[instrument(skip_all)]
    pub fn live_set(&self, store: &dyn ContentStore) -> Result<BTreeSet<ContentId>, PinError> {
        let pins = self.list();
        let mut live = BTreeSet::new();
        let mut pending = Vec::new();

        for (id, mode) in pins {
            live.insert(id);
            if mode.is_recursive() {
                pending.push(id);
            }
        }

        let mut walked = HashSet::new();
        while let Some(id) = pending.pop() {
            live.insert(id);
            if !walked.insert(id) {
                continue;
            }

            match store.get(&id)? {
                Some(bytes) if codec::is_directory(&bytes) => match codec::decode(&bytes) {
                    Ok(node) => pending.extend(node.entries().iter().map(|e| e.target)),
                    Err(e) => warn!(id = %id.short(), error = %e, "Undecodable directory, treating as leaf"),
                },
                Some(_) => {}
                None => warn!(id = %id.short(), "Pinned object missing from store"),
            }
        }

        debug!(live = live.len(), "Computed live set");
        Ok(live)
    }
}
