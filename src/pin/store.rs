//! Durable media for the pin set

use crate::error::PinError;
use crate::pin::{PinMode, PinSet};
use crate::types::ContentId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

const PIN_FILE_VERSION: u32 = 1;

/// Durable pin set storage
///
/// `replace` must be all-or-nothing: after a failed or interrupted call the
/// previously persisted set is still what `load` returns.
pub trait PinStore: Send + Sync {
    fn load(&self) -> Result<PinSet, PinError>;
    fn replace(&self, pins: &PinSet) -> Result<(), PinError>;
}

/// On-disk record for one pin
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PinRecord {
    id: ContentId,
    recursive: bool,
}

/// Single-file pin store: 4-byte LE version, then bincode(Vec<PinRecord>).
///
/// Replaced atomically via temp file + fsync + rename.
pub struct FilePinStore {
    path: PathBuf,
}

impl FilePinStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "pins".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn encode(pins: &PinSet) -> Result<Vec<u8>, PinError> {
        let records: Vec<PinRecord> = pins
            .iter()
            .map(|(id, mode)| PinRecord {
                id: *id,
                recursive: mode.is_recursive(),
            })
            .collect();

        let payload = bincode::serialize(&records)
            .map_err(|e| PinError::Persistence(format!("Failed to serialize pin set: {}", e)))?;
        let mut serialized = Vec::with_capacity(4 + payload.len());
        serialized.extend_from_slice(&PIN_FILE_VERSION.to_le_bytes());
        serialized.extend_from_slice(&payload);
        Ok(serialized)
    }

    fn write_temp(&self, temp_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = File::create(temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}

impl PinStore for FilePinStore {
    fn load(&self) -> Result<PinSet, PinError> {
        if !self.path.exists() {
            return Ok(PinSet::new());
        }

        let bytes = fs::read(&self.path).map_err(|e| {
            PinError::Persistence(format!("Failed to read pin set from {:?}: {}", self.path, e))
        })?;

        if bytes.len() < 4 {
            return Err(PinError::Persistence("Pin set file too short".to_string()));
        }
        let version = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if version != PIN_FILE_VERSION {
            return Err(PinError::Persistence(format!(
                "Unsupported pin set version: {}",
                version
            )));
        }

        let records: Vec<PinRecord> = bincode::deserialize(&bytes[4..]).map_err(|e| {
            PinError::Persistence(format!("Failed to deserialize pin set: {}", e))
        })?;

        Ok(records
            .into_iter()
            .map(|r| (r.id, PinMode::from_recursive(r.recursive)))
            .collect())
    }

    fn replace(&self, pins: &PinSet) -> Result<(), PinError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PinError::Persistence(format!(
                    "Failed to create parent directory {:?}: {}",
                    parent, e
                ))
            })?;
        }

        let serialized = Self::encode(pins)?;
        let temp_path = self.temp_path();

        self.write_temp(&temp_path, &serialized).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            PinError::Persistence(format!("Failed to write pin set to {:?}: {}", temp_path, e))
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            PinError::Persistence(format!("Failed to rename temp file to {:?}: {}", self.path, e))
        })?;

        // Persist the rename itself; not supported everywhere.
        if let Some(parent) = self.path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        debug!(path = %self.path.display(), pins = pins.len(), "Pin set replaced");
        Ok(())
    }
}

/// In-memory durable stub with write-failure and latency injection
#[derive(Default)]
pub struct MemoryPinStore {
    durable: Mutex<PinSet>,
    failures_pending: AtomicUsize,
    write_delay: Mutex<Option<Duration>>,
    writes: AtomicUsize,
}

impl MemoryPinStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-persisted set
    pub fn with_pins(pins: PinSet) -> Self {
        Self {
            durable: Mutex::new(pins),
            ..Self::default()
        }
    }

    /// Make the next `count` calls to `replace` fail without touching durable state
    pub fn fail_next_writes(&self, count: usize) {
        self.failures_pending.store(count, Ordering::SeqCst);
    }

    /// Make every `replace` block for `delay` before writing
    pub fn delay_writes(&self, delay: Duration) {
        *self.write_delay.lock() = Some(delay);
    }

    /// Currently persisted pin set
    pub fn snapshot(&self) -> PinSet {
        self.durable.lock().clone()
    }

    /// Number of successful `replace` calls
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl PinStore for MemoryPinStore {
    fn load(&self) -> Result<PinSet, PinError> {
        Ok(self.durable.lock().clone())
    }

    fn replace(&self, pins: &PinSet) -> Result<(), PinError> {
        let injected = self
            .failures_pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(PinError::Persistence("injected write failure".to_string()));
        }

        let delay = *self.write_delay.lock();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        *self.durable.lock() = pins.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
