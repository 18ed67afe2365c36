//! Canonical byte encoding for directory nodes
//!
//! Layout:
//!
//! ```text
//! "PSDIR" || version (1 byte) || entry_count (u64 BE)
//!   || for each entry, sorted byte-wise by name:
//!        name_len (u32 BE) || name || target (32 bytes)
//! ```
//!
//! The same entry set always encodes to the same bytes, so it always commits
//! to the same ContentId regardless of insertion order.

use crate::dag::directory::{validate_name, DirectoryEntry, DirectoryNode};
use crate::error::DagError;
use crate::types::{ContentId, CONTENT_ID_LEN};

pub const DIRECTORY_MAGIC: &[u8; 5] = b"PSDIR";
pub const DIRECTORY_VERSION: u8 = 1;

const HEADER_LEN: usize = DIRECTORY_MAGIC.len() + 1 + 8;

/// Serialize a directory node in canonical order
pub fn encode(node: &DirectoryNode) -> Result<Vec<u8>, DagError> {
    node.validate()
        .map_err(|e| DagError::Serialization(format!("malformed directory: {}", e)))?;

    let canonical = node.canonical_entries();
    let body_len: usize = canonical
        .iter()
        .map(|e| 4 + e.name.len() + CONTENT_ID_LEN)
        .sum();

    let mut out = Vec::with_capacity(HEADER_LEN + body_len);
    out.extend_from_slice(DIRECTORY_MAGIC);
    out.push(DIRECTORY_VERSION);
    out.extend_from_slice(&(canonical.len() as u64).to_be_bytes());

    for entry in canonical {
        let name = entry.name.as_bytes();
        let name_len = u32::try_from(name.len()).map_err(|_| {
            DagError::Serialization(format!("entry name too long: {} bytes", name.len()))
        })?;
        out.extend_from_slice(&name_len.to_be_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(entry.target.as_bytes());
    }

    Ok(out)
}

/// Whether the bytes carry the directory header
pub fn is_directory(bytes: &[u8]) -> bool {
    bytes.len() >= HEADER_LEN
        && &bytes[..DIRECTORY_MAGIC.len()] == DIRECTORY_MAGIC
        && bytes[DIRECTORY_MAGIC.len()] == DIRECTORY_VERSION
}

/// Parse a canonical encoding back into a directory node
///
/// Entries come back in canonical order. Non-canonical input (unsorted or
/// duplicate names, trailing bytes) is rejected.
pub fn decode(bytes: &[u8]) -> Result<DirectoryNode, DagError> {
    let mut reader = Reader { bytes, pos: 0 };

    let magic = reader.take(DIRECTORY_MAGIC.len())?;
    if magic != DIRECTORY_MAGIC {
        return Err(DagError::Serialization("not a directory node".to_string()));
    }
    let version = reader.take(1)?[0];
    if version != DIRECTORY_VERSION {
        return Err(DagError::Serialization(format!(
            "unsupported directory version: {}",
            version
        )));
    }

    let count = u64::from_be_bytes(reader.array::<8>()?);
    let mut entries: Vec<DirectoryEntry> = Vec::new();

    for _ in 0..count {
        let name_len = u32::from_be_bytes(reader.array::<4>()?) as usize;
        let name = std::str::from_utf8(reader.take(name_len)?)
            .map_err(|e| DagError::Serialization(format!("entry name is not UTF-8: {}", e)))?
            .to_string();
        validate_name(&name)
            .map_err(|e| DagError::Serialization(format!("malformed entry: {}", e)))?;
        let target = ContentId::from_bytes(reader.array::<CONTENT_ID_LEN>()?);

        if let Some(prev) = entries.last() {
            if prev.name.as_bytes() >= name.as_bytes() {
                return Err(DagError::Serialization(format!(
                    "entries out of canonical order at {:?}",
                    name
                )));
            }
        }
        entries.push(DirectoryEntry { name, target });
    }

    if reader.pos != bytes.len() {
        return Err(DagError::Serialization(format!(
            "{} trailing bytes after directory",
            bytes.len() - reader.pos
        )));
    }

    Ok(DirectoryNode::from_entries(entries))
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], DagError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| DagError::Serialization("truncated directory node".to_string()))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DagError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}
