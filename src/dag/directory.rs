//! Directory node builder

use crate::error::DagError;
use crate::types::ContentId;
use std::collections::HashSet;

/// A single named link in a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub target: ContentId,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>, target: ContentId) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

/// Directory node ready for commit
///
/// Entries enumerate in insertion order. The committed identity only depends
/// on the entry set: see [`DirectoryNode::canonical_entries`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectoryNode {
    entries: Vec<DirectoryEntry>,
}

impl DirectoryNode {
    /// Assemble a node from entries that did not pass through a builder.
    ///
    /// No validation happens here; commit rejects malformed nodes.
    pub fn from_entries(entries: Vec<DirectoryEntry>) -> Self {
        Self { entries }
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Entries sorted byte-wise by name, the order used for serialization
    pub fn canonical_entries(&self) -> Vec<&DirectoryEntry> {
        let mut sorted: Vec<&DirectoryEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        sorted
    }

    pub fn get(&self, name: &str) -> Option<&ContentId> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the invariants commit relies on: valid, unique names
    pub fn validate(&self) -> Result<(), DagError> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        for entry in &self.entries {
            validate_name(&entry.name)?;
            if !seen.insert(entry.name.as_str()) {
                return Err(DagError::DuplicateName(entry.name.clone()));
            }
        }
        Ok(())
    }
}

/// Names must be non-empty single path components other than `.` and `..`
pub fn validate_name(name: &str) -> Result<(), DagError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\0')
    {
        return Err(DagError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Incremental builder for a [`DirectoryNode`]
#[derive(Debug, Default)]
pub struct DirectoryBuilder {
    entries: Vec<DirectoryEntry>,
    names: HashSet<String>,
}

impl DirectoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named child.
    ///
    /// Fails with `DuplicateName` if the name is already present; the
    /// builder's existing entries are left untouched.
    pub fn add_child(&mut self, name: impl Into<String>, target: ContentId) -> Result<(), DagError> {
        let name = name.into();
        validate_name(&name)?;
        if self.names.contains(&name) {
            return Err(DagError::DuplicateName(name));
        }
        self.names.insert(name.clone());
        self.entries.push(DirectoryEntry { name, target });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> DirectoryNode {
        DirectoryNode {
            entries: self.entries,
        }
    }
}
