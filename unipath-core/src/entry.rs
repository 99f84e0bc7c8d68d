//! File system entries

use crate::UnifiedPath;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entry kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Unknown,
}

/// Metadata a backend can report about an entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub size: Option<u64>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    /// Unix mode bits where the backend exposes them.
    pub mode: Option<u32>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }
}

/// A file system entry as reported by a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub path: UnifiedPath,
    pub kind: EntryKind,
    pub metadata: Metadata,
}

impl Entry {
    pub fn file(path: UnifiedPath, metadata: Metadata) -> Self {
        Self {
            path,
            kind: EntryKind::File,
            metadata,
        }
    }

    pub fn directory(path: UnifiedPath, metadata: Metadata) -> Self {
        Self {
            path,
            kind: EntryKind::Directory,
            metadata,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn name(&self) -> Option<&str> {
        self.path.name()
    }

    pub fn size(&self) -> Option<u64> {
        self.metadata.size
    }
}
