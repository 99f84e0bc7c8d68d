//! Error taxonomy for unipath
//!
//! Backend-native errors are caught at the dispatch boundary and normalized
//! into this enum; nothing is silently swallowed.

use thiserror::Error;

/// Result type alias
pub type FsResult<T> = Result<T, FsError>;

/// Main error type
#[derive(Error, Debug)]
pub enum FsError {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Is a directory: {0}")]
    IsADirectory(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Carrier for backend errors that map to no specific member.
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Normalize an OS/backend error for `path` into the taxonomy.
    pub fn from_io(source: std::io::Error, path: impl Into<String>) -> Self {
        use std::io::ErrorKind;

        let path = path.into();
        match source.kind() {
            ErrorKind::NotFound => FsError::NotFound(path),
            ErrorKind::PermissionDenied => FsError::PermissionDenied(path),
            ErrorKind::AlreadyExists => FsError::AlreadyExists(path),
            ErrorKind::IsADirectory => FsError::IsADirectory(path),
            ErrorKind::NotADirectory => FsError::NotADirectory(path),
            ErrorKind::Unsupported => FsError::Unsupported(path),
            _ => FsError::Io { path, source },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, FsError::BackendUnavailable(_))
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, FsError::Unsupported(_))
    }
}
