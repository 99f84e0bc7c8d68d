//! unipath core
//!
//! Core types for the unified local/HDFS path interface: the scheme-tagged
//! [`UnifiedPath`] value, the error taxonomy, and the [`FsBackend`] trait
//! that concrete storage backends implement.

pub mod backend;
pub mod entry;
pub mod error;
pub mod operations;
pub mod path;

pub use backend::{ByteStream, FsBackend};
pub use entry::{Entry, EntryKind, Metadata};
pub use error::{FsError, FsResult};
pub use path::{Scheme, UnifiedPath};
