//! Storage backend trait

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

use crate::{
    entry::Entry,
    error::{FsError, FsResult},
    operations::*,
    UnifiedPath,
};

/// Byte stream type
pub type ByteStream = Pin<Box<dyn Stream<Item = FsResult<Bytes>> + Send>>;

/// A concrete storage driver behind one path scheme.
///
/// Implementations catch their native errors and normalize them through
/// [`FsError`] before returning; callers only ever see the taxonomy.
#[async_trait]
pub trait FsBackend: Send + Sync {
    /// Short name used in log output (`"local"`, `"hdfs"`, ...).
    fn scheme_name(&self) -> &str;

    /// Whether the backend can currently serve requests.
    async fn is_available(&self) -> bool;

    async fn stat(&self, path: &UnifiedPath) -> FsResult<Entry>;

    async fn exists(&self, path: &UnifiedPath) -> FsResult<bool> {
        match self.stat(path).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn read(&self, path: &UnifiedPath, options: &ReadOptions) -> FsResult<ByteStream>;

    async fn write(&self, path: &UnifiedPath, data: Bytes, options: &WriteOptions)
        -> FsResult<Entry>;

    async fn write_stream(
        &self,
        path: &UnifiedPath,
        mut stream: ByteStream,
        options: &WriteOptions,
    ) -> FsResult<Entry> {
        use futures::StreamExt;

        let mut data = Vec::new();
        while let Some(chunk) = stream.next().await {
            data.extend_from_slice(&chunk?);
        }
        self.write(path, Bytes::from(data), options).await
    }

    async fn create_dir(&self, path: &UnifiedPath, options: &MkdirOptions) -> FsResult<()>;

    async fn delete(&self, path: &UnifiedPath, options: &DeleteOptions) -> FsResult<()>;

    async fn list_dir(&self, path: &UnifiedPath, options: &ListOptions) -> FsResult<Vec<Entry>>;

    /// Backend-native copy between two paths on this backend. Backends
    /// without one keep the default; callers fall back to a streamed copy.
    async fn copy_within(
        &self,
        _source: &UnifiedPath,
        _dest: &UnifiedPath,
        _options: &CopyOptions,
    ) -> FsResult<Entry> {
        Err(FsError::Unsupported(format!(
            "{} backend has no native copy",
            self.scheme_name()
        )))
    }
}
