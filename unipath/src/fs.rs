//! Closed scheme dispatch over the configured backends

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use std::sync::Arc;
use unipath_core::{
    backend::{ByteStream, FsBackend},
    entry::Entry,
    error::{FsError, FsResult},
    operations::*,
    Scheme, UnifiedPath,
};
use unipath_providers::LocalBackend;

#[cfg(feature = "hdfs")]
use unipath_providers::{HdfsBackend, HdfsConfig};

/// One interface for path operations regardless of where the path lives.
///
/// Holds exactly one backend per scheme: the local filesystem always, the
/// distributed side only when configured. Dispatch is a closed match on the
/// path's scheme tag; an operation on a distributed path with no distributed
/// backend configured fails with [`FsError::BackendUnavailable`].
pub struct UnifiedFs {
    local: LocalBackend,
    distributed: Option<Arc<dyn FsBackend>>,
}

impl UnifiedFs {
    /// Local filesystem only; distributed paths fail `BackendUnavailable`.
    pub fn local_only() -> Self {
        Self {
            local: LocalBackend::new(),
            distributed: None,
        }
    }

    /// Use `distributed` to serve `hdfs://`/`viewfs://` paths. Accepts any
    /// backend, which is how tests substitute an in-memory one for a
    /// cluster.
    pub fn with_distributed(distributed: Arc<dyn FsBackend>) -> Self {
        Self {
            local: LocalBackend::new(),
            distributed: Some(distributed),
        }
    }

    /// Serve distributed paths from HDFS with the given configuration.
    /// The connection is established lazily, on first use.
    #[cfg(feature = "hdfs")]
    pub fn with_hdfs(config: HdfsConfig) -> Self {
        Self::with_distributed(Arc::new(HdfsBackend::new(config)))
    }

    pub(crate) fn backend_for(&self, path: &UnifiedPath) -> FsResult<&dyn FsBackend> {
        match path.scheme() {
            Scheme::Local => Ok(&self.local),
            Scheme::Hdfs => self.distributed.as_deref().ok_or_else(|| {
                FsError::BackendUnavailable(format!(
                    "no distributed backend configured for {path}"
                ))
            }),
        }
    }

    pub async fn exists(&self, path: &UnifiedPath) -> FsResult<bool> {
        self.backend_for(path)?.exists(path).await
    }

    pub async fn stat(&self, path: &UnifiedPath) -> FsResult<Entry> {
        self.backend_for(path)?.stat(path).await
    }

    /// True if the path points to a regular file; false when missing.
    pub async fn is_file(&self, path: &UnifiedPath) -> FsResult<bool> {
        match self.stat(path).await {
            Ok(entry) => Ok(entry.is_file()),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// True if the path points to a directory; false when missing.
    pub async fn is_dir(&self, path: &UnifiedPath) -> FsResult<bool> {
        match self.stat(path).await {
            Ok(entry) => Ok(entry.is_directory()),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Full file contents.
    pub async fn read(&self, path: &UnifiedPath) -> FsResult<Bytes> {
        let mut stream = self.read_stream(path, &ReadOptions::default()).await?;
        let mut buffer = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer.freeze())
    }

    pub async fn read_stream(
        &self,
        path: &UnifiedPath,
        options: &ReadOptions,
    ) -> FsResult<ByteStream> {
        self.backend_for(path)?.read(path, options).await
    }

    /// Write `data`, replacing an existing file and creating parents.
    pub async fn write(&self, path: &UnifiedPath, data: Bytes) -> FsResult<Entry> {
        self.write_with(path, data, &WriteOptions::replace()).await
    }

    pub async fn write_with(
        &self,
        path: &UnifiedPath,
        data: Bytes,
        options: &WriteOptions,
    ) -> FsResult<Entry> {
        self.backend_for(path)?.write(path, data, options).await
    }

    pub async fn create_dir(&self, path: &UnifiedPath, options: &MkdirOptions) -> FsResult<()> {
        self.backend_for(path)?.create_dir(path, options).await
    }

    /// Delete a file. Fails `NotFound` when missing and `IsADirectory` on a
    /// directory; use [`UnifiedFs::delete_dir`] for those.
    pub async fn delete(&self, path: &UnifiedPath) -> FsResult<()> {
        let backend = self.backend_for(path)?;
        let entry = backend.stat(path).await?;
        if entry.is_directory() {
            return Err(FsError::IsADirectory(path.to_string()));
        }
        backend.delete(path, &DeleteOptions::default()).await
    }

    /// Delete a directory, recursively when asked. Fails `NotADirectory` on
    /// a file.
    pub async fn delete_dir(&self, path: &UnifiedPath, recursive: bool) -> FsResult<()> {
        let backend = self.backend_for(path)?;
        let entry = backend.stat(path).await?;
        if !entry.is_directory() {
            return Err(FsError::NotADirectory(path.to_string()));
        }
        let options = DeleteOptions {
            recursive,
            ..Default::default()
        };
        backend.delete(path, &options).await
    }

    /// Directory contents as paths.
    pub async fn list_dir(&self, path: &UnifiedPath) -> FsResult<Vec<UnifiedPath>> {
        let entries = self.list_dir_entries(path, &ListOptions::default()).await?;
        Ok(entries.into_iter().map(|e| e.path).collect())
    }

    pub async fn list_dir_entries(
        &self,
        path: &UnifiedPath,
        options: &ListOptions,
    ) -> FsResult<Vec<Entry>> {
        self.backend_for(path)?.list_dir(path, options).await
    }

    /// Directory contents matching a glob pattern, local paths only.
    /// Distributed paths fail `Unsupported`: HDFS has no glob primitive.
    pub async fn glob(&self, dir: &UnifiedPath, pattern: &str) -> FsResult<Vec<UnifiedPath>> {
        if !dir.is_local() {
            return Err(FsError::Unsupported(format!(
                "glob is not supported on distributed paths: {dir}"
            )));
        }

        let full = format!("{}/{}", dir.as_str().trim_end_matches('/'), pattern);
        let paths = glob::glob(&full)
            .map_err(|e| FsError::InvalidPath(format!("bad glob pattern {full}: {e}")))?;

        let mut matches = Vec::new();
        for item in paths {
            let path = item.map_err(|e| {
                let display = e.path().display().to_string();
                FsError::from_io(e.into_error(), display)
            })?;
            matches.push(UnifiedPath::from(path));
        }
        Ok(matches)
    }
}

impl Default for UnifiedFs {
    fn default() -> Self {
        Self::local_only()
    }
}
