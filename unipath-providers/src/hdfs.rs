//! HDFS storage backend
//!
//! Binds libhdfs through the [`hdrs`] crate. The client is blocking, so
//! every operation runs on the tokio blocking pool. The connection is
//! established lazily on first use, cached for the lifetime of the backend,
//! and released when the backend is dropped.

use async_trait::async_trait;
use bytes::Bytes;
use std::io::Read;
use std::sync::Arc;
use tokio::sync::OnceCell;
use unipath_core::{
    backend::{ByteStream, FsBackend},
    entry::{Entry, EntryKind, Metadata},
    error::{FsError, FsResult},
    operations::*,
    UnifiedPath,
};

use crate::config::HdfsConfig;

/// HDFS backend over a lazily-connected [`hdrs::Client`].
pub struct HdfsBackend {
    config: HdfsConfig,
    client: OnceCell<Arc<hdrs::Client>>,
}

/// Drop a `scheme://authority` prefix if the name node reported one.
fn strip_uri(path: &str) -> &str {
    match path.find("://") {
        Some(idx) => {
            let rest = &path[idx + 3..];
            match rest.find('/') {
                Some(slash) => &rest[slash..],
                None => "/",
            }
        }
        None => path,
    }
}

fn parent_of(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) if trimmed.len() > 1 => Some("/"),
        Some(idx) => Some(&trimmed[..idx]),
        _ => None,
    }
}

fn entry_from_meta(path: UnifiedPath, meta: &hdrs::Metadata) -> Entry {
    let kind = if meta.is_dir() {
        EntryKind::Directory
    } else if meta.is_file() {
        EntryKind::File
    } else {
        EntryKind::Unknown
    };
    let mut metadata = Metadata::new().with_size(meta.len());
    metadata.modified = Some(meta.modified().into());
    Entry {
        path,
        kind,
        metadata,
    }
}

/// Delete a directory tree bottom-up. libhdfs has a recursive delete, but
/// walking keeps per-entry failures attributable to a concrete path.
fn remove_tree(client: &hdrs::Client, path: &str) -> std::io::Result<()> {
    for meta in client.read_dir(path)? {
        let child = strip_uri(meta.path()).to_string();
        if meta.is_dir() {
            remove_tree(client, &child)?;
        } else {
            client.remove_file(&child)?;
        }
    }
    client.remove_dir(path)
}

impl HdfsBackend {
    pub fn new(config: HdfsConfig) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> FsResult<Arc<hdrs::Client>> {
        self.client
            .get_or_try_init(|| async {
                self.config.validate()?;
                let name_node = self.config.name_node.clone();
                let user = self.config.user.clone();
                tracing::debug!(name_node = %name_node, "connecting to HDFS");

                let client = tokio::task::spawn_blocking(move || {
                    let builder = hdrs::ClientBuilder::new(&name_node);
                    let builder = match &user {
                        Some(user) => builder.with_user(user),
                        None => builder,
                    };
                    builder.connect()
                })
                .await
                .map_err(|e| FsError::BackendUnavailable(format!("HDFS connect task: {e}")))?
                .map_err(|e| {
                    tracing::warn!(error = %e, "HDFS connection failed");
                    FsError::BackendUnavailable(format!(
                        "cannot connect to name node {}: {e}",
                        self.config.name_node
                    ))
                })?;

                Ok(Arc::new(client))
            })
            .await
            .cloned()
    }

    fn remote_path(&self, path: &UnifiedPath) -> FsResult<String> {
        if !path.is_hdfs() {
            return Err(FsError::InvalidPath(format!("not an HDFS path: {path}")));
        }
        Ok(path.fs_path().to_string())
    }

    async fn run<T, F>(&self, path: &UnifiedPath, f: F) -> FsResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&hdrs::Client) -> std::io::Result<T> + Send + 'static,
    {
        let client = self.client().await?;
        let display = path.to_string();
        tokio::task::spawn_blocking(move || f(&client))
            .await
            .map_err(|e| FsError::Io {
                path: display.clone(),
                source: std::io::Error::other(e),
            })?
            .map_err(|e| FsError::from_io(e, display))
    }
}

#[async_trait]
impl FsBackend for HdfsBackend {
    fn scheme_name(&self) -> &str {
        "hdfs"
    }

    async fn is_available(&self) -> bool {
        self.client().await.is_ok()
    }

    async fn stat(&self, path: &UnifiedPath) -> FsResult<Entry> {
        let remote = self.remote_path(path)?;
        let owned = path.clone();
        self.run(path, move |client| {
            let meta = client.metadata(&remote)?;
            Ok(entry_from_meta(owned, &meta))
        })
        .await
    }

    async fn read(&self, path: &UnifiedPath, options: &ReadOptions) -> FsResult<ByteStream> {
        let remote = self.remote_path(path)?;
        let range = options.range;
        let bytes = self
            .run(path, move |client| {
                let meta = client.metadata(&remote)?;
                if meta.is_dir() {
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::IsADirectory,
                        "is a directory",
                    ));
                }
                let mut file = client.open_file().read(true).open(&remote)?;
                let mut buffer = Vec::new();
                match range {
                    Some((start, end)) => {
                        use std::io::Seek;
                        file.seek(std::io::SeekFrom::Start(start))?;
                        file.take(end.saturating_sub(start)).read_to_end(&mut buffer)?;
                    }
                    None => {
                        file.read_to_end(&mut buffer)?;
                    }
                }
                Ok(Bytes::from(buffer))
            })
            .await?;
        Ok(Box::pin(futures::stream::once(async { Ok(bytes) })))
    }

    async fn write(
        &self,
        path: &UnifiedPath,
        data: Bytes,
        options: &WriteOptions,
    ) -> FsResult<Entry> {
        let remote = self.remote_path(path)?;
        let owned = path.clone();
        let options = options.clone();
        self.run(path, move |client| {
            if client.metadata(&remote).is_ok() && !options.overwrite {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "already exists",
                ));
            }
            if options.create_parents {
                if let Some(parent) = parent_of(&remote) {
                    // hdfs mkdirs is create_dir_all.
                    client.create_dir(parent)?;
                }
            }
            let mut file = client.open_file().write(true).create(true).open(&remote)?;
            use std::io::Write;
            file.write_all(&data)?;
            file.flush()?;
            drop(file);

            let meta = client.metadata(&remote)?;
            Ok(entry_from_meta(owned, &meta))
        })
        .await
    }

    async fn create_dir(&self, path: &UnifiedPath, options: &MkdirOptions) -> FsResult<()> {
        let remote = self.remote_path(path)?;
        let options = options.clone();
        self.run(path, move |client| {
            if let Ok(meta) = client.metadata(&remote) {
                if meta.is_dir() && options.exist_ok {
                    return Ok(());
                }
                return Err(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "already exists",
                ));
            }
            if !options.parents {
                if let Some(parent) = parent_of(&remote) {
                    client.metadata(parent)?;
                }
            }
            client.create_dir(&remote)
        })
        .await
    }

    async fn delete(&self, path: &UnifiedPath, options: &DeleteOptions) -> FsResult<()> {
        let remote = self.remote_path(path)?;
        let options = options.clone();
        self.run(path, move |client| {
            let meta = match client.metadata(&remote) {
                Ok(meta) => meta,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound && options.force => {
                    return Ok(())
                }
                Err(e) => return Err(e),
            };
            if meta.is_dir() {
                if options.recursive {
                    remove_tree(client, &remote)
                } else {
                    client.remove_dir(&remote)
                }
            } else {
                client.remove_file(&remote)
            }
        })
        .await
    }

    async fn list_dir(&self, path: &UnifiedPath, options: &ListOptions) -> FsResult<Vec<Entry>> {
        let remote = self.remote_path(path)?;
        let prefix = path.uri_prefix().to_string();
        let options = options.clone();
        self.run(path, move |client| {
            let meta = client.metadata(&remote)?;
            if !meta.is_dir() {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotADirectory,
                    "not a directory",
                ));
            }

            let mut entries = Vec::new();
            for child_meta in client.read_dir(&remote)? {
                let child_path =
                    UnifiedPath::new(format!("{prefix}{}", strip_uri(child_meta.path())));
                let hidden = child_path
                    .name()
                    .is_some_and(|n| n.starts_with('.') || n.starts_with('_'));
                if hidden && !options.include_hidden {
                    continue;
                }
                entries.push(entry_from_meta(child_path, &child_meta));
            }
            entries.sort_by(|a, b| a.path.as_str().cmp(b.path.as_str()));
            Ok(entries)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_uri() {
        assert_eq!(strip_uri("hdfs://nn:8020/a/b"), "/a/b");
        assert_eq!(strip_uri("hdfs://nn:8020"), "/");
        assert_eq!(strip_uri("/a/b"), "/a/b");
    }

    #[test]
    fn test_parent_of() {
        assert_eq!(parent_of("/a/b"), Some("/a"));
        assert_eq!(parent_of("/a"), Some("/"));
        assert_eq!(parent_of("/"), None);
    }

    #[tokio::test]
    async fn test_rejects_local_path() {
        let backend = HdfsBackend::new(HdfsConfig::default());
        let err = backend.stat(&UnifiedPath::new("/tmp/x")).await.unwrap_err();
        assert!(matches!(err, FsError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_is_backend_unavailable() {
        // No HADOOP_HOME/CLASSPATH captured: fails before any connection.
        let config = HdfsConfig {
            hadoop_home: None,
            classpath: None,
            ..Default::default()
        };
        let backend = HdfsBackend::new(config);
        let err = backend
            .stat(&UnifiedPath::new("hdfs://nn/x"))
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }
}
