//! Local filesystem backend

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncReadExt;
use unipath_core::{
    backend::{ByteStream, FsBackend},
    entry::{Entry, EntryKind, Metadata},
    error::{FsError, FsResult},
    operations::*,
    UnifiedPath,
};

/// Host filesystem backend.
///
/// The path's location string is used as the OS path directly; there is no
/// virtual mount root.
#[derive(Debug, Default)]
pub struct LocalBackend;

impl LocalBackend {
    pub fn new() -> Self {
        Self
    }

    fn os_path(&self, path: &UnifiedPath) -> FsResult<PathBuf> {
        if !path.is_local() {
            return Err(FsError::InvalidPath(format!(
                "not a local path: {path}"
            )));
        }
        Ok(PathBuf::from(path.as_str()))
    }

    async fn metadata_from_path(&self, path: &Path) -> FsResult<(EntryKind, Metadata)> {
        let meta = fs::symlink_metadata(path)
            .await
            .map_err(|e| FsError::from_io(e, path.display().to_string()))?;

        let kind = if meta.is_dir() {
            EntryKind::Directory
        } else if meta.is_file() {
            EntryKind::File
        } else if meta.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::Unknown
        };

        let mut metadata = Metadata::new();
        metadata.size = Some(meta.len());

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            metadata.mode = Some(meta.mode());
        }

        if let Ok(modified) = meta.modified() {
            metadata.modified = Some(modified.into());
        }
        if let Ok(created) = meta.created() {
            metadata.created = Some(created.into());
        }

        Ok((kind, metadata))
    }
}

#[async_trait]
impl FsBackend for LocalBackend {
    fn scheme_name(&self) -> &str {
        "local"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn stat(&self, path: &UnifiedPath) -> FsResult<Entry> {
        let real = self.os_path(path)?;
        let (kind, metadata) = self.metadata_from_path(&real).await?;
        Ok(Entry {
            path: path.clone(),
            kind,
            metadata,
        })
    }

    async fn read(&self, path: &UnifiedPath, options: &ReadOptions) -> FsResult<ByteStream> {
        let real = self.os_path(path)?;
        let entry = self.stat(path).await?;
        if entry.is_directory() {
            return Err(FsError::IsADirectory(path.to_string()));
        }

        let mut file = fs::File::open(&real)
            .await
            .map_err(|e| FsError::from_io(e, path.to_string()))?;
        let mut buffer = Vec::new();

        let io_err = |e| FsError::from_io(e, path.to_string());
        if let Some((start, end)) = options.range {
            use tokio::io::AsyncSeekExt;
            file.seek(std::io::SeekFrom::Start(start))
                .await
                .map_err(io_err)?;
            // A range past EOF reads what is there, like the other backends.
            let mut limited = file.take(end.saturating_sub(start));
            limited.read_to_end(&mut buffer).await.map_err(io_err)?;
        } else {
            file.read_to_end(&mut buffer).await.map_err(io_err)?;
        }

        let bytes = Bytes::from(buffer);
        Ok(Box::pin(futures::stream::once(async { Ok(bytes) })))
    }

    async fn write(
        &self,
        path: &UnifiedPath,
        data: Bytes,
        options: &WriteOptions,
    ) -> FsResult<Entry> {
        let real = self.os_path(path)?;

        if real.exists() && !options.overwrite {
            return Err(FsError::AlreadyExists(path.to_string()));
        }

        if options.create_parents {
            if let Some(parent) = real.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| FsError::from_io(e, parent.display().to_string()))?;
            }
        }

        fs::write(&real, &data)
            .await
            .map_err(|e| FsError::from_io(e, path.to_string()))?;
        self.stat(path).await
    }

    async fn create_dir(&self, path: &UnifiedPath, options: &MkdirOptions) -> FsResult<()> {
        let real = self.os_path(path)?;

        if real.is_dir() {
            if options.exist_ok {
                return Ok(());
            }
            return Err(FsError::AlreadyExists(path.to_string()));
        }

        let result = if options.parents {
            fs::create_dir_all(&real).await
        } else {
            fs::create_dir(&real).await
        };
        result.map_err(|e| FsError::from_io(e, path.to_string()))
    }

    async fn delete(&self, path: &UnifiedPath, options: &DeleteOptions) -> FsResult<()> {
        let real = self.os_path(path)?;

        let meta = match fs::symlink_metadata(&real).await {
            Ok(meta) => meta,
            Err(_) if options.force => return Ok(()),
            Err(e) => return Err(FsError::from_io(e, path.to_string())),
        };

        let result = if meta.is_dir() {
            if options.recursive {
                fs::remove_dir_all(&real).await
            } else {
                fs::remove_dir(&real).await
            }
        } else {
            fs::remove_file(&real).await
        };
        result.map_err(|e| FsError::from_io(e, path.to_string()))
    }

    async fn list_dir(&self, path: &UnifiedPath, options: &ListOptions) -> FsResult<Vec<Entry>> {
        let real = self.os_path(path)?;
        let entry = self.stat(path).await?;
        if !entry.is_directory() {
            return Err(FsError::NotADirectory(path.to_string()));
        }

        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(&real)
            .await
            .map_err(|e| FsError::from_io(e, path.to_string()))?;

        while let Some(dirent) = read_dir
            .next_entry()
            .await
            .map_err(|e| FsError::from_io(e, path.to_string()))?
        {
            let name = dirent.file_name().to_string_lossy().into_owned();
            if !options.include_hidden && name.starts_with('.') {
                continue;
            }
            let child = path.join(&name);
            let (kind, metadata) = self.metadata_from_path(&dirent.path()).await?;
            entries.push(Entry {
                path: child,
                kind,
                metadata,
            });
        }

        Ok(entries)
    }

    async fn copy_within(
        &self,
        source: &UnifiedPath,
        dest: &UnifiedPath,
        options: &CopyOptions,
    ) -> FsResult<Entry> {
        let src_real = self.os_path(source)?;
        let dst_real = self.os_path(dest)?;

        if !src_real.exists() {
            return Err(FsError::NotFound(source.to_string()));
        }
        if dst_real.exists() && !options.overwrite {
            return Err(FsError::AlreadyExists(dest.to_string()));
        }

        fs::copy(&src_real, &dst_real)
            .await
            .map_err(|e| FsError::from_io(e, source.to_string()))?;
        self.stat(dest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn upath(dir: &TempDir, name: &str) -> UnifiedPath {
        UnifiedPath::from(dir.path().join(name))
    }

    #[tokio::test]
    async fn test_exists_agrees_with_std() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new();

        let present = upath(&dir, "here.txt");
        std::fs::write(present.as_str(), b"x").unwrap();
        let absent = upath(&dir, "gone.txt");

        assert_eq!(
            backend.exists(&present).await.unwrap(),
            std::path::Path::new(present.as_str()).exists()
        );
        assert_eq!(
            backend.exists(&absent).await.unwrap(),
            std::path::Path::new(absent.as_str()).exists()
        );
    }

    #[tokio::test]
    async fn test_write_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new();
        let path = upath(&dir, "data.bin");
        let payload: Vec<u8> = (0..=255u8).collect();

        backend
            .write(&path, Bytes::from(payload.clone()), &WriteOptions::replace())
            .await
            .unwrap();

        use futures::StreamExt;
        let mut stream = backend.read(&path, &ReadOptions::default()).await.unwrap();
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(out, payload);
    }

    #[tokio::test]
    async fn test_read_range() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new();
        let path = upath(&dir, "data.txt");
        backend
            .write(&path, Bytes::from_static(b"0123456789"), &WriteOptions::replace())
            .await
            .unwrap();

        use futures::StreamExt;
        let opts = ReadOptions {
            range: Some((2, 6)),
        };
        let chunk = backend
            .read(&path, &opts)
            .await
            .unwrap()
            .next()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&chunk[..], b"2345");
    }

    #[tokio::test]
    async fn test_read_range_past_eof_is_clamped() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new();
        let path = upath(&dir, "short.txt");
        backend
            .write(&path, Bytes::from_static(b"abc"), &WriteOptions::replace())
            .await
            .unwrap();

        use futures::StreamExt;
        let opts = ReadOptions {
            range: Some((0, 10)),
        };
        let chunk = backend
            .read(&path, &opts)
            .await
            .unwrap()
            .next()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&chunk[..], b"abc");
    }

    #[tokio::test]
    async fn test_read_directory_fails() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new();
        let path = UnifiedPath::from(dir.path());

        let Err(err) = backend.read(&path, &ReadOptions::default()).await else {
            panic!("reading a directory succeeded");
        };
        assert!(matches!(err, FsError::IsADirectory(_)));
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new();
        let Err(err) = backend.read(&upath(&dir, "nope"), &ReadOptions::default()).await else {
            panic!("reading a missing file succeeded");
        };
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_write_no_overwrite() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new();
        let path = upath(&dir, "once.txt");

        let opts = WriteOptions::default();
        backend
            .write(&path, Bytes::from_static(b"a"), &opts)
            .await
            .unwrap();
        let err = backend
            .write(&path, Bytes::from_static(b"b"), &opts)
            .await
            .unwrap_err();
        assert!(matches!(err, FsError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new();
        let err = backend
            .delete(&upath(&dir, "nope"), &DeleteOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let forced = DeleteOptions {
            force: true,
            ..Default::default()
        };
        backend.delete(&upath(&dir, "nope"), &forced).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_dir_needs_recursive() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new();
        let sub = upath(&dir, "sub");
        let opts = MkdirOptions::default();
        backend.create_dir(&sub, &opts).await.unwrap();
        backend
            .write(&sub.join("f.txt"), Bytes::from_static(b"x"), &WriteOptions::replace())
            .await
            .unwrap();

        assert!(backend
            .delete(&sub, &DeleteOptions::default())
            .await
            .is_err());

        let recursive = DeleteOptions {
            recursive: true,
            ..Default::default()
        };
        backend.delete(&sub, &recursive).await.unwrap();
        assert!(!backend.exists(&sub).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_dir_exist_ok() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new();
        let sub = upath(&dir, "sub");

        backend
            .create_dir(&sub, &MkdirOptions::default())
            .await
            .unwrap();

        let err = backend
            .create_dir(&sub, &MkdirOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FsError::AlreadyExists(_)));

        let exist_ok = MkdirOptions {
            exist_ok: true,
            ..Default::default()
        };
        backend.create_dir(&sub, &exist_ok).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_dir() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new();
        let root = UnifiedPath::from(dir.path());

        backend
            .write(&root.join("a.txt"), Bytes::from_static(b"a"), &WriteOptions::replace())
            .await
            .unwrap();
        backend
            .write(&root.join(".hidden"), Bytes::from_static(b"h"), &WriteOptions::replace())
            .await
            .unwrap();
        backend
            .create_dir(&root.join("sub"), &MkdirOptions::default())
            .await
            .unwrap();

        let entries = backend
            .list_dir(&root, &ListOptions::default())
            .await
            .unwrap();
        let mut names: Vec<_> = entries.iter().filter_map(|e| e.name()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a.txt", "sub"]);

        let all = ListOptions {
            include_hidden: true,
        };
        assert_eq!(backend.list_dir(&root, &all).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_file_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new();
        let file = upath(&dir, "f.txt");
        backend
            .write(&file, Bytes::from_static(b"x"), &WriteOptions::replace())
            .await
            .unwrap();

        let err = backend
            .list_dir(&file, &ListOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FsError::NotADirectory(_)));
    }

    #[tokio::test]
    async fn test_copy_within() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::new();
        let src = upath(&dir, "src.txt");
        let dst = upath(&dir, "dst.txt");
        backend
            .write(&src, Bytes::from_static(b"payload"), &WriteOptions::replace())
            .await
            .unwrap();

        let entry = backend
            .copy_within(&src, &dst, &CopyOptions::default())
            .await
            .unwrap();
        assert!(entry.is_file());
        assert_eq!(std::fs::read(dst.as_str()).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_rejects_hdfs_path() {
        let backend = LocalBackend::new();
        let err = backend
            .stat(&UnifiedPath::new("hdfs://nn/x"))
            .await
            .unwrap_err();
        assert!(matches!(err, FsError::InvalidPath(_)));
    }
}
