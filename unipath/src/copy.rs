//! File and directory copies, including across backends
//!
//! Cross-backend copies stream through the byte-stream seam: the source
//! backend's read stream is handed to the destination backend's
//! `write_stream`. Nothing is retried and no atomicity is guaranteed; the
//! first error aborts the copy and is returned as-is.

use unipath_core::{
    entry::Entry,
    error::{FsError, FsResult},
    operations::*,
    UnifiedPath,
};

use crate::UnifiedFs;

impl UnifiedFs {
    /// Copy one file, between any pair of backends.
    ///
    /// Same-scheme copies try the backend's native copy first and fall back
    /// to streaming when the backend has none.
    pub async fn copy(
        &self,
        source: &UnifiedPath,
        dest: &UnifiedPath,
        options: &CopyOptions,
    ) -> FsResult<Entry> {
        let src_backend = self.backend_for(source)?;
        let dst_backend = self.backend_for(dest)?;

        let entry = src_backend.stat(source).await?;
        if entry.is_directory() {
            return Err(FsError::IsADirectory(source.to_string()));
        }

        if source.scheme() == dest.scheme() {
            match src_backend.copy_within(source, dest, options).await {
                Err(err) if err.is_unsupported() => {
                    tracing::debug!(
                        backend = src_backend.scheme_name(),
                        "no native copy, streaming instead"
                    );
                }
                other => return other,
            }
        }

        if !options.overwrite && dst_backend.exists(dest).await? {
            return Err(FsError::AlreadyExists(dest.to_string()));
        }

        tracing::debug!(source = %source, dest = %dest, "streaming copy");
        let stream = src_backend.read(source, &ReadOptions::default()).await?;
        let write_options = WriteOptions {
            overwrite: options.overwrite,
            create_parents: true,
        };
        dst_backend.write_stream(dest, stream, &write_options).await
    }

    /// Copy a directory's files into `dest`, descending into subdirectories
    /// when `options.recursive` is set. `dest` and any needed parents are
    /// created.
    pub async fn copy_dir(
        &self,
        source: &UnifiedPath,
        dest: &UnifiedPath,
        options: &CopyOptions,
    ) -> FsResult<()> {
        let entry = self.backend_for(source)?.stat(source).await?;
        if !entry.is_directory() {
            return Err(FsError::NotADirectory(source.to_string()));
        }

        let mkdir = MkdirOptions {
            parents: true,
            exist_ok: true,
        };

        // Iterative walk; directories queue up instead of recursing.
        let mut pending = vec![(source.clone(), dest.clone())];
        while let Some((src_dir, dst_dir)) = pending.pop() {
            self.create_dir(&dst_dir, &mkdir).await?;

            let entries = self
                .list_dir_entries(&src_dir, &ListOptions::default())
                .await?;
            for child in entries {
                let Some(name) = child.name().map(str::to_owned) else {
                    continue;
                };
                let target = dst_dir.join(&name);
                if child.is_directory() {
                    if options.recursive {
                        pending.push((child.path, target));
                    }
                } else if child.is_file() {
                    self.copy(&child.path, &target, options).await?;
                }
                // Symlinks and special files are skipped.
            }
        }
        Ok(())
    }
}
