//! unipath
//!
//! Work with local and HDFS files in an agnostic manner, through one
//! pathlib-style interface. A path string is classified once at
//! construction (`hdfs://` and `viewfs://` URIs select the distributed
//! backend, everything else the host filesystem) and every operation then
//! routes through the backend matching that tag.
//!
//! ```no_run
//! use unipath::{UnifiedFs, UnifiedPath};
//!
//! # async fn demo() -> unipath::FsResult<()> {
//! let fs = UnifiedFs::local_only();
//! let path = UnifiedPath::new("/tmp/report.csv");
//!
//! fs.write(&path, "a,b,c\n".into()).await?;
//! let data = fs.read(&path).await?;
//! assert!(fs.exists(&path).await?);
//! # Ok(())
//! # }
//! ```
//!
//! The HDFS side needs the Hadoop runtime configured before startup:
//! `HADOOP_HOME`, `ARROW_LIBHDFS_DIR`, and a `CLASSPATH` listing the Hadoop
//! jars. Capture them once with [`HdfsConfig::from_env`] and hand the config
//! to the backend; nothing re-reads the environment afterwards.

mod copy;
mod fs;

pub use fs::UnifiedFs;
pub use unipath_core::{
    backend::{ByteStream, FsBackend},
    entry::{Entry, EntryKind, Metadata},
    error::{FsError, FsResult},
    operations::{
        CopyOptions, DeleteOptions, ListOptions, MkdirOptions, ReadOptions, WriteOptions,
    },
    Scheme, UnifiedPath,
};
pub use unipath_providers::{HdfsConfig, LocalBackend, MemoryBackend};

#[cfg(feature = "hdfs")]
pub use unipath_providers::HdfsBackend;
