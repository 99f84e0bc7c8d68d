//! Storage backends for unipath
//!
//! Two real backends, the host filesystem and HDFS, plus an in-memory
//! backend that stands in for the distributed side in test environments
//! without a cluster.
//!
//! The HDFS backend binds libhdfs through the `hdrs` crate and is gated
//! behind the `hdfs` feature, since building it needs a JVM toolchain.

mod local;
mod memory;

pub mod config;

#[cfg(feature = "hdfs")]
pub mod hdfs;

pub use config::HdfsConfig;
pub use local::LocalBackend;
pub use memory::MemoryBackend;

#[cfg(feature = "hdfs")]
pub use hdfs::HdfsBackend;
