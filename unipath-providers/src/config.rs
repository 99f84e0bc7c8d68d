//! HDFS backend configuration
//!
//! libhdfs discovers the Hadoop runtime through environment variables. To
//! keep that out of the operation path, the variables are captured once into
//! an explicit [`HdfsConfig`] at process start; backends only ever see the
//! struct.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use unipath_core::{FsError, FsResult};

/// Name node used when none is given: resolved by libhdfs from the
/// Hadoop configuration on the classpath.
pub const DEFAULT_NAME_NODE: &str = "default";

/// Configuration for the HDFS backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HdfsConfig {
    /// Name node endpoint, e.g. `hdfs://nn:8020`, or `"default"`.
    pub name_node: String,
    /// User to connect as; the cluster default when `None`.
    pub user: Option<String>,
    /// Hadoop installation root (`HADOOP_HOME`).
    pub hadoop_home: Option<PathBuf>,
    /// Directory holding `libhdfs.so` (`ARROW_LIBHDFS_DIR`).
    pub libhdfs_dir: Option<PathBuf>,
    /// Classpath listing the Hadoop jars (`CLASSPATH`).
    pub classpath: Option<String>,
}

impl Default for HdfsConfig {
    fn default() -> Self {
        Self {
            name_node: DEFAULT_NAME_NODE.to_string(),
            user: None,
            hadoop_home: None,
            libhdfs_dir: None,
            classpath: None,
        }
    }
}

impl HdfsConfig {
    pub fn new(name_node: impl Into<String>) -> Self {
        Self {
            name_node: name_node.into(),
            ..Default::default()
        }
    }

    /// Capture the environment once. Call this at process startup; the
    /// variables are not re-read afterwards.
    pub fn from_env() -> Self {
        Self {
            name_node: std::env::var("UNIPATH_HDFS_NAMENODE")
                .unwrap_or_else(|_| DEFAULT_NAME_NODE.to_string()),
            user: std::env::var("HADOOP_USER_NAME").ok(),
            hadoop_home: std::env::var_os("HADOOP_HOME").map(PathBuf::from),
            libhdfs_dir: std::env::var_os("ARROW_LIBHDFS_DIR").map(PathBuf::from),
            classpath: std::env::var("CLASSPATH").ok(),
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Check that the captured runtime locations are present.
    ///
    /// libhdfs cannot load without a Hadoop home and a classpath; failing
    /// here turns a cryptic JNI error into a clear `BackendUnavailable`.
    pub fn validate(&self) -> FsResult<()> {
        let mut missing = Vec::new();
        if self.hadoop_home.is_none() {
            missing.push("HADOOP_HOME");
        }
        if self.classpath.is_none() {
            missing.push("CLASSPATH");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FsError::BackendUnavailable(format!(
                "HDFS runtime not configured, missing: {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name_node() {
        let config = HdfsConfig::default();
        assert_eq!(config.name_node, "default");
        assert!(config.user.is_none());
    }

    #[test]
    fn test_validate_reports_missing() {
        let config = HdfsConfig::new("hdfs://nn:8020");
        let err = config.validate().unwrap_err();
        assert!(err.is_unavailable());
        let msg = format!("{err}");
        assert!(msg.contains("HADOOP_HOME"));
        assert!(msg.contains("CLASSPATH"));
    }

    #[test]
    fn test_validate_ok() {
        let config = HdfsConfig {
            name_node: "default".into(),
            user: Some("hive".into()),
            hadoop_home: Some(PathBuf::from("/opt/hadoop")),
            libhdfs_dir: Some(PathBuf::from("/opt/hadoop/lib/native")),
            classpath: Some("/opt/hadoop/etc:/opt/hadoop/share/*".into()),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_user() {
        let config = HdfsConfig::new("default").with_user("etl");
        assert_eq!(config.user.as_deref(), Some("etl"));
    }
}
