//! Scheme-tagged path value

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Storage scheme a path belongs to.
///
/// The tag is decided once, when the path is constructed, and never changes.
/// Every operation on a path routes through the backend matching its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    /// A path on the host filesystem.
    Local,
    /// A path on HDFS, written as an `hdfs://` or `viewfs://` URI.
    Hdfs,
}

/// A path that may live on the local filesystem or on HDFS.
///
/// The location string is kept verbatim; classification only inspects the
/// URI scheme prefix. Construction is pure string parsing and performs no
/// I/O on any backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnifiedPath {
    raw: String,
    scheme: Scheme,
}

/// Split `"hdfs://nn:8020/a/b"` into `("hdfs", "nn:8020/a/b")`.
fn split_scheme(raw: &str) -> Option<(&str, &str)> {
    let idx = raw.find("://")?;
    let scheme = &raw[..idx];
    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.') {
        return None;
    }
    Some((scheme, &raw[idx + 3..]))
}

fn classify(raw: &str) -> Scheme {
    match split_scheme(raw) {
        Some((scheme, _)) if scheme.eq_ignore_ascii_case("hdfs") || scheme.eq_ignore_ascii_case("viewfs") => {
            Scheme::Hdfs
        }
        _ => Scheme::Local,
    }
}

impl UnifiedPath {
    /// Parse a location string, classifying its scheme.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let scheme = classify(&raw);
        Self { raw, scheme }
    }

    /// The scheme tag assigned at construction.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// True if the path points at the local filesystem.
    pub fn is_local(&self) -> bool {
        self.scheme == Scheme::Local
    }

    /// True if the path points at an HDFS location.
    pub fn is_hdfs(&self) -> bool {
        self.scheme == Scheme::Hdfs
    }

    /// The location string exactly as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// For URI-style paths, `("hdfs://nn:8020", "/a/b")`. Local paths have
    /// no prefix and come back whole.
    fn split_prefix(&self) -> (&str, &str) {
        match split_scheme(&self.raw) {
            Some((scheme, rest)) => {
                let authority_len = rest.find('/').unwrap_or(rest.len());
                let prefix_len = scheme.len() + 3 + authority_len;
                (&self.raw[..prefix_len], &self.raw[prefix_len..])
            }
            None => ("", &self.raw),
        }
    }

    /// The `scheme://authority` prefix of a URI-style path; empty for local
    /// paths. `uri_prefix() + fs_path()` reconstructs an absolute URI.
    pub fn uri_prefix(&self) -> &str {
        self.split_prefix().0
    }

    /// The URI authority (`nn:8020` in `hdfs://nn:8020/a`), if any.
    pub fn authority(&self) -> Option<&str> {
        let (prefix, _) = self.split_prefix();
        let (_, rest) = split_scheme(prefix)?;
        Some(rest)
    }

    /// The backend-side filesystem path: the whole string for local paths,
    /// the part after the authority for URIs (`/` when absent).
    pub fn fs_path(&self) -> &str {
        let (_, rest) = self.split_prefix();
        if self.scheme != Scheme::Local && rest.is_empty() {
            "/"
        } else {
            rest
        }
    }

    /// Append one or more `/`-separated segments, preserving the scheme.
    ///
    /// Empty and `.` segments are dropped; no other normalization happens.
    pub fn join(&self, other: impl AsRef<str>) -> Self {
        let mut raw = self.raw.trim_end_matches('/').to_string();
        if raw.is_empty() && self.raw.starts_with('/') {
            raw.push('/');
        }
        for segment in other.as_ref().split('/') {
            if segment.is_empty() || segment == "." {
                continue;
            }
            if !raw.is_empty() && !raw.ends_with('/') {
                raw.push('/');
            }
            raw.push_str(segment);
        }
        Self {
            raw,
            scheme: self.scheme,
        }
    }

    /// The path with its final component removed, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (prefix, rest) = self.split_prefix();
        let trimmed = rest.trim_end_matches('/');
        if trimmed.is_empty() {
            return None;
        }
        let cut = trimmed.rfind('/');
        let parent_rest = match cut {
            Some(0) => "/",
            Some(idx) => &trimmed[..idx],
            // Relative single component: no parent to speak of.
            None if prefix.is_empty() => return None,
            None => "/",
        };
        Some(Self {
            raw: format!("{prefix}{parent_rest}"),
            scheme: self.scheme,
        })
    }

    /// The final path component, if any.
    pub fn name(&self) -> Option<&str> {
        let (_, rest) = self.split_prefix();
        rest.trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
    }

    /// The file extension of the final component, without the dot.
    pub fn extension(&self) -> Option<&str> {
        self.name()
            .and_then(|n| n.rsplit_once('.'))
            .filter(|(stem, _)| !stem.is_empty())
            .map(|(_, ext)| ext)
    }
}

impl From<&str> for UnifiedPath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for UnifiedPath {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&Path> for UnifiedPath {
    fn from(path: &Path) -> Self {
        Self::new(path.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for UnifiedPath {
    fn from(path: PathBuf) -> Self {
        Self::new(path.to_string_lossy().into_owned())
    }
}

impl fmt::Display for UnifiedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_local() {
        assert_eq!(UnifiedPath::new("/home/user/file.txt").scheme(), Scheme::Local);
        assert_eq!(UnifiedPath::new("relative/path").scheme(), Scheme::Local);
        assert_eq!(UnifiedPath::new("").scheme(), Scheme::Local);
    }

    #[test]
    fn test_classify_hdfs() {
        assert!(UnifiedPath::new("hdfs://nn:8020/data").is_hdfs());
        assert!(UnifiedPath::new("viewfs://cluster/data").is_hdfs());
        assert!(UnifiedPath::new("HDFS://nn/data").is_hdfs());
    }

    #[test]
    fn test_foreign_scheme_is_local() {
        // Only hdfs/viewfs select the distributed backend.
        assert!(UnifiedPath::new("s3://bucket/key").is_local());
        assert!(UnifiedPath::new("file://x").is_local());
    }

    #[test]
    fn test_fs_path_and_authority() {
        let p = UnifiedPath::new("hdfs://nn:8020/data/file.txt");
        assert_eq!(p.authority(), Some("nn:8020"));
        assert_eq!(p.fs_path(), "/data/file.txt");

        let root = UnifiedPath::new("hdfs://nn:8020");
        assert_eq!(root.fs_path(), "/");

        let local = UnifiedPath::new("/home/user");
        assert_eq!(local.authority(), None);
        assert_eq!(local.fs_path(), "/home/user");
    }

    #[test]
    fn test_join_local() {
        let p = UnifiedPath::new("/data").join("sub/file.txt");
        assert_eq!(p.as_str(), "/data/sub/file.txt");
        assert!(p.is_local());
    }

    #[test]
    fn test_join_hdfs_preserves_scheme() {
        let p = UnifiedPath::new("hdfs://root").join("foo/bar");
        assert_eq!(p.as_str(), "hdfs://root/foo/bar");
        assert!(p.is_hdfs());
    }

    #[test]
    fn test_join_skips_empty_and_dot() {
        let p = UnifiedPath::new("/data/").join(".//./file.txt");
        assert_eq!(p.as_str(), "/data/file.txt");
    }

    #[test]
    fn test_join_keeps_relative_base_relative() {
        assert_eq!(UnifiedPath::new("").join("a").as_str(), "a");
        assert_eq!(UnifiedPath::new("rel").join("a").as_str(), "rel/a");
        assert_eq!(UnifiedPath::new("/").join("a").as_str(), "/a");
    }

    #[test]
    fn test_parent_local() {
        assert_eq!(
            UnifiedPath::new("/foo/bar").parent().unwrap().as_str(),
            "/foo"
        );
        assert_eq!(UnifiedPath::new("/foo").parent().unwrap().as_str(), "/");
        assert!(UnifiedPath::new("/").parent().is_none());
        assert_eq!(
            UnifiedPath::new("foo/bar").parent().unwrap().as_str(),
            "foo"
        );
        assert!(UnifiedPath::new("foo").parent().is_none());
    }

    #[test]
    fn test_parent_hdfs() {
        let p = UnifiedPath::new("hdfs://root/foo/bar");
        assert_eq!(p.parent().unwrap().as_str(), "hdfs://root/foo");
        assert_eq!(
            UnifiedPath::new("hdfs://root/foo").parent().unwrap().as_str(),
            "hdfs://root/"
        );
        assert!(UnifiedPath::new("hdfs://root/").parent().is_none());
        assert!(UnifiedPath::new("hdfs://root").parent().is_none());
    }

    #[test]
    fn test_name() {
        assert_eq!(UnifiedPath::new("/a/b/file.txt").name(), Some("file.txt"));
        assert_eq!(UnifiedPath::new("hdfs://nn/a/b/").name(), Some("b"));
        assert!(UnifiedPath::new("/").name().is_none());
        assert!(UnifiedPath::new("hdfs://nn").name().is_none());
    }

    #[test]
    fn test_extension() {
        assert_eq!(UnifiedPath::new("/a/file.txt").extension(), Some("txt"));
        assert_eq!(UnifiedPath::new("/a/archive.tar.gz").extension(), Some("gz"));
        assert!(UnifiedPath::new("/a/file").extension().is_none());
        assert!(UnifiedPath::new("/a/.bashrc").extension().is_none());
    }

    #[test]
    fn test_display_and_equality() {
        let a = UnifiedPath::new("hdfs://root/foo/bar");
        assert_eq!(format!("{a}"), "hdfs://root/foo/bar");
        assert_eq!(a, UnifiedPath::new("hdfs://root/foo/bar"));
        assert_ne!(a, UnifiedPath::new("/foo/bar"));
    }

    #[test]
    fn test_from_pathbuf() {
        let p: UnifiedPath = PathBuf::from("/tmp/x").into();
        assert!(p.is_local());
        assert_eq!(p.as_str(), "/tmp/x");
    }
}
