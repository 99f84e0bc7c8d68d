//! Operation options

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Half-open byte range `[start, end)` to read instead of the whole file.
    pub range: Option<(u64, u64)>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteOptions {
    pub overwrite: bool,
    pub create_parents: bool,
}

impl WriteOptions {
    /// The common case: replace whatever is there, creating parents.
    pub fn replace() -> Self {
        Self {
            overwrite: true,
            create_parents: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOptions {
    pub include_hidden: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MkdirOptions {
    /// Create missing ancestors as well.
    pub parents: bool,
    /// Succeed silently when the directory already exists.
    pub exist_ok: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteOptions {
    pub recursive: bool,
    /// Treat a missing path as success.
    pub force: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopyOptions {
    pub overwrite: bool,
    /// For directory copies: descend into subdirectories.
    pub recursive: bool,
}
