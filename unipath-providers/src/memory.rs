//! In-memory backend
//!
//! A complete [`FsBackend`] over an in-process tree. Serves as the
//! substitute distributed backend in test environments without a reachable
//! cluster, with the same error semantics as the real backends.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use unipath_core::{
    backend::{ByteStream, FsBackend},
    entry::{Entry, Metadata},
    error::{FsError, FsResult},
    operations::*,
    UnifiedPath,
};

#[derive(Debug, Clone)]
enum Node {
    File { data: Bytes, modified: DateTime<Utc> },
    Dir,
}

/// In-memory storage backend.
pub struct MemoryBackend {
    name: String,
    nodes: Mutex<HashMap<String, Node>>,
}

fn key_of(path: &UnifiedPath) -> String {
    let p = path.fs_path();
    let mut key = if p.starts_with('/') {
        p.to_string()
    } else {
        format!("/{p}")
    };
    while key.len() > 1 && key.ends_with('/') {
        key.pop();
    }
    key
}

fn parent_key(key: &str) -> Option<String> {
    if key == "/" {
        return None;
    }
    match key.rfind('/') {
        Some(0) => Some("/".to_string()),
        Some(idx) => Some(key[..idx].to_string()),
        None => None,
    }
}

/// Create every missing ancestor of `parent` as a directory. Fails
/// `NotADirectory` when any existing ancestor on the way up is a file.
fn fill_ancestors(nodes: &mut HashMap<String, Node>, parent: &str) -> FsResult<()> {
    let mut missing = Vec::new();
    let mut cursor = parent.to_string();
    loop {
        match nodes.get(&cursor) {
            Some(Node::Dir) => break,
            Some(Node::File { .. }) => return Err(FsError::NotADirectory(cursor)),
            None => {
                missing.push(cursor.clone());
                match parent_key(&cursor) {
                    Some(up) => cursor = up,
                    None => break,
                }
            }
        }
    }
    for key in missing {
        nodes.insert(key, Node::Dir);
    }
    Ok(())
}

impl MemoryBackend {
    /// `name` shows up in logs and in `Unsupported` messages.
    pub fn new(name: impl Into<String>) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert("/".to_string(), Node::Dir);
        Self {
            name: name.into(),
            nodes: Mutex::new(nodes),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Node>> {
        // Lock poisoning only happens if a holder panicked; propagating the
        // map anyway keeps tests informative.
        self.nodes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn entry_for(&self, path: &UnifiedPath, node: &Node) -> Entry {
        match node {
            Node::File { data, modified } => Entry::file(
                path.clone(),
                Metadata::new()
                    .with_size(data.len() as u64)
                    .with_modified(*modified),
            ),
            Node::Dir => Entry::directory(path.clone(), Metadata::new()),
        }
    }
}

#[async_trait]
impl FsBackend for MemoryBackend {
    fn scheme_name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn stat(&self, path: &UnifiedPath) -> FsResult<Entry> {
        let nodes = self.lock();
        let node = nodes
            .get(&key_of(path))
            .ok_or_else(|| FsError::NotFound(path.to_string()))?;
        Ok(self.entry_for(path, node))
    }

    async fn read(&self, path: &UnifiedPath, options: &ReadOptions) -> FsResult<ByteStream> {
        let bytes = {
            let nodes = self.lock();
            match nodes.get(&key_of(path)) {
                None => return Err(FsError::NotFound(path.to_string())),
                Some(Node::Dir) => return Err(FsError::IsADirectory(path.to_string())),
                Some(Node::File { data, .. }) => match options.range {
                    Some((start, end)) => {
                        let start = (start as usize).min(data.len());
                        let end = (end as usize).min(data.len());
                        data.slice(start..end.max(start))
                    }
                    None => data.clone(),
                },
            }
        };
        Ok(Box::pin(futures::stream::once(async { Ok(bytes) })))
    }

    async fn write(
        &self,
        path: &UnifiedPath,
        data: Bytes,
        options: &WriteOptions,
    ) -> FsResult<Entry> {
        let key = key_of(path);
        let mut nodes = self.lock();

        match nodes.get(&key) {
            Some(Node::Dir) => return Err(FsError::IsADirectory(path.to_string())),
            Some(Node::File { .. }) if !options.overwrite => {
                return Err(FsError::AlreadyExists(path.to_string()))
            }
            _ => {}
        }

        if let Some(parent) = parent_key(&key) {
            match nodes.get(&parent) {
                Some(Node::Dir) => {}
                Some(Node::File { .. }) => {
                    return Err(FsError::NotADirectory(parent));
                }
                None if options.create_parents => fill_ancestors(&mut nodes, &parent)?,
                None => return Err(FsError::NotFound(parent)),
            }
        }

        let node = Node::File {
            data,
            modified: Utc::now(),
        };
        let entry = self.entry_for(path, &node);
        nodes.insert(key, node);
        Ok(entry)
    }

    async fn create_dir(&self, path: &UnifiedPath, options: &MkdirOptions) -> FsResult<()> {
        let key = key_of(path);
        let mut nodes = self.lock();

        match nodes.get(&key) {
            Some(Node::Dir) if options.exist_ok => return Ok(()),
            Some(_) => return Err(FsError::AlreadyExists(path.to_string())),
            None => {}
        }

        if let Some(parent) = parent_key(&key) {
            match nodes.get(&parent) {
                Some(Node::Dir) => {}
                Some(Node::File { .. }) => return Err(FsError::NotADirectory(parent)),
                None if options.parents => fill_ancestors(&mut nodes, &parent)?,
                None => return Err(FsError::NotFound(parent)),
            }
        }

        nodes.insert(key, Node::Dir);
        Ok(())
    }

    async fn delete(&self, path: &UnifiedPath, options: &DeleteOptions) -> FsResult<()> {
        let key = key_of(path);
        let mut nodes = self.lock();

        match nodes.get(&key) {
            None if options.force => return Ok(()),
            None => return Err(FsError::NotFound(path.to_string())),
            Some(Node::File { .. }) => {
                nodes.remove(&key);
                return Ok(());
            }
            Some(Node::Dir) => {}
        }

        let child_prefix = if key == "/" {
            "/".to_string()
        } else {
            format!("{key}/")
        };
        let has_children = nodes
            .keys()
            .any(|k| k != &key && k.starts_with(&child_prefix));

        if has_children && !options.recursive {
            return Err(FsError::from_io(
                std::io::Error::new(std::io::ErrorKind::DirectoryNotEmpty, "directory not empty"),
                path.to_string(),
            ));
        }

        nodes.retain(|k, _| k != &key && !k.starts_with(&child_prefix));
        if key == "/" {
            nodes.insert("/".to_string(), Node::Dir);
        }
        Ok(())
    }

    async fn list_dir(&self, path: &UnifiedPath, options: &ListOptions) -> FsResult<Vec<Entry>> {
        let key = key_of(path);
        let nodes = self.lock();

        match nodes.get(&key) {
            None => return Err(FsError::NotFound(path.to_string())),
            Some(Node::File { .. }) => return Err(FsError::NotADirectory(path.to_string())),
            Some(Node::Dir) => {}
        }

        let mut entries = Vec::new();
        for (child_key, node) in nodes.iter() {
            if parent_key(child_key).as_deref() != Some(key.as_str()) {
                continue;
            }
            let name = child_key.rsplit('/').next().unwrap_or_default();
            if name.is_empty() || (!options.include_hidden && name.starts_with('.')) {
                continue;
            }
            entries.push(self.entry_for(&path.join(name), node));
        }
        entries.sort_by(|a, b| a.path.as_str().cmp(b.path.as_str()));
        Ok(entries)
    }
}
