//! Outline cache keyed by document identity.
//!
//! Entries never expire. A cached structure is only as fresh as the
//! document it was computed from, and keeping the two in sync is up to
//! the caller.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::model::DocumentStructure;

/// Identity of a document: its file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create an id from a file name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the id from a path (its final component).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self(name)
    }

    /// The file name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        match self.0.rfind('.') {
            Some(i) if i > 0 => &self.0[..i],
            _ => &self.0,
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persistent store of computed outlines.
pub trait OutlineCache: Send + Sync {
    /// Look up a structure. `Ok(None)` is a miss.
    fn get(&self, id: &DocumentId) -> Result<Option<DocumentStructure>>;

    /// Store a structure, replacing any previous entry.
    fn put(&self, id: &DocumentId, structure: &DocumentStructure) -> Result<()>;
}

/// Cache of `<stem>.json` files in one directory.
///
/// The files have the same shape as structure-mode output, so an output
/// directory can be reused as a cache.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    dir: PathBuf,
}

impl DirectoryCache {
    /// Create a cache over `dir`. The directory is created on first write.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `id`.
    pub fn entry_path(&self, id: &DocumentId) -> PathBuf {
        self.dir.join(format!("{}.json", id.stem()))
    }
}

impl OutlineCache for DirectoryCache {
    fn get(&self, id: &DocumentId) -> Result<Option<DocumentStructure>> {
        let path = self.entry_path(id);
        if !path.is_file() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        let structure = serde_json::from_str(&data)
            .map_err(|e| Error::Cache(format!("{}: {}", path.display(), e)))?;
        Ok(Some(structure))
    }

    fn put(&self, id: &DocumentId, structure: &DocumentStructure) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(structure)?;
        fs::write(self.entry_path(id), json)?;
        Ok(())
    }
}

/// In-process cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<DocumentId, DocumentStructure>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OutlineCache for MemoryCache {
    fn get(&self, id: &DocumentId) -> Result<Option<DocumentStructure>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| Error::Cache("memory cache lock poisoned".to_string()))?;
        Ok(entries.get(id).cloned())
    }

    fn put(&self, id: &DocumentId, structure: &DocumentStructure) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::Cache("memory cache lock poisoned".to_string()))?;
        entries.insert(id.clone(), structure.clone());
        Ok(())
    }
}
