//! Read-only storage backends for the archive.
//!
//! Paths handed to a store are relative to its root. Absolute paths
//! are accepted as well, following `Path::join` semantics.

use crate::core::error::{DxrayError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Read-only view of the archive tree
pub trait ArchiveStore: Send + Sync + fmt::Debug {
    /// Root every relative path is resolved against
    fn root(&self) -> &Path;

    /// Entries directly below `rel`, sorted by name
    fn list(&self, rel: &Path) -> Result<Vec<Entry>>;

    /// Kind of the entry at `rel`, `NotFound` if it does not exist
    fn kind(&self, rel: &Path) -> Result<EntryKind>;

    /// Full contents of the file at `path`
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Filesystem-backed store
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArchiveStore for FsStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn list(&self, rel: &Path) -> Result<Vec<Entry>> {
        let dir = self.root.join(rel);
        let mut entries = Vec::new();

        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry =
                entry.map_err(|e| DxrayError::from_io(io::Error::from(e), dir.display()))?;
            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }

        Ok(entries)
    }

    fn kind(&self, rel: &Path) -> Result<EntryKind> {
        let path = self.root.join(rel);
        let metadata = fs::metadata(&path).map_err(|e| DxrayError::from_io(e, path.display()))?;
        Ok(if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        })
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let path = self.root.join(path);
        fs::read(&path).map_err(|e| DxrayError::from_io(e, path.display()))
    }
}

/// In-memory store for tests and fixtures
///
/// Directories are keys without contents. Adding a file or directory
/// creates its missing parents.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    root: PathBuf,
    nodes: BTreeMap<PathBuf, Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            nodes: BTreeMap::new(),
        }
    }

    /// Add a directory (and its parents)
    pub fn add_dir(&mut self, rel: impl AsRef<Path>) -> &mut Self {
        let rel = rel.as_ref();
        for ancestor in rel.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.nodes.entry(ancestor.to_path_buf()).or_insert(None);
        }
        self
    }

    /// Add a file with its contents (and its parent directories)
    pub fn add_file(&mut self, rel: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> &mut Self {
        let rel = rel.as_ref();
        if let Some(parent) = rel.parent() {
            self.add_dir(parent);
        }
        self.nodes.insert(rel.to_path_buf(), Some(contents.into()));
        self
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

impl ArchiveStore for MemoryStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn list(&self, rel: &Path) -> Result<Vec<Entry>> {
        let rel = self.relative(rel);
        if !rel.as_os_str().is_empty() && self.kind(rel)? != EntryKind::Directory {
            return Ok(Vec::new());
        }

        Ok(self
            .nodes
            .iter()
            .filter(|(path, _)| path.parent() == Some(rel))
            .filter_map(|(path, contents)| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                let kind = if contents.is_some() {
                    EntryKind::File
                } else {
                    EntryKind::Directory
                };
                Some(Entry { name, kind })
            })
            .collect())
    }

    fn kind(&self, rel: &Path) -> Result<EntryKind> {
        let rel = self.relative(rel);
        match self.nodes.get(rel) {
            Some(Some(_)) => Ok(EntryKind::File),
            Some(None) => Ok(EntryKind::Directory),
            None => Err(DxrayError::NotFound(self.root.join(rel).display().to_string())),
        }
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let rel = self.relative(path);
        match self.nodes.get(rel) {
            Some(Some(contents)) => Ok(contents.clone()),
            Some(None) => Err(DxrayError::InvalidEntry(format!(
                "{} is a directory",
                self.root.join(rel).display()
            ))),
            None => Err(DxrayError::NotFound(self.root.join(rel).display().to_string())),
        }
    }
}
