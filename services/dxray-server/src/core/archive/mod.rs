//! Archive Store: volumes and studies of the console archive.
//!
//! The archive root holds volume directories named `<prefix><number>`
//! (e.g. `VOL00001`). Each volume holds study directories named
//! `<index>_<suffix>`, each with one descriptor plus the object files
//! it references. All access is read-only; volumes and studies are
//! views built on demand.

mod store;
mod study;

pub use store::{ArchiveStore, Entry, EntryKind, FsStore, MemoryStore};
pub use study::StudyHandle;

use crate::core::config::ArchiveConfig;
use crate::core::error::{DxrayError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Naming conventions of an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    pub volume_prefix: String,
    pub descriptor_name: String,
    pub object_prefix: String,
}

impl From<&ArchiveConfig> for ArchiveLayout {
    fn from(config: &ArchiveConfig) -> Self {
        Self {
            volume_prefix: config.volume_prefix.clone(),
            descriptor_name: config.descriptor_name.clone(),
            object_prefix: config.object_prefix.clone(),
        }
    }
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self::from(&ArchiveConfig::default())
    }
}

/// Handle to an archive
#[derive(Debug, Clone)]
pub struct Archive {
    store: Arc<dyn ArchiveStore>,
    layout: Arc<ArchiveLayout>,
}

impl Archive {
    pub fn new(store: Arc<dyn ArchiveStore>, layout: ArchiveLayout) -> Self {
        Self {
            store,
            layout: Arc::new(layout),
        }
    }

    /// Open the filesystem archive described by `config`
    pub fn open(config: &ArchiveConfig) -> Self {
        Self::new(
            Arc::new(FsStore::new(config.root.clone())),
            ArchiveLayout::from(config),
        )
    }

    pub fn root(&self) -> &Path {
        self.store.root()
    }

    pub fn layout(&self) -> &ArchiveLayout {
        &self.layout
    }

    pub(crate) fn store(&self) -> &dyn ArchiveStore {
        self.store.as_ref()
    }

    /// Numeric index of a volume name, `None` if the name does not conform
    pub fn volume_index(&self, name: &str) -> Option<u32> {
        let digits = name.strip_prefix(self.layout.volume_prefix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Canonical volume name for an index
    pub fn volume_name(&self, index: u32) -> String {
        format!("{}{index:05}", self.layout.volume_prefix)
    }

    /// List conforming volume directories in name order
    ///
    /// Plain files are ignored; directories with non-conforming names
    /// are skipped with a warning.
    pub fn list_volumes(&self) -> Result<Vec<Volume>> {
        let mut volumes = Vec::new();
        for entry in self.store.list(Path::new(""))? {
            if !entry.is_dir() {
                continue;
            }
            if self.volume_index(&entry.name).is_none() {
                tracing::warn!(volume = %entry.name, "Skipping non-conforming volume directory");
                continue;
            }
            volumes.push(Volume {
                archive: self.clone(),
                name: entry.name,
            });
        }
        Ok(volumes)
    }

    /// Open a volume by directory name
    pub fn open_volume(&self, name: &str) -> Result<Volume> {
        check_segment(name, "volume")?;
        match self.store.kind(Path::new(name))? {
            EntryKind::Directory => Ok(Volume {
                archive: self.clone(),
                name: name.to_string(),
            }),
            EntryKind::File => Err(DxrayError::InvalidEntry(format!(
                "Volume {name} is not a directory"
            ))),
        }
    }

    /// Open a volume by its numeric index
    pub fn open_volume_by_index(&self, index: u32) -> Result<Volume> {
        self.open_volume(&self.volume_name(index))
    }

    /// Visit every listed volume, stopping on the first error
    pub fn for_each_volume<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(Volume) -> Result<()>,
    {
        for volume in self.list_volumes()? {
            visit(volume)?;
        }
        Ok(())
    }

    /// Reopen a study from its `<volume>/<study>` key
    pub fn open_study_by_key(&self, key: &str) -> Result<StudyHandle> {
        let (volume, study) = split_key(key)?;
        self.open_volume(volume)?.open_study(study)
    }

    /// Map an object path from a descriptor onto the local archive root
    ///
    /// Backslashes are normalised to `/`. Paths starting with the
    /// configured object prefix (compared case-insensitively) are
    /// rebased onto the root; anything else passes through unchanged.
    pub fn resolve_object_path(&self, raw: &str) -> PathBuf {
        let normalized = raw.replace('\\', "/");
        match strip_prefix_ignore_case(&normalized, &self.layout.object_prefix) {
            Some(rest) => self.root().join(rest.trim_start_matches('/')),
            None => PathBuf::from(normalized),
        }
    }

    /// Read an object file
    pub fn read_object(&self, path: &Path) -> Result<Vec<u8>> {
        self.store.read(path)
    }
}

/// Split a `<volume>/<study>` key
pub fn split_key(key: &str) -> Result<(&str, &str)> {
    let parts: Vec<&str> = key.split('/').collect();
    match parts.as_slice() {
        [volume, study] if !volume.is_empty() && !study.is_empty() => Ok((volume, study)),
        _ => Err(DxrayError::InvalidEntry(format!(
            "Invalid study key {key:?}, expected <volume>/<study>"
        ))),
    }
}

/// Numeric index from the leading segment of a study name
pub fn study_index(name: &str) -> Option<u32> {
    let leading = name.split('_').next()?;
    leading.parse().ok()
}

fn check_segment(name: &str, what: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(DxrayError::InvalidEntry(format!(
            "Invalid {what} name {name:?}"
        )));
    }
    Ok(())
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}

/// One volume directory
#[derive(Debug, Clone)]
pub struct Volume {
    archive: Archive,
    name: String,
}

impl Volume {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> PathBuf {
        self.archive.root().join(&self.name)
    }

    /// Numeric index, `None` for non-conforming names
    pub fn index(&self) -> Option<u32> {
        self.archive.volume_index(&self.name)
    }

    /// Study directories in name order
    pub fn list_studies(&self) -> Result<Vec<StudyHandle>> {
        Ok(self
            .archive
            .store
            .list(Path::new(&self.name))?
            .into_iter()
            .filter(Entry::is_dir)
            .map(|entry| StudyHandle::new(self.archive.clone(), &self.name, entry.name))
            .collect())
    }

    pub fn count_studies(&self) -> Result<usize> {
        Ok(self
            .archive
            .store
            .list(Path::new(&self.name))?
            .iter()
            .filter(|e| e.is_dir())
            .count())
    }

    /// Open a study by directory name
    pub fn open_study(&self, name: &str) -> Result<StudyHandle> {
        check_segment(name, "study")?;
        let rel = Path::new(&self.name).join(name);
        match self.archive.store.kind(&rel)? {
            EntryKind::Directory => Ok(StudyHandle::new(
                self.archive.clone(),
                &self.name,
                name.to_string(),
            )),
            EntryKind::File => Err(DxrayError::InvalidEntry(format!(
                "Study {}/{name} is not a directory",
                self.name
            ))),
        }
    }

    /// Visit every study, stopping on the first error
    pub fn for_each_study<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(StudyHandle) -> Result<()>,
    {
        for study in self.list_studies()? {
            visit(study)?;
        }
        Ok(())
    }

    /// First study in listing order
    pub fn first_study(&self) -> Result<Option<StudyHandle>> {
        Ok(self.list_studies()?.into_iter().next())
    }

    /// Last study in listing order
    pub fn last_study(&self) -> Result<Option<StudyHandle>> {
        Ok(self.list_studies()?.into_iter().next_back())
    }
}
