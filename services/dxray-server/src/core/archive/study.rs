//! Study Handle: one study directory plus its lazily loaded descriptor.

use super::{study_index, Archive};
use crate::core::descriptor::{self, Instance, StudyMetadata};
use crate::core::error::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Handle to one study
///
/// The descriptor is read at most once per handle. `load` holds the
/// handle's lock for the whole read so concurrent callers share one
/// result; `model` only returns what has already been loaded.
pub struct StudyHandle {
    archive: Archive,
    volume: String,
    name: String,
    model: Mutex<Option<Arc<StudyMetadata>>>,
}

impl StudyHandle {
    pub(crate) fn new(archive: Archive, volume: &str, name: String) -> Self {
        Self {
            archive,
            volume: volume.to_string(),
            name,
            model: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn volume_name(&self) -> &str {
        &self.volume
    }

    /// Index key `<volume>/<study>`
    pub fn key(&self) -> String {
        format!("{}/{}", self.volume, self.name)
    }

    /// Numeric index from the leading name segment
    pub fn index(&self) -> Option<u32> {
        study_index(&self.name)
    }

    /// Volume index of the owning volume
    pub fn volume_index(&self) -> Option<u32> {
        self.archive.volume_index(&self.volume)
    }

    pub fn path(&self) -> PathBuf {
        self.archive.root().join(self.relative_path())
    }

    fn relative_path(&self) -> PathBuf {
        Path::new(&self.volume).join(&self.name)
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.path().join(&self.archive.layout().descriptor_name)
    }

    /// Load the descriptor, reusing an earlier successful load
    pub fn load(&self) -> Result<Arc<StudyMetadata>> {
        let mut model = self.model.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(loaded) = model.as_ref() {
            return Ok(Arc::clone(loaded));
        }

        let rel = self
            .relative_path()
            .join(&self.archive.layout().descriptor_name);
        let bytes = self.archive.store().read(&rel)?;
        let loaded = Arc::new(descriptor::parse(&bytes)?);
        *model = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Metadata from a previous `load`, never loads implicitly
    pub fn model(&self) -> Option<Arc<StudyMetadata>> {
        self.model
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.model().is_some()
    }

    /// Local path of an instance's object file
    pub fn resolve_object_path(&self, instance: &Instance) -> PathBuf {
        self.archive.resolve_object_path(&instance.data.dicom)
    }

    pub fn archive(&self) -> &Archive {
        &self.archive
    }
}

impl PartialEq for StudyHandle {
    fn eq(&self, other: &Self) -> bool {
        self.volume == other.volume
            && self.name == other.name
            && self.archive.root() == other.archive.root()
    }
}

impl Eq for StudyHandle {}

impl fmt::Debug for StudyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudyHandle")
            .field("volume", &self.volume)
            .field("name", &self.name)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
