use crate::core::archive::StudyHandle;
use crate::core::descriptor::StudyMetadata;
use crate::core::error::Result;
use serde::{Deserialize, Serialize};

/// Flattened, searchable projection of one study descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub key: String,
    pub owner: String,
    /// Animal name
    pub patient: String,
    pub race: String,
    pub id: String,
    pub uid: String,
    pub date: String,
    /// Study description and every non-empty series description,
    /// one per line
    pub description: String,
}

impl SearchDocument {
    /// Build the document for a study, loading its descriptor if needed
    pub fn from_study(study: &StudyHandle) -> Result<Self> {
        let metadata = study.load()?;
        Ok(Self::from_metadata(study.key(), &metadata))
    }

    pub fn from_metadata(key: String, metadata: &StudyMetadata) -> Self {
        let patient = &metadata.patient;
        let study = metadata.study();
        let name = patient.decomposed_name();

        let description: Vec<&str> = std::iter::once(study.description.as_str())
            .chain(study.series.iter().map(|s| s.description.as_str()))
            .filter(|d| !d.is_empty())
            .collect();

        Self {
            key,
            owner: name.owner,
            patient: name.animal,
            race: name.race,
            id: patient.id.clone(),
            uid: study.uid.clone(),
            date: study.date.clone(),
            description: description.join("\n"),
        }
    }
}
