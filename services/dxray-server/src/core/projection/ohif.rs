//! Viewer study tree.

use super::tags::TagReader;
use crate::core::archive::StudyHandle;
use crate::core::descriptor::{Instance, Series};
use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Instance keys tag values may not replace
const PROTECTED_KEYS: [&str; 3] = ["url", "sopInstanceUid", "instanceNumber"];

/// One study as consumed by the viewer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyJson {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub study_instance_uid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub study_date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub patient_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub patient_birth_date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub patient_sex: String,
    #[serde(default)]
    pub animal_name: String,
    #[serde(default)]
    pub animal_race: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series_list: Vec<SeriesJson>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesJson {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub series_description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub series_instance_uid: String,
    #[serde(default)]
    pub series_number: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub series_modality: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instances: Vec<Map<String, JsonValue>>,
}

/// Body of the single-study viewer endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OhifResponse {
    pub studies: Vec<StudyJson>,
}

/// Project a study into the viewer model
///
/// `urls` builds the retrieval URL of an instance from its study,
/// series and instance UIDs. With a tag reader each instance object
/// also carries the DICOM tags of its file; an instance whose tags
/// cannot be read is emitted without them.
pub fn project_study<F>(
    study: &StudyHandle,
    urls: &F,
    tags: Option<&dyn TagReader>,
) -> Result<StudyJson>
where
    F: Fn(&str, &str, &str) -> String + ?Sized,
{
    let model = study.load()?;
    let patient = &model.patient;
    let name = patient.decomposed_name();
    let visit = &patient.visit.study;

    let series_list = visit
        .series
        .iter()
        .map(|series| SeriesJson {
            series_description: series.description.clone(),
            series_instance_uid: series.uid.clone(),
            series_number: series.number.to_string(),
            series_modality: series.modality.clone(),
            instances: series
                .instances
                .iter()
                .map(|instance| project_instance(study, &visit.uid, series, instance, urls, tags))
                .collect(),
        })
        .collect();

    Ok(StudyJson {
        study_instance_uid: visit.uid.clone(),
        study_date: visit.date.clone(),
        patient_name: name.owner,
        patient_birth_date: patient.birth.clone(),
        patient_id: patient.id.clone(),
        patient_sex: patient.sex.clone(),
        animal_name: name.animal,
        animal_race: name.race,
        series_list,
    })
}

fn project_instance<F>(
    study: &StudyHandle,
    study_uid: &str,
    series: &Series,
    instance: &Instance,
    urls: &F,
    tags: Option<&dyn TagReader>,
) -> Map<String, JsonValue>
where
    F: Fn(&str, &str, &str) -> String + ?Sized,
{
    let mut out = Map::new();
    out.insert(
        "instanceNumber".to_string(),
        JsonValue::from(instance.number.to_string()),
    );
    out.insert(
        "sopInstanceUid".to_string(),
        JsonValue::from(instance.uid.as_str()),
    );
    out.insert(
        "url".to_string(),
        JsonValue::from(urls(study_uid, &series.uid, &instance.uid)),
    );
    out.insert(
        "frameOfReferenceUID".to_string(),
        JsonValue::from(series.uid.as_str()),
    );
    out.insert(
        "imageOrientationPatient".to_string(),
        JsonValue::from("0\\0\\0\\0\\0\\0"),
    );
    out.insert(
        "imagePositionPatient".to_string(),
        JsonValue::from("0\\0\\0"),
    );

    let Some(reader) = tags else {
        return out;
    };

    let path = study.resolve_object_path(instance);
    match reader.read_tags(&path) {
        Ok(values) => {
            for (name, value) in values {
                if !PROTECTED_KEYS.contains(&name.as_str()) {
                    out.insert(name, value);
                }
            }
        }
        Err(e) => tracing::warn!(
            study = %study.key(),
            instance = %instance.uid,
            path = %path.display(),
            error = %e,
            "Failed to read DICOM tags"
        ),
    }

    out
}
