//! Study descriptor parsing.
//!
//! Every study directory carries one XML descriptor listing the
//! patient, the study and its series and instances. Descriptors are
//! written by the acquisition console and frequently use a legacy
//! single-byte encoding, so the encoding is detected before the XML
//! is deserialized.

use crate::core::error::{DxrayError, Result};
use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder for missing animal name and race
pub const UNKNOWN: &str = "unknown";

/// Bytes inspected for the XML declaration
const DECLARATION_WINDOW: usize = 256;

static ENCODING_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"encoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#).unwrap());

/// Decoded study descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename(deserialize = "Imagelist"))]
pub struct StudyMetadata {
    #[serde(rename(deserialize = "Patient"), default)]
    pub patient: Patient,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Compound `<owner>^<animal> <race words>` field
    #[serde(rename(deserialize = "Name"), default)]
    pub name: String,

    #[serde(rename(deserialize = "ID"), default)]
    pub id: String,

    #[serde(rename(deserialize = "Birth"), default)]
    pub birth: String,

    #[serde(rename(deserialize = "Sex"), default)]
    pub sex: String,

    #[serde(rename(deserialize = "Visit"), default)]
    pub visit: Visit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    #[serde(rename(deserialize = "Study"), default)]
    pub study: Study,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Study {
    #[serde(rename(deserialize = "UID"), default)]
    pub uid: String,

    #[serde(rename(deserialize = "Date"), default)]
    pub date: String,

    #[serde(rename(deserialize = "Description"), default)]
    pub description: String,

    #[serde(rename(deserialize = "Series"), default)]
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    #[serde(rename(deserialize = "UID"), default)]
    pub uid: String,

    #[serde(
        rename(deserialize = "Number"),
        default,
        deserialize_with = "lenient_number"
    )]
    pub number: u32,

    #[serde(rename(deserialize = "Description"), default)]
    pub description: String,

    #[serde(rename(deserialize = "Protocol"), default)]
    pub protocol: String,

    #[serde(rename(deserialize = "Modality"), default)]
    pub modality: String,

    #[serde(rename(deserialize = "Instance"), default)]
    pub instances: Vec<Instance>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(rename(deserialize = "UID"), default)]
    pub uid: String,

    #[serde(
        rename(deserialize = "Number"),
        default,
        deserialize_with = "lenient_number"
    )]
    pub number: u32,

    #[serde(rename(deserialize = "Data"), default)]
    pub data: InstanceData,
}

/// Location of the instance's object file, as written by the console
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceData {
    #[serde(rename(deserialize = "DICOM"), default)]
    pub dicom: String,
}

/// Parts of the compound patient name field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientName {
    pub owner: String,
    pub animal: String,
    pub race: String,
}

impl PatientName {
    /// Split `"<owner>^<animal> <race words>"`
    pub fn parse(raw: &str) -> Self {
        let Some((owner, rest)) = raw.split_once('^') else {
            return Self {
                owner: raw.to_string(),
                animal: UNKNOWN.to_string(),
                race: UNKNOWN.to_string(),
            };
        };

        let mut words = rest.split_whitespace();
        let animal = words.next().unwrap_or(UNKNOWN).to_string();
        let race: Vec<&str> = words.collect();
        let race = if race.is_empty() {
            UNKNOWN.to_string()
        } else {
            race.join(" ")
        };

        Self {
            owner: owner.to_string(),
            animal,
            race,
        }
    }
}

impl Patient {
    pub fn decomposed_name(&self) -> PatientName {
        PatientName::parse(&self.name)
    }
}

impl StudyMetadata {
    pub fn study(&self) -> &Study {
        &self.patient.visit.study
    }

    /// Find a series by UID
    pub fn series(&self, uid: &str) -> Option<&Series> {
        self.study().series.iter().find(|s| s.uid == uid)
    }
}

impl Series {
    /// Find an instance by UID
    pub fn instance(&self, uid: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.uid == uid)
    }
}

/// Decode a descriptor from raw bytes
pub fn parse(bytes: &[u8]) -> Result<StudyMetadata> {
    let text = decode(bytes)?;
    quick_xml::de::from_str(&text).map_err(|e| DxrayError::ParseError(e.to_string()))
}

/// Detect the descriptor encoding and decode it to UTF-8
///
/// A byte-order mark wins over the XML declaration; without either
/// the document is read as UTF-8.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes)?, bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
        .ok_or_else(|| {
            DxrayError::ParseError(format!("Descriptor is not valid {}", encoding.name()))
        })
}

fn declared_encoding(bytes: &[u8]) -> Result<&'static Encoding> {
    let head = &bytes[..bytes.len().min(DECLARATION_WINDOW)];
    let Some(label) = ENCODING_DECL.captures(head).and_then(|c| c.get(1)) else {
        return Ok(UTF_8);
    };

    Encoding::for_label(label.as_bytes()).ok_or_else(|| {
        DxrayError::ParseError(format!(
            "Unknown descriptor encoding: {}",
            String::from_utf8_lossy(label.as_bytes())
        ))
    })
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .map_err(|_| serde::de::Error::custom(format!("invalid number: {trimmed:?}")))
}
