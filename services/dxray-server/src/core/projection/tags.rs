//! DICOM element tags merged into viewer instances.

use crate::core::error::{DxrayError, Result};
use dicom::core::dictionary::DataDictionary;
use dicom::core::value::Value;
use dicom::core::PrimitiveValue;
use dicom::dictionary_std::{tags, StandardDataDictionary};
use dicom::object::OpenFileOptions;
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::path::Path;

/// Tag name to value mapping of one object file
pub type TagMap = Map<String, JsonValue>;

/// Reads the DICOM element tags of an object file
pub trait TagReader: Send + Sync + fmt::Debug {
    fn read_tags(&self, path: &Path) -> Result<TagMap>;
}

/// Tag reader backed by the `dicom` crate
///
/// Reads the data set up to the pixel data and names each standard
/// element by its dictionary alias in lowerCamelCase. Empty values,
/// sequences, pixel fragments, raw byte values and private elements
/// are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DicomTagReader;

impl TagReader for DicomTagReader {
    fn read_tags(&self, path: &Path) -> Result<TagMap> {
        if !path.is_file() {
            return Err(DxrayError::NotFound(path.display().to_string()));
        }

        let obj = OpenFileOptions::new()
            .read_until(tags::PIXEL_DATA)
            .open_file(path)
            .map_err(|e| {
                DxrayError::ParseError(format!("Failed to read {}: {e}", path.display()))
            })?;

        let mut out = TagMap::new();
        for elem in obj.iter() {
            let tag = elem.header().tag;
            let Value::Primitive(value) = elem.value() else {
                continue;
            };
            let Some(entry) = StandardDataDictionary.by_tag(tag) else {
                continue;
            };
            let Some(json) = json_value(value) else {
                continue;
            };

            if tag == tags::IMAGER_PIXEL_SPACING {
                let spacing = value.to_multi_str();
                if let [row, col, ..] = spacing.as_ref() {
                    out.insert(
                        "pixelSpacing".to_string(),
                        JsonValue::from(format!("{}\\{}", row.trim(), col.trim())),
                    );
                }
            }

            out.insert(lower_camel(entry.alias), json);
        }

        Ok(out)
    }
}

/// Convert a primitive value, `None` for values that are skipped
fn json_value(value: &PrimitiveValue) -> Option<JsonValue> {
    let values: Vec<JsonValue> = match value {
        PrimitiveValue::Empty | PrimitiveValue::U8(_) => return None,
        PrimitiveValue::Str(s) => vec![JsonValue::from(s.trim())],
        PrimitiveValue::Strs(s) => s.iter().map(|v| JsonValue::from(v.trim())).collect(),
        PrimitiveValue::U16(v) => v.iter().map(|&n| JsonValue::from(n)).collect(),
        PrimitiveValue::I16(v) => v.iter().map(|&n| JsonValue::from(n)).collect(),
        PrimitiveValue::U32(v) => v.iter().map(|&n| JsonValue::from(n)).collect(),
        PrimitiveValue::I32(v) => v.iter().map(|&n| JsonValue::from(n)).collect(),
        PrimitiveValue::U64(v) => v.iter().map(|&n| JsonValue::from(n)).collect(),
        PrimitiveValue::I64(v) => v.iter().map(|&n| JsonValue::from(n)).collect(),
        PrimitiveValue::F32(v) => v.iter().map(|&n| JsonValue::from(f64::from(n))).collect(),
        PrimitiveValue::F64(v) => v.iter().map(|&n| JsonValue::from(n)).collect(),
        other => other
            .to_multi_str()
            .iter()
            .map(|v| JsonValue::from(v.trim()))
            .collect(),
    };

    if values.iter().all(|v| v.as_str() == Some("")) {
        return None;
    }

    let mut values = values;
    if values.len() == 1 {
        values.pop()
    } else {
        Some(JsonValue::Array(values))
    }
}

/// `PatientName` -> `patientName`, `SOPInstanceUID` -> `sopInstanceUID`
pub fn lower_camel(alias: &str) -> String {
    let chars: Vec<char> = alias.chars().collect();
    let upper = chars.iter().take_while(|c| c.is_ascii_uppercase()).count();

    // An acronym keeps its last capital when a word follows it
    let lower = match upper {
        0 => 0,
        n if n == chars.len() => n,
        1 => 1,
        n if chars[n].is_ascii_lowercase() => n - 1,
        n => n,
    };

    chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i < lower { c.to_ascii_lowercase() } else { *c })
        .collect()
}
