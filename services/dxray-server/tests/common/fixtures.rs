// Test fixtures: synthetic archives on disk

use dicom::core::{DataElement, PrimitiveValue, VR};
use dicom::dictionary_std::{tags, StandardDataDictionary};
use dicom::object::{FileDicomObject, FileMetaTableBuilder};
use dicom::transfer_syntax::entries::EXPLICIT_VR_LITTLE_ENDIAN;
use dxray::core::config::{Config, IN_MEMORY_INDEX};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Object path as the console writes it into descriptors
#[allow(dead_code)]
pub fn object_path(volume: &str, study: &str, file: &str) -> String {
    format!("/DICOMPACS/ORCONSOLEDB/{volume}/{study}/{file}")
}

/// Descriptor with one DX series whose instances are `(uid, object path)`
#[allow(dead_code)]
pub fn study_xml(name: &str, uid: &str, instances: &[(&str, &str)]) -> String {
    let instances: String = instances
        .iter()
        .enumerate()
        .map(|(i, (instance_uid, path))| {
            format!(
                "<Instance><UID>{instance_uid}</UID><Number>{}</Number>\
                 <Data><DICOM>{path}</DICOM></Data></Instance>",
                i + 1
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Imagelist><Patient><Name>{name}</Name><ID>P-{uid}</ID><Birth>20150302</Birth>\
         <Sex>F</Sex><Visit><Study><UID>{uid}</UID><Date>20240105</Date>\
         <Description>Thorax</Description><Series><UID>{uid}.1</UID><Number>1</Number>\
         <Description>Lateral</Description><Modality>DX</Modality>{instances}</Series>\
         </Study></Visit></Patient></Imagelist>"
    )
}

/// Write a minimal DICOM file carrying a SOP instance UID and a size
#[allow(dead_code)]
pub fn write_dicom(path: &Path, sop_instance_uid: &str) {
    let meta = FileMetaTableBuilder::new()
        .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.1.1")
        .media_storage_sop_instance_uid(sop_instance_uid)
        .transfer_syntax(EXPLICIT_VR_LITTLE_ENDIAN.uid())
        .build()
        .expect("Failed to build file meta");
    let mut obj = FileDicomObject::new_empty_with_dict_and_meta(StandardDataDictionary, meta);
    obj.put(DataElement::new(
        tags::SOP_INSTANCE_UID,
        VR::UI,
        PrimitiveValue::from(sop_instance_uid),
    ));
    obj.put(DataElement::new(
        tags::MODALITY,
        VR::CS,
        PrimitiveValue::from("DX"),
    ));
    obj.put(DataElement::new(
        tags::COLUMNS,
        VR::US,
        PrimitiveValue::from(1024_u16),
    ));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create directories");
    }
    obj.write_to_file(path).expect("Failed to write DICOM file");
}

/// Archive directory tree in a temporary directory
pub struct TestArchive {
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestArchive {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// `VOL00001: [1_a, 2_b, 3_c]`, `VOL00002: [1_d]` plus a stray
    /// file and a non-conforming directory at the root
    pub fn standard() -> Self {
        let archive = Self::new();
        for (volume, study, name, uid) in [
            ("VOL00001", "1_a", "Smith^Rex Labrador", "1.1"),
            ("VOL00001", "2_b", "Jones^Bella Beagle", "1.2"),
            ("VOL00001", "3_c", "Brown^Max Border Collie", "1.3"),
            ("VOL00002", "1_d", "Miller^Luna Beagle", "2.1"),
        ] {
            let dicom = object_path(volume, study, "I_000001.dcm");
            let instance_uid = format!("{uid}.1.1");
            archive.add_study(
                volume,
                study,
                &study_xml(name, uid, &[(instance_uid.as_str(), dicom.as_str())]),
            );
        }
        archive.add_file("README.txt", b"not a volume");
        archive.add_dir("lost+found");
        archive
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn add_dir(&self, rel: &str) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(&path).expect("Failed to create directories");
        path
    }

    pub fn add_file(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directories");
        }
        fs::write(&path, contents).expect("Failed to write file");
        path
    }

    pub fn add_study(&self, volume: &str, study: &str, descriptor: &str) -> PathBuf {
        self.add_study_bytes(volume, study, descriptor.as_bytes())
    }

    pub fn add_study_bytes(&self, volume: &str, study: &str, descriptor: &[u8]) -> PathBuf {
        self.add_file(&format!("{volume}/{study}/study.xml"), descriptor)
    }

    /// Configuration for this archive with an in-memory index
    pub fn config(&self) -> Config {
        let mut config = Config::for_archive(self.root());
        config.index.path = PathBuf::from(IN_MEMORY_INDEX);
        config
    }
}
