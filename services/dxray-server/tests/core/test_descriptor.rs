//! Descriptor decoding tests

use crate::common::{study_xml, TestArchive};
use dxray::core::archive::Archive;
use dxray::core::descriptor::PatientName;
use dxray::core::error::DxrayError;

#[test]
fn test_name_decomposition() {
    let full = PatientName::parse("Smith^Rex Labrador");
    assert_eq!(full.owner, "Smith");
    assert_eq!(full.animal, "Rex");
    assert_eq!(full.race, "Labrador");

    let bare = PatientName::parse("NoCaretHere");
    assert_eq!(bare.owner, "NoCaretHere");
    assert_eq!(bare.animal, "unknown");
    assert_eq!(bare.race, "unknown");
}

#[test]
fn test_load_latin1_descriptor() {
    let fixture = TestArchive::new();
    let mut bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n\
        <Imagelist><Patient><Name>M\xfcller^Bello Sch\xe4ferhund</Name>\
        <Visit><Study><UID>1.5</UID></Study></Visit></Patient></Imagelist>"
        .to_vec();
    bytes.push(b'\n');
    fixture.add_study_bytes("VOL00001", "1_a", &bytes);

    let archive = Archive::open(&fixture.config().archive);
    let study = archive.open_study_by_key("VOL00001/1_a").unwrap();
    let name = study.load().unwrap().patient.decomposed_name();

    assert_eq!(name.owner, "Müller");
    assert_eq!(name.animal, "Bello");
    assert_eq!(name.race, "Schäferhund");
}

#[test]
fn test_load_caches_first_result() {
    let fixture = TestArchive::new();
    let path = fixture.add_study("VOL00001", "1_a", &study_xml("Smith^Rex", "1.1", &[]));
    let archive = Archive::open(&fixture.config().archive);
    let study = archive.open_study_by_key("VOL00001/1_a").unwrap();

    let first = study.load().unwrap();
    std::fs::remove_file(path).unwrap();
    let second = study.load().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_malformed_and_missing_descriptors() {
    let fixture = TestArchive::new();
    fixture.add_study("VOL00001", "1_a", "<Imagelist><Patient><Name>Smith");
    fixture.add_dir("VOL00001/2_b");
    let archive = Archive::open(&fixture.config().archive);

    let broken = archive.open_study_by_key("VOL00001/1_a").unwrap();
    assert!(matches!(
        broken.load().unwrap_err(),
        DxrayError::ParseError(_)
    ));
    assert!(!broken.is_loaded());

    let empty = archive.open_study_by_key("VOL00001/2_b").unwrap();
    assert!(empty.load().unwrap_err().is_not_found());
}
