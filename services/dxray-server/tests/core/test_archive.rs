//! Archive store tests

use crate::common::{study_xml, TestArchive};
use dxray::core::archive::{split_key, Archive};
use dxray::core::error::DxrayError;
use dxray::core::scan::{CancellationToken, Scanner};
use std::path::PathBuf;

fn open(archive: &TestArchive) -> Archive {
    Archive::open(&archive.config().archive)
}

#[test]
fn test_list_volumes_skips_files_and_foreign_names() {
    let fixture = TestArchive::standard();
    fixture.add_dir("VOLUME_OLD");
    fixture.add_file("VOL00003", b"a file named like a volume");

    let names: Vec<String> = open(&fixture)
        .list_volumes()
        .unwrap()
        .iter()
        .map(|v| v.name().to_string())
        .collect();
    assert_eq!(names, vec!["VOL00001", "VOL00002"]);
}

#[test]
fn test_list_volumes_empty_archive() {
    let fixture = TestArchive::new();
    assert!(open(&fixture).list_volumes().unwrap().is_empty());
}

#[test]
fn test_list_volumes_missing_root() {
    let fixture = TestArchive::new();
    let mut config = fixture.config().archive;
    config.root = fixture.root().join("unmounted");

    let err = Archive::open(&config).list_volumes().unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_keys_reopen_equal_handles() {
    let fixture = TestArchive::standard();
    let archive = open(&fixture);

    let studies: Vec<_> = Scanner::new(archive.clone())
        .scan(&CancellationToken::new())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(studies.len(), 4);

    for study in studies {
        let key = study.key();
        let (volume, name) = split_key(&key).unwrap();
        assert_eq!(volume, study.volume_name());
        assert_eq!(name, study.name());
        assert_eq!(archive.open_study_by_key(&key).unwrap(), study);
    }
}

#[test]
fn test_open_study_errors() {
    let fixture = TestArchive::standard();
    fixture.add_file("VOL00001/4_file", b"not a study");
    let archive = open(&fixture);

    assert!(archive
        .open_study_by_key("VOL00001/9_z")
        .unwrap_err()
        .is_not_found());
    assert!(archive
        .open_study_by_key("VOL00009/1_a")
        .unwrap_err()
        .is_not_found());
    assert!(matches!(
        archive.open_study_by_key("VOL00001/4_file").unwrap_err(),
        DxrayError::InvalidEntry(_)
    ));
    assert!(matches!(
        archive.open_study_by_key("VOL00001").unwrap_err(),
        DxrayError::InvalidEntry(_)
    ));
}

#[test]
fn test_volume_lookup_by_index() {
    let fixture = TestArchive::standard();
    let archive = open(&fixture);

    let volume = archive.open_volume_by_index(2).unwrap();
    assert_eq!(volume.name(), "VOL00002");
    assert_eq!(volume.count_studies().unwrap(), 1);
    assert_eq!(
        volume.first_study().unwrap().map(|s| s.name().to_string()),
        Some("1_d".to_string())
    );
}

#[test]
fn test_study_object_paths_resolve_under_root() {
    let fixture = TestArchive::new();
    let dicom = "\\dicompacs\\OrConsoleDB\\VOL00001\\1_a\\I_000001.dcm";
    fixture.add_study(
        "VOL00001",
        "1_a",
        &study_xml("Smith^Rex", "1.1", &[("1.1.1.1", dicom)]),
    );
    let archive = open(&fixture);
    let study = archive.open_study_by_key("VOL00001/1_a").unwrap();
    let metadata = study.load().unwrap();
    let instance = &metadata.study().series[0].instances[0];

    let expected: PathBuf = fixture.root().join("VOL00001/1_a/I_000001.dcm");
    assert_eq!(study.resolve_object_path(instance), expected);
}
