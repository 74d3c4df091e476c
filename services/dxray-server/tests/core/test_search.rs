//! Search index tests

use crate::common::{create_test_services, scan_all, study_xml, TestArchive};
use dxray::core::archive::Archive;
use dxray::core::error::DxrayError;
use dxray::core::search::SearchIndex;
use dxray::core::storage::MANIFEST_FILE;
use tempfile::TempDir;

#[test]
fn test_add_twice_counts_once() {
    let fixture = TestArchive::standard();
    let archive = Archive::open(&fixture.config().archive);
    let index = SearchIndex::in_memory(100).unwrap();
    let study = archive.open_study_by_key("VOL00001/2_b").unwrap();

    let before = index.count();
    assert!(index.add(&study).unwrap());
    assert!(!index.add(&study).unwrap());
    assert_eq!(index.count(), before + 1);
}

#[test]
fn test_shared_uid_is_ambiguous() {
    let fixture = TestArchive::new();
    fixture.add_study("VOL00001", "1_a", &study_xml("Smith^Rex", "1.7", &[]));
    fixture.add_study("VOL00002", "1_b", &study_xml("Jones^Bella", "1.7", &[]));
    fixture.add_study("VOL00002", "2_c", &study_xml("Brown^Max", "1.8", &[]));
    let services = create_test_services(&fixture);
    scan_all(&services);

    assert!(matches!(
        services.index().find_by_uid("1.7").unwrap_err(),
        DxrayError::AmbiguousIdentifier(_)
    ));
    assert_eq!(services.index().find_by_uid("1.8").unwrap(), "VOL00002/2_c");
}

#[test]
fn test_search_fields() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);
    scan_all(&services);
    let index = services.index();

    let mut beagles = index.search("race:beagle").unwrap();
    beagles.sort();
    assert_eq!(beagles, vec!["VOL00001/2_b", "VOL00002/1_d"]);

    assert_eq!(index.search("owner:smith").unwrap(), vec!["VOL00001/1_a"]);
    assert_eq!(index.search("patient:max").unwrap(), vec!["VOL00001/3_c"]);
    assert_eq!(index.search("lateral").unwrap().len(), 4);
    assert!(index.search("poodle").unwrap().is_empty());
}

#[test]
fn test_search_rejects_bad_queries() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);

    assert!(services.index().search("").unwrap_err().is_bad_request());
    assert!(services.index().search("breed:beagle").unwrap_err().is_bad_request());
}

#[test]
fn test_index_persists_across_reopen() {
    let fixture = TestArchive::standard();
    let index_dir = TempDir::new().unwrap();
    let archive = Archive::open(&fixture.config().archive);

    {
        let index = SearchIndex::open_path(index_dir.path(), 100).unwrap();
        let study = archive.open_study_by_key("VOL00001/1_a").unwrap();
        assert!(index.add(&study).unwrap());
    }
    assert!(index_dir.path().join(MANIFEST_FILE).exists());

    let reopened = SearchIndex::open_path(index_dir.path(), 100).unwrap();
    assert_eq!(reopened.count(), 1);
    assert!(reopened.contains("VOL00001/1_a").unwrap());

    let again = archive.open_study_by_key("VOL00001/1_a").unwrap();
    assert!(!reopened.add(&again).unwrap());
    assert!(!again.is_loaded());
}
