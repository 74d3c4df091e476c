//! Service surface tests

use crate::common::{create_test_services, scan_all, url_for, TestArchive};
use dxray::core::types::ListQuery;

fn page(limit: i64, offset: i64) -> ListQuery {
    ListQuery {
        limit: Some(limit),
        offset: Some(offset),
    }
}

fn uids(studies: &[dxray::core::projection::StudyJson]) -> Vec<String> {
    studies
        .iter()
        .map(|s| s.study_instance_uid.clone())
        .collect()
}

#[test]
fn test_list_is_newest_first() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);

    let all = services.list_studies(&page(100, 0), &url_for).unwrap();
    assert_eq!(uids(&all), vec!["2.1", "1.3", "1.2", "1.1"]);
}

#[test]
fn test_list_pages_across_volumes() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);

    let studies = services.list_studies(&page(2, 1), &url_for).unwrap();
    assert_eq!(uids(&studies), vec!["1.3", "1.2"]);
}

#[test]
fn test_list_does_not_need_the_index() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);
    assert_eq!(services.index().count(), 0);
    assert_eq!(
        services
            .list_studies(&ListQuery::default(), &url_for)
            .unwrap()
            .len(),
        4
    );
}

#[test]
fn test_list_rejects_negative_values() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);
    assert!(services
        .list_studies(&page(-1, 0), &url_for)
        .unwrap_err()
        .is_bad_request());
    assert!(services
        .list_studies(&page(1, -5), &url_for)
        .unwrap_err()
        .is_bad_request());
}

#[test]
fn test_search_skips_vanished_studies() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);
    scan_all(&services);
    std::fs::remove_dir_all(fixture.root().join("VOL00002/1_d")).unwrap();

    let hits = services.search_studies("race:beagle", &url_for).unwrap();
    assert_eq!(uids(&hits), vec!["1.2"]);
}

#[test]
fn test_rescan_only_adds_new_studies() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);

    let first = scan_all(&services);
    assert_eq!((first.total, first.new, first.known), (4, 4, 0));

    fixture.add_study(
        "VOL00002",
        "2_e",
        &crate::common::study_xml("Wagner^Kira Husky", "2.2", &[]),
    );
    let second = scan_all(&services);
    assert_eq!((second.total, second.new, second.known), (5, 1, 4));
    assert_eq!(services.health().indexed_studies, 5);
}

#[test]
fn test_volume_summaries() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);
    let summaries = services.volume_summaries().unwrap();

    let names: Vec<&str> = summaries.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["VOL00002", "VOL00001"]);
    assert_eq!(summaries[1].studies, 3);
}
