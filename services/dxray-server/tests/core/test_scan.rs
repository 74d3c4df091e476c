//! Scanner tests

use crate::common::{study_xml, TestArchive};
use dxray::core::archive::Archive;
use dxray::core::scan::{CancellationToken, Scanner};

fn archive_with(studies: usize) -> TestArchive {
    let fixture = TestArchive::new();
    for i in 0..studies {
        let volume = format!("VOL{:05}", i / 3 + 1);
        let study = format!("{}_s", i + 1);
        fixture.add_study(&volume, &study, &study_xml("Smith^Rex", &format!("1.{i}"), &[]));
    }
    fixture
}

#[test]
fn test_scan_visits_volumes_then_studies_in_order() {
    let fixture = archive_with(5);
    let scanner = Scanner::new(Archive::open(&fixture.config().archive));

    let keys: Vec<String> = scanner
        .scan(&CancellationToken::new())
        .map(|s| s.unwrap().key())
        .collect();
    assert_eq!(
        keys,
        vec![
            "VOL00001/1_s",
            "VOL00001/2_s",
            "VOL00001/3_s",
            "VOL00002/4_s",
            "VOL00002/5_s"
        ]
    );
}

#[test]
fn test_cancel_after_third_study() {
    let fixture = archive_with(8);
    let scanner = Scanner::new(Archive::open(&fixture.config().archive));
    let cancel = CancellationToken::new();

    let mut seen = Vec::new();
    for study in scanner.scan(&cancel) {
        seen.push(study.unwrap());
        if seen.len() == 3 {
            cancel.cancel();
        }
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn test_scan_is_restartable() {
    let fixture = archive_with(4);
    let scanner = Scanner::new(Archive::open(&fixture.config().archive));

    let first = scanner.scan(&CancellationToken::new()).count();
    fixture.add_study("VOL00002", "9_s", &study_xml("Smith^Rex", "1.9", &[]));
    let second = scanner.scan(&CancellationToken::new()).count();
    assert_eq!(first, 4);
    assert_eq!(second, 5);
}

#[test]
fn test_scan_reports_missing_root() {
    let fixture = TestArchive::new();
    let mut config = fixture.config().archive;
    config.root = fixture.root().join("gone");
    let scanner = Scanner::new(Archive::open(&config));

    let results: Vec<_> = scanner.scan(&CancellationToken::new()).collect();
    assert_eq!(results.len(), 1);
    assert!(results[0].as_ref().unwrap_err().is_not_found());
}
