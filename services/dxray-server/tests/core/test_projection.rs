//! Viewer projection and WADO tests

use crate::common::{
    create_test_services, object_path, scan_all, study_xml, url_for, write_dicom, TestArchive,
};
use dxray::core::archive::Archive;
use dxray::core::projection::{project_study, DicomTagReader, WadoContentType};
use dxray::core::types::WadoRequest;

fn wado(study: &str, series: &str, object: &str, content_type: Option<&str>) -> WadoRequest {
    WadoRequest {
        request_type: "WADO".to_string(),
        study_uid: study.to_string(),
        series_uid: series.to_string(),
        object_uid: object.to_string(),
        content_type: content_type.map(str::to_string),
    }
}

#[test]
fn test_wado_resolves_original_and_thumbnail() {
    let fixture = TestArchive::new();
    let dicom = object_path("VOL00001", "1_a", "I_000123.dcm");
    fixture.add_study(
        "VOL00001",
        "1_a",
        &study_xml("Smith^Rex", "1.1", &[("1.1.1.1", dicom.as_str())]),
    );
    fixture.add_file("VOL00001/1_a/I_000123.dcm", b"DICM original");
    fixture.add_file("VOL00001/1_a/S128_000123.jpg", b"JFIF thumbnail");
    let services = create_test_services(&fixture);
    scan_all(&services);

    let original = services.wado(&wado("1.1", "1.1.1", "1.1.1.1", None)).unwrap();
    assert_eq!(original.content_type, WadoContentType::Dicom);
    assert!(original.path.ends_with("VOL00001/1_a/I_000123.dcm"));
    assert_eq!(original.bytes, b"DICM original");

    let explicit = services
        .wado(&wado("1.1", "1.1.1", "1.1.1.1", Some("application/dicom")))
        .unwrap();
    assert_eq!(explicit.path, original.path);

    let thumbnail = services
        .wado(&wado("1.1", "1.1.1", "1.1.1.1", Some("image/jpeg")))
        .unwrap();
    assert_eq!(thumbnail.content_type, WadoContentType::Jpeg);
    assert!(thumbnail.path.ends_with("VOL00001/1_a/S128_000123.jpg"));
    assert_eq!(thumbnail.bytes, b"JFIF thumbnail");
}

#[test]
fn test_wado_errors() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);
    scan_all(&services);

    let unsupported = services
        .wado(&wado("", "", "", Some("image/png")))
        .unwrap_err();
    assert!(!unsupported.is_bad_request());
    assert!(!unsupported.is_not_found());

    assert!(services
        .wado(&wado("1.1", "", "1.1.1.1", None))
        .unwrap_err()
        .is_bad_request());
    assert!(services
        .wado(&wado("9.9", "9.9.1", "9.9.1.1", None))
        .unwrap_err()
        .is_not_found());
    assert!(services
        .wado(&wado("1.1", "1.1.9", "1.1.1.1", None))
        .unwrap_err()
        .is_not_found());

    // Descriptor names the object but the file is missing
    assert!(services
        .wado(&wado("1.1", "1.1.1", "1.1.1.1", None))
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_ohif_study_carries_dicom_tags() {
    let fixture = TestArchive::new();
    let good = object_path("VOL00001", "1_a", "I_000001.dcm");
    let broken = object_path("VOL00001", "1_a", "I_000002.dcm");
    fixture.add_study(
        "VOL00001",
        "1_a",
        &study_xml(
            "Smith^Rex Labrador",
            "1.1",
            &[("1.1.1.1", good.as_str()), ("1.1.1.2", broken.as_str())],
        ),
    );
    write_dicom(&fixture.root().join("VOL00001/1_a/I_000001.dcm"), "1.1.1.1");
    fixture.add_file("VOL00001/1_a/I_000002.dcm", b"truncated");
    let services = create_test_services(&fixture);
    scan_all(&services);

    let response = services.ohif_study("1.1", &url_for).unwrap();
    assert_eq!(response.studies.len(), 1);
    let study = &response.studies[0];
    assert_eq!(study.patient_name, "Smith");
    assert_eq!(study.animal_name, "Rex");
    assert_eq!(study.animal_race, "Labrador");

    let instances = &study.series_list[0].instances;
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0]["sopInstanceUID"], "1.1.1.1");
    assert_eq!(instances[0]["modality"], "DX");
    assert_eq!(instances[0]["columns"], 1024);
    assert_eq!(instances[0]["url"], url_for("1.1", "1.1.1", "1.1.1.1"));
    assert!(!instances[1].contains_key("modality"));
    assert_eq!(instances[1]["sopInstanceUid"], "1.1.1.2");
}

#[test]
fn test_list_projection_has_no_tags() {
    let fixture = TestArchive::new();
    let dicom = object_path("VOL00001", "1_a", "I_000001.dcm");
    fixture.add_study(
        "VOL00001",
        "1_a",
        &study_xml("Smith^Rex", "1.1", &[("1.1.1.1", dicom.as_str())]),
    );
    write_dicom(&fixture.root().join("VOL00001/1_a/I_000001.dcm"), "1.1.1.1");
    let archive = Archive::open(&fixture.config().archive);
    let study = archive.open_study_by_key("VOL00001/1_a").unwrap();

    let plain = project_study(&study, &url_for, None).unwrap();
    assert!(!plain.series_list[0].instances[0].contains_key("columns"));

    let tagged = project_study(&study, &url_for, Some(&DicomTagReader)).unwrap();
    assert_eq!(tagged.series_list[0].instances[0]["columns"], 1024);
}
