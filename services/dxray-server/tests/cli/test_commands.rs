// Command execution against a test archive

use crate::common::{create_test_services, scan_all, TestArchive};
use dxray::cli::commands::{
    config, scan, search, show, volumes, ConfigArgs, ScanArgs, SearchArgs, ShowArgs, VolumesArgs,
};
use dxray::cli::OutputFormat;
use dxray::core::xdg::XdgDirs;

fn search_args(query: &str) -> SearchArgs {
    SearchArgs {
        query: query.to_string(),
        literal: false,
        keys_only: false,
    }
}

#[tokio::test]
async fn test_scan_command_indexes_archive() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);

    for format in [OutputFormat::Human, OutputFormat::Json] {
        scan::execute(ScanArgs { volume: None }, &services, format)
            .await
            .unwrap();
    }
    assert_eq!(services.index().count(), 4);
}

#[tokio::test]
async fn test_scan_command_single_volume() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);

    scan::execute(
        ScanArgs {
            volume: Some("VOL00002".to_string()),
        },
        &services,
        OutputFormat::Json,
    )
    .await
    .unwrap();
    assert_eq!(services.index().count(), 1);

    let missing = scan::execute(
        ScanArgs {
            volume: Some("VOL00099".to_string()),
        },
        &services,
        OutputFormat::Human,
    )
    .await;
    assert!(missing.is_err());
}

#[tokio::test]
async fn test_search_command() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);
    scan_all(&services);

    search::execute(search_args("race:beagle"), &services, OutputFormat::Json)
        .await
        .unwrap();
    search::execute(search_args("nothing-matches"), &services, OutputFormat::Human)
        .await
        .unwrap();

    let literal = SearchArgs {
        literal: true,
        keys_only: true,
        ..search_args("owner:(smith")
    };
    search::execute(literal, &services, OutputFormat::Human)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_search_command_rejects_unknown_field() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);

    let result = search::execute(search_args("breed:beagle"), &services, OutputFormat::Human).await;
    assert!(result.unwrap_err().to_string().contains("breed"));
}

#[tokio::test]
async fn test_show_command() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);

    for document in [false, true] {
        for format in [OutputFormat::Human, OutputFormat::Json] {
            let args = ShowArgs {
                key: "VOL00001/2_b".to_string(),
                document,
            };
            show::execute(args, &services, format).await.unwrap();
        }
    }

    let missing = ShowArgs {
        key: "VOL00001/9_z".to_string(),
        document: false,
    };
    assert!(show::execute(missing, &services, OutputFormat::Human)
        .await
        .is_err());
}

#[tokio::test]
async fn test_list_volumes_command() {
    let fixture = TestArchive::standard();
    let services = create_test_services(&fixture);

    volumes::execute(VolumesArgs {}, &services, OutputFormat::Human)
        .await
        .unwrap();
    volumes::execute(VolumesArgs {}, &services, OutputFormat::Json)
        .await
        .unwrap();

    let empty = TestArchive::new();
    let services = create_test_services(&empty);
    volumes::execute(VolumesArgs {}, &services, OutputFormat::Human)
        .await
        .unwrap();
}

#[test]
fn test_config_command() {
    let fixture = TestArchive::new();
    let config = fixture.config();
    let xdg = XdgDirs::new();

    config::execute(ConfigArgs {}, &config, &xdg, OutputFormat::Human).unwrap();
    config::execute(ConfigArgs {}, &config, &xdg, OutputFormat::Json).unwrap();
}
