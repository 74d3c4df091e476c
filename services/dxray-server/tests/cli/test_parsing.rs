// Argument parsing and configuration resolution

use clap::Parser;
use dxray::cli::{load_config, Cli, Commands, OutputFormat};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_parse_search() {
    let cli = Cli::try_parse_from(["dxray", "search", "race:beagle", "--keys-only"]).unwrap();
    assert_eq!(cli.format, OutputFormat::Human);
    match cli.command {
        Commands::Search(args) => {
            assert_eq!(args.query, "race:beagle");
            assert!(args.keys_only);
            assert!(!args.literal);
        }
        other => panic!("Expected search command, got {other:?}"),
    }
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "dxray",
        "scan",
        "--volume",
        "VOL00012",
        "--format",
        "json",
        "--archive",
        "/mnt/dxr",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Json);
    assert_eq!(cli.archive, Some(PathBuf::from("/mnt/dxr")));
    match cli.command {
        Commands::Scan(args) => assert_eq!(args.volume.as_deref(), Some("VOL00012")),
        other => panic!("Expected scan command, got {other:?}"),
    }
}

#[test]
fn test_parse_serve_and_kebab_case_commands() {
    let cli = Cli::try_parse_from(["dxray", "serve", "--port", "9000"]).unwrap();
    match cli.command {
        Commands::Serve(args) => {
            assert_eq!(args.port, Some(9000));
            assert!(args.host.is_none());
        }
        other => panic!("Expected serve command, got {other:?}"),
    }

    let cli = Cli::try_parse_from(["dxray", "list-volumes"]).unwrap();
    assert!(matches!(cli.command, Commands::ListVolumes(_)));

    let cli = Cli::try_parse_from(["dxray", "show-config"]).unwrap();
    assert!(matches!(cli.command, Commands::ShowConfig(_)));
}

#[test]
fn test_parse_rejects_bad_input() {
    assert!(Cli::try_parse_from(["dxray"]).is_err());
    assert!(Cli::try_parse_from(["dxray", "search"]).is_err());
    assert!(Cli::try_parse_from(["dxray", "serve", "--port", "http"]).is_err());
    assert!(Cli::try_parse_from(["dxray", "--format", "yaml", "scan"]).is_err());
}

fn isolate_config(temp: &TempDir) {
    env::remove_var("DXRAY_CONFIG");
    env::remove_var("DXRAY_ARCHIVE_ROOT");
    env::remove_var("DXRAY_INDEX_PATH");
    env::set_var("DXRAY_CONFIG_DIR", temp.path().join("config"));
    env::set_var("DXRAY_DATA_DIR", temp.path().join("data"));
}

fn restore_env() {
    env::remove_var("DXRAY_CONFIG_DIR");
    env::remove_var("DXRAY_DATA_DIR");
    env::remove_var("DXRAY_ARCHIVE_ROOT");
}

#[test]
#[serial]
fn test_load_config_archive_override() {
    let temp = TempDir::new().unwrap();
    isolate_config(&temp);

    let config = load_config(Some(PathBuf::from("/mnt/dxr"))).unwrap();
    assert_eq!(config.archive.root, PathBuf::from("/mnt/dxr"));
    assert_eq!(config.index.path, temp.path().join("data").join("index"));

    restore_env();
}

#[test]
#[serial]
fn test_load_config_override_beats_environment() {
    let temp = TempDir::new().unwrap();
    isolate_config(&temp);
    env::set_var("DXRAY_ARCHIVE_ROOT", "/from/env");

    let config = load_config(Some(PathBuf::from("/from/flag"))).unwrap();
    assert_eq!(config.archive.root, PathBuf::from("/from/flag"));

    let config = load_config(None).unwrap();
    assert_eq!(config.archive.root, PathBuf::from("/from/env"));

    restore_env();
}

#[test]
#[serial]
fn test_load_config_requires_archive() {
    let temp = TempDir::new().unwrap();
    isolate_config(&temp);

    let err = load_config(None).unwrap_err();
    assert!(err.to_string().contains("Archive root"));

    restore_env();
}
