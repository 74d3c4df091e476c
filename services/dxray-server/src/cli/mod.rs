//! CLI adapter for dxray
//!
//! Command-line access to the archive, the search index and the HTTP
//! server. This module is parallel to `http/`: both depend on `core/`
//! and `serve` mounts the HTTP router.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!          +------------+------------+
//!          |                         |
//!          v                         v
//! +------------------+      +------------------+
//! |      http/       | <--- |      cli/        |
//! | (axum adapter)   |      | (clap adapter)   |
//! +------------------+      +------------------+
//! ```

pub mod commands;
pub mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::core::config::Config;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;

/// dxray - DX-R archive indexer and DICOM web viewer backend
///
/// Indexes the studies of a DX-R radiography archive, searches them
/// and serves them to DICOM web viewers over HTTP.
#[derive(Parser, Debug)]
#[command(name = "dxray")]
#[command(author = "Tierklinik Dobersberg")]
#[command(version)]
#[command(about = "DX-R archive indexer and viewer backend", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Archive root, overrides the configuration
    #[arg(long, global = true, value_name = "DIR")]
    pub archive: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the archive, then serve the HTTP API with periodic rescans
    Serve(commands::ServeArgs),

    /// Scan the archive once and index new studies
    Scan(commands::ScanArgs),

    /// Search indexed studies
    Search(commands::SearchArgs),

    /// Show one study by its `<volume>/<study>` key
    Show(commands::ShowArgs),

    /// List archive volumes with their study counts
    #[command(name = "list-volumes")]
    ListVolumes(commands::VolumesArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  dxray completions bash > ~/.local/share/bash-completion/completions/dxray
    ///   zsh:   dxray completions zsh > ~/.zfunc/_dxray
    ///   fish:  dxray completions fish > ~/.config/fish/completions/dxray.fish
    Completions(commands::CompletionsArgs),
}

/// Resolve configuration, applying the `--archive` override
pub fn load_config(archive: Option<PathBuf>) -> crate::core::Result<Config> {
    let xdg = XdgDirs::new();
    let mut config = Config::resolve(&xdg)?;
    if let Some(root) = archive {
        config.archive.root = root;
    }
    config.validate()?;
    Ok(config)
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let command = match cli.command {
        // Handle completions early (doesn't need services)
        Commands::Completions(args) => return commands::completions::execute(args),
        command => command,
    };

    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist()?;

    let config = load_config(cli.archive)?;

    if let Commands::ShowConfig(args) = command {
        return commands::config::execute(args, &config, &xdg, cli.format);
    }

    let services = Arc::new(Services::new(config)?);

    match command {
        Commands::Serve(args) => commands::serve::execute(args, &services).await,
        Commands::Scan(args) => commands::scan::execute(args, &services, cli.format).await,
        Commands::Search(args) => commands::search::execute(args, &services, cli.format).await,
        Commands::Show(args) => commands::show::execute(args, &services, cli.format).await,
        Commands::ListVolumes(args) => {
            commands::volumes::execute(args, &services, cli.format).await
        }
        Commands::ShowConfig(_) | Commands::Completions(_) => Ok(()), // Handled above
    }
}
