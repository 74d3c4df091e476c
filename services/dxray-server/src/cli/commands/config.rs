//! Config command - show current configuration

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::xdg::XdgDirs;
use clap::Args;
use serde::Serialize;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    pub config_file: String,
    pub data_dir: String,
    #[serde(flatten)]
    pub config: &'a Config,
}

/// Execute the config command
pub fn execute(
    _args: ConfigArgs,
    config: &Config,
    xdg: &XdgDirs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = ConfigResponse {
        config_file: xdg.config_file().to_string_lossy().into_owned(),
        data_dir: xdg.data_dir.to_string_lossy().into_owned(),
        config,
    };

    match format {
        OutputFormat::Human => {
            output::print_header("Configuration:");
            println!("  config_file: {}", response.config_file);
            println!("  data_dir: {}", response.data_dir);
            println!("  {}", colors::label("archive:"));
            println!("    root: {}", config.archive.root.display());
            println!("    volume_prefix: {}", config.archive.volume_prefix);
            println!("    descriptor_name: {}", config.archive.descriptor_name);
            println!("    object_prefix: {}", config.archive.object_prefix);
            println!("  {}", colors::label("index:"));
            println!("    path: {}", config.index.path.display());
            println!("    scan_interval_secs: {}", config.index.scan_interval_secs);
            println!("    progress_every: {}", config.index.progress_every);
            println!("    progress_after_secs: {}", config.index.progress_after_secs);
            println!("  {}", colors::label("search:"));
            println!("    max_results: {}", config.search.max_results);
            println!("    default_list_limit: {}", config.search.default_list_limit);
            println!("  {}", colors::label("server:"));
            println!("    host: {}", config.server.host);
            println!("    port: {}", config.server.port);
            println!("    api_prefix: {}", config.server.api_prefix);
        }
        OutputFormat::Json => output::print_json(&response)?,
    }

    Ok(())
}
