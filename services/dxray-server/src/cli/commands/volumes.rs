//! List-volumes command

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use std::sync::Arc;

/// Arguments for the list-volumes command
#[derive(Args, Debug)]
pub struct VolumesArgs {}

/// Execute the list-volumes command
pub async fn execute(
    _args: VolumesArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let services = Arc::clone(services);
    let volumes = tokio::task::spawn_blocking(move || services.volume_summaries()).await??;

    match format {
        OutputFormat::Human => {
            if volumes.is_empty() {
                println!("No volumes found");
                return Ok(());
            }
            output::print_header(&format!("{} volume(s):", volumes.len()));
            for volume in &volumes {
                let index = volume
                    .index
                    .map_or_else(|| "-".to_string(), |i| i.to_string());
                println!(
                    "  {}  {}  {} studies",
                    colors::key(&volume.name),
                    colors::dim(&format!("#{index}")),
                    colors::number(&volume.studies.to_string())
                );
            }
        }
        OutputFormat::Json => output::print_json(&volumes)?,
    }

    Ok(())
}
