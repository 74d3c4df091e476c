//! Scan command - index new studies once

use crate::cli::output::{self, colors};
use crate::cli::OutputFormat;
use crate::core::scan::CancellationToken;
use crate::core::services::Services;
use clap::Args;
use std::sync::Arc;

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Only scan this volume (e.g. VOL00012)
    #[arg(long, short = 'v')]
    pub volume: Option<String>,
}

/// Execute the scan command
pub async fn execute(
    args: ScanArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let scanner = Arc::clone(services);
    let volume = args.volume.clone();
    let stats = tokio::task::spawn_blocking(move || {
        let cancel = CancellationToken::new();
        match volume {
            Some(name) => scanner.scan_volume(&name, &cancel),
            None => scanner.full_scan(&cancel),
        }
    })
    .await??;

    match format {
        OutputFormat::Human => {
            let scope = args.volume.as_deref().unwrap_or("archive");
            output::print_success(&format!("Scanned {scope}"));
            println!(
                "  {}: {}",
                colors::label("studies"),
                colors::number(&stats.total.to_string())
            );
            println!(
                "  {}: {}",
                colors::label("new"),
                colors::number(&stats.new.to_string())
            );
            println!(
                "  {}: {}",
                colors::label("known"),
                colors::number(&stats.known.to_string())
            );
            if stats.failed > 0 {
                output::print_warning(&format!(
                    "{} studies could not be indexed, see the log",
                    stats.failed
                ));
            }
            println!(
                "  {}: {}",
                colors::label("took"),
                output::format_duration_ms(stats.duration_ms)
            );
        }
        OutputFormat::Json => output::print_json(&stats)?,
    }

    Ok(())
}
