//! dxray - DX-R archive indexer and DICOM web viewer backend
//!
//! # Examples
//!
//! ```bash
//! # Index the archive once
//! dxray --archive /mnt/dxr scan
//!
//! # Search for studies
//! dxray search "race:labrador thorax"
//!
//! # Serve the viewer API
//! dxray serve --port 8080
//! ```

use clap::Parser;
use dxray::cli::output::print_error;
use dxray::cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log to stderr; `DXRAY_LOG_FORMAT=json` switches to JSON lines
fn init_tracing() {
    let json = std::env::var("DXRAY_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dxray=info,tower_http=info".into()),
        )
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
