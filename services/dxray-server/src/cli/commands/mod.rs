//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod completions;
pub mod config;
pub mod scan;
pub mod search;
pub mod serve;
pub mod show;
pub mod volumes;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use scan::ScanArgs;
pub use search::SearchArgs;
pub use serve::ServeArgs;
pub use show::ShowArgs;
pub use volumes::VolumesArgs;
