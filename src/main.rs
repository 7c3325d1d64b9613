//! ClipFlow CLI
//!
//! Uploads a video to a media service, trims it server-side and downloads
//! the result.
//!
//! # Usage
//!
//! ```bash
//! clipflow run --file holiday.mp4 --start 0:05 --end 0:10
//! clipflow run --url https://example.com/raw.mov --end 90 --no-download
//! clipflow timecode 65.7 125.4
//! clipflow config
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use clipflow::cli::{commands, Cli, Commands};
use clipflow::config_initialization::initialize_configuration_hierarchy;
use clipflow::utils::logging::init_logging;

/// Main entry point for the ClipFlow CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli)?;
    init_logging(&config.logging)?;

    info!("Starting ClipFlow");

    // Execute the requested command
    match cli.command {
        Commands::Run(args) => {
            info!("Executing run command");
            commands::run(&config, args).await?;
        }
        Commands::Timecode(args) => commands::timecode(args)?,
        Commands::Config => commands::show_config(&config)?,
    }

    info!("ClipFlow completed successfully");
    Ok(())
}
