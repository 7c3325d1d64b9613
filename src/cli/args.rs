//! Command-line argument definitions

use std::path::PathBuf;

use clap::{ArgGroup, Args};

/// Arguments for the run command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "url"])))]
pub struct RunArgs {
    /// Local video file to upload
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Remote video URL for the service to ingest
    #[arg(short, long)]
    pub url: Option<String>,

    /// Start offset (seconds or M:SS, default: 0)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End offset (seconds or M:SS, default: full duration)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Directory for the downloaded clip
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Stop after printing the trimmed URL
    #[arg(long)]
    pub no_download: bool,
}

/// Arguments for the timecode command
#[derive(Args, Debug)]
pub struct TimecodeArgs {
    /// Offsets in seconds
    #[arg(required = true, allow_negative_numbers = true)]
    pub seconds: Vec<f64>,
}
