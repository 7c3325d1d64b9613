//! CLI module for ClipFlow
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// ClipFlow media trimming client
///
/// Uploads a local file or remote URL to a media service, lets the service
/// trim it to a time range and downloads the result.
#[derive(Parser, Debug)]
#[command(name = "clipflow")]
#[command(about = "ClipFlow - upload, trim and download video clips")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: clipflow.toml or config/clipflow.toml)
    #[arg(long, global = true, env = "CLIPFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Media service base URL
    #[arg(long, global = true)]
    pub service_url: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload, trim and download a video in one pass
    Run(args::RunArgs),
    /// Format offsets in seconds as M:SS timecodes
    Timecode(args::TimecodeArgs),
    /// Print the effective configuration as TOML
    Config,
}
