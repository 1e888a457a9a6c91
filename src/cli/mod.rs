//! CLI module for webpcut
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{ConvertArgs, EncodeArgs, EstimateArgs, ProbeArgs, RecommendArgs};

/// webpcut - video to animated WebP converter
///
/// Trims, crops, resizes and re-times a video clip and encodes it as an
/// animated WebP, with sample-based size estimation and target-size
/// parameter recommendation.
#[derive(Parser)]
#[command(name = "webpcut")]
#[command(about = "Convert video clips to animated WebP")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging filter (e.g. "info", "webpcut=debug")
    #[arg(long, default_value = "info", global = true, env = "WEBPCUT_LOG")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Convert a clip to animated WebP
    Convert(ConvertArgs),
    /// Encode only the first seconds of the clip for a quick look
    Preview(ConvertArgs),
    /// Estimate the output size from a short sample encode
    Estimate(EstimateArgs),
    /// Recommend fps and quality for a target output size
    Recommend(RecommendArgs),
    /// Probe source metadata
    Probe(ProbeArgs),
}
