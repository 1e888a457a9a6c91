//! Command-line argument definitions

use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;

/// Crop rectangle as given on the command line: `W:H:X:Y`, fractional values
/// allowed. Normalization happens later against the probed frame size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropSpec {
    pub w: f64,
    pub h: f64,
    pub x: f64,
    pub y: f64,
}

impl FromStr for CropSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 4 {
            return Err(format!("expected W:H:X:Y, got '{s}'"));
        }
        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse()
                .map_err(|_| format!("'{part}' is not a number"))?;
        }
        Ok(Self {
            w: values[0],
            h: values[1],
            x: values[2],
            y: values[3],
        })
    }
}

/// Shared encode parameters
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Trim start in seconds (default: source start)
    #[arg(long)]
    pub trim_start: Option<f64>,

    /// Trim end in seconds (default: source end)
    #[arg(long)]
    pub trim_end: Option<f64>,

    /// Crop rectangle as W:H:X:Y in frame pixels (default: full frame)
    #[arg(long)]
    pub crop: Option<CropSpec>,

    /// Output width in pixels (default: crop width)
    #[arg(long)]
    pub width: Option<u32>,

    /// Output height in pixels (default: crop height)
    #[arg(long)]
    pub height: Option<u32>,

    /// Output frame rate
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=60))]
    pub fps: Option<u32>,

    /// Encoder quality (higher is better and larger)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub quality: Option<u32>,

    /// Playback speed factor (0.25 to 4.0)
    #[arg(long)]
    pub speed: Option<f64>,
}

/// Arguments for the convert and preview commands
#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub encode: EncodeArgs,

    /// Output file path (default: input name with a .webp extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the estimate command
#[derive(Args, Debug)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub encode: EncodeArgs,
}

/// Arguments for the recommend command
#[derive(Args, Debug)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub encode: EncodeArgs,

    /// Target output size in megabytes
    #[arg(short, long)]
    pub target_size: f64,
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
