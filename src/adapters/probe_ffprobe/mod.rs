//! Source metadata probing via an external ffprobe process
//!
//! The probe asks for JSON stream and container data, then reads width,
//! height and duration from the first video stream, falling back to the
//! container duration when the stream carries none.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::model::VideoMetadata;
use crate::error::{WebpcutError, WebpcutResult};
use crate::ports::ProbePort;

/// Environment variable overriding the probe binary location.
pub const PROBE_ENV_OVERRIDE: &str = "WEBPCUT_FFPROBE";

/// ProbePort adapter spawning an ffprobe binary.
pub struct FfprobeProbe {
    binary: PathBuf,
}

impl FfprobeProbe {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Config path if given, else the environment override, else `PATH`.
    pub fn load(config_path: Option<PathBuf>) -> Self {
        let binary = config_path
            .or_else(|| std::env::var_os(PROBE_ENV_OVERRIDE).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("ffprobe"));
        Self::new(binary)
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Turn the raw JSON report into validated metadata.
fn parse_probe_output(json: &str) -> WebpcutResult<VideoMetadata> {
    let output: ProbeOutput = serde_json::from_str(json)
        .map_err(|e| WebpcutError::engine(format!("unreadable probe report: {e}")))?;

    let stream = output
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| WebpcutError::validation("source has no video stream"))?;

    let width = stream
        .width
        .ok_or_else(|| WebpcutError::validation("video stream reports no width"))?;
    let height = stream
        .height
        .ok_or_else(|| WebpcutError::validation("video stream reports no height"))?;

    let duration = stream
        .duration
        .as_deref()
        .or(output.format.as_ref().and_then(|f| f.duration.as_deref()))
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| WebpcutError::validation("source reports no duration"))?;

    VideoMetadata::new(width, height, duration)
}

#[async_trait]
impl ProbePort for FfprobeProbe {
    async fn probe(&self, input: &Path) -> WebpcutResult<VideoMetadata> {
        debug!(binary = %self.binary.display(), input = %input.display(), "probing source");

        let output = Command::new(&self.binary)
            .args(["-v", "error", "-print_format", "json"])
            .args(["-show_streams", "-show_format"])
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| WebpcutError::engine(format!("failed to spawn probe: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WebpcutError::engine(format!(
                "probe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }
}
