//! FFmpeg execution adapter
//!
//! Implements the encode contract by spawning an external ffmpeg process.
//! The filter chain applies, in order: speed-scaled timestamp adjustment,
//! crop, high-quality resize, frame-rate resampling; the stream is then
//! encoded as animated WebP with no audio. Trim is a start-offset/duration
//! pair outside the filter chain.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::domain::model::EncodeParameters;
use crate::engine::loader::EngineLoader;
use crate::error::{WebpcutError, WebpcutResult};
use crate::ports::{CancelFlag, EncodePort, EncodedOutput, LogSink, ProgressSink};

/// Floor applied to the speed factor before inverting it for `setpts`.
const MIN_SPEED: f64 = 0.05;

/// Shortest duration ever passed to `-t`.
const MIN_CLIP_SECS: f64 = 0.01;

/// EncodePort adapter spawning an ffmpeg binary.
pub struct FfmpegEngine {
    binary: PathBuf,
}

impl FfmpegEngine {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Resolve the binary through the loader fallback chain.
    pub async fn load(config_path: Option<PathBuf>, log: &dyn LogSink) -> WebpcutResult<Self> {
        let binary = EngineLoader::new(config_path).resolve(log).await?;
        Ok(Self::new(binary))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

/// `setpts` multiplier: presentation time scales by the inverse speed, with
/// the speed floored at 0.05.
fn speed_expr(speed: f64) -> String {
    let safe_speed = if speed.is_finite() && speed > 0.0 {
        speed.max(MIN_SPEED)
    } else {
        1.0
    };
    format!("{:.6}", 1.0 / safe_speed)
}

/// Build the ffmpeg argument list for one encode job.
///
/// Start offset is omitted when zero and duration when the clip spans the
/// full source, matching the external contract.
pub fn build_args(
    input: &Path,
    output: &Path,
    params: &EncodeParameters,
    source_duration: f64,
) -> Vec<String> {
    let safe_start = params.trim.start.clamp(0.0, source_duration);
    let safe_end = params.trim.end.clamp(safe_start, source_duration);
    let clip_duration = (safe_end - safe_start).max(MIN_CLIP_SECS);

    let filter = format!(
        "setpts={}*PTS,crop={}:{}:{}:{},scale={}:{}:flags=lanczos,fps={}",
        speed_expr(params.speed),
        params.crop.w,
        params.crop.h,
        params.crop.x,
        params.crop.y,
        params.resize_w,
        params.resize_h,
        params.fps,
    );

    let mut args = Vec::new();
    if safe_start > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{safe_start:.2}"));
    }

    args.push("-i".to_string());
    args.push(input.to_string_lossy().into_owned());

    if clip_duration < source_duration {
        args.push("-t".to_string());
        args.push(format!("{clip_duration:.2}"));
    }

    let quality = params.quality.to_string();
    args.extend(
        [
            "-vf",
            filter.as_str(),
            "-an",
            "-c:v",
            "libwebp",
            "-q:v",
            quality.as_str(),
            "-compression_level",
            "6",
            "-loop",
            "0",
            "-preset",
            "picture",
            "-vsync",
            "0",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    args.push(output.to_string_lossy().into_owned());

    args
}

/// Parse one line of `-progress pipe:1` output into output seconds.
/// `out_time_ms` is, despite the name, reported in microseconds.
fn parse_out_time(line: &str) -> Option<f64> {
    let value = line.strip_prefix("out_time_ms=")?;
    let micros: i64 = value.trim().parse().ok()?;
    Some((micros.max(0) as f64) / 1_000_000.0)
}

#[async_trait]
impl EncodePort for FfmpegEngine {
    async fn encode(
        &self,
        input: &Path,
        output: &Path,
        params: &EncodeParameters,
        source_duration: f64,
        cancel: &CancelFlag,
        progress: Option<&dyn ProgressSink>,
    ) -> WebpcutResult<EncodedOutput> {
        cancel.check()?;

        let mut cmd = Command::new(&self.binary);
        cmd.args(["-hide_banner", "-nostdin", "-y", "-loglevel", "error"])
            .args(["-progress", "pipe:1"])
            .args(build_args(input, output, params, source_duration))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(binary = %self.binary.display(), "spawning encode job");

        let mut child = cmd
            .spawn()
            .map_err(|e| WebpcutError::engine(format!("failed to spawn encode engine: {e}")))?;

        // Output timestamps are scaled by 1/speed, so the expected output
        // duration shrinks as speed grows.
        let expected_out_secs =
            (params.trim_duration().max(MIN_CLIP_SECS)) / params.speed.max(MIN_SPEED);

        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            if let Some(mut pipe) = stderr {
                let _ = pipe.read_to_string(&mut buf).await;
            }
            buf
        });

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| WebpcutError::engine("engine stdout unavailable"))?;
        let mut lines = BufReader::new(stdout).lines();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = child.start_kill();
                    let _ = child.wait().await;
                    stderr_task.abort();
                    return Err(WebpcutError::Cancelled);
                }
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if let (Some(out_secs), Some(sink)) = (parse_out_time(&line), progress) {
                            sink.set((out_secs / expected_out_secs).clamp(0.0, 1.0));
                        }
                    }
                    Ok(None) | Err(_) => break,
                }
            }
        }

        let status = tokio::select! {
            _ = cancel.cancelled() => {
                let _ = child.start_kill();
                let _ = child.wait().await;
                stderr_task.abort();
                return Err(WebpcutError::Cancelled);
            }
            status = child.wait() => status
                .map_err(|e| WebpcutError::engine(format!("encode engine failed to run: {e}")))?,
        };

        let diagnostics = stderr_task.await.unwrap_or_default();

        if !status.success() {
            let trimmed = diagnostics.trim();
            let tail: String = trimmed
                .lines()
                .rev()
                .take(12)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join("\n");
            return Err(WebpcutError::engine(format!(
                "encode job exited with {status}: {tail}"
            )));
        }

        let size_bytes = tokio::fs::metadata(output)
            .await
            .map_err(|e| WebpcutError::engine(format!("encode output missing: {e}")))?
            .len();

        if let Some(sink) = progress {
            sink.set(1.0);
        }

        Ok(EncodedOutput {
            path: output.to_path_buf(),
            size_bytes,
        })
    }
}
