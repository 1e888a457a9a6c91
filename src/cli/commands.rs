//! Command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::{
    Config, FfmpegEngine, FfprobeProbe, MemoryLogSink, TracingLogSink, TracingProgressSink,
};
use crate::app::{AppContext, ConvertInteractor, EstimateInteractor, RecommendInteractor};
use crate::cli::args::{ConvertArgs, EncodeArgs, EstimateArgs, ProbeArgs, RecommendArgs};
use crate::domain::geometry::RawCrop;
use crate::domain::model::{TrimField, VideoMetadata};
use crate::ports::{CancelFlag, ProbePort};
use crate::utils::format::{format_bytes, format_delta, format_duration};

/// Execute the convert command
pub async fn convert(args: ConvertArgs, config: Config) -> Result<()> {
    let metadata = probe_source(&args.encode.input, &config).await?;
    let ctx = build_context(&args.encode, &config, metadata);
    let output = resolve_output(args.output, &args.encode.input, "webp");

    let engine = load_engine(&config).await?;
    let cancel = cancel_on_ctrl_c();
    let log = TracingLogSink::new();
    let progress = TracingProgressSink::new();

    let report = ConvertInteractor::new(engine)
        .convert(
            &args.encode.input,
            &output,
            &ctx.params(),
            ctx.metadata(),
            &cancel,
            &progress,
            &log,
        )
        .await?;

    println!(
        "wrote {} ({}, {} vs source)",
        report.output.path.display(),
        format_bytes(report.output.size_bytes),
        format_delta(report.delta_percent)
    );
    Ok(())
}

/// Execute the preview command
pub async fn preview(args: ConvertArgs, config: Config) -> Result<()> {
    let metadata = probe_source(&args.encode.input, &config).await?;
    let ctx = build_context(&args.encode, &config, metadata);
    let output = resolve_output(args.output, &args.encode.input, "preview.webp");

    let engine = load_engine(&config).await?;
    let cancel = cancel_on_ctrl_c();
    let log = TracingLogSink::new();
    let progress = TracingProgressSink::new();

    let report = ConvertInteractor::new(engine)
        .preview(
            &args.encode.input,
            &output,
            &ctx.params(),
            ctx.metadata(),
            &cancel,
            &progress,
            &log,
        )
        .await?;

    println!(
        "wrote preview {} ({})",
        report.output.path.display(),
        format_bytes(report.output.size_bytes)
    );
    Ok(())
}

/// Execute the estimate command
pub async fn estimate(args: EstimateArgs, config: Config) -> Result<()> {
    let metadata = probe_source(&args.encode.input, &config).await?;
    let ctx = build_context(&args.encode, &config, metadata);

    let engine = load_engine(&config).await?;
    let cancel = cancel_on_ctrl_c();
    let log = TracingLogSink::new();

    let report = EstimateInteractor::new(engine)
        .estimate(
            &args.encode.input,
            &ctx.params(),
            ctx.metadata(),
            &cancel,
            &log,
        )
        .await?;

    println!(
        "estimated output size: {} (from a {:.2}s sample of {})",
        format_bytes(report.estimated_bytes),
        report.sample_duration,
        format_bytes(report.sample_bytes)
    );
    Ok(())
}

/// Execute the recommend command
pub async fn recommend(args: RecommendArgs, config: Config) -> Result<()> {
    if !args.target_size.is_finite() || args.target_size <= 0.0 {
        anyhow::bail!("target size must be a positive number of megabytes");
    }
    let target_bytes = (args.target_size * 1024.0 * 1024.0).round() as u64;

    let metadata = probe_source(&args.encode.input, &config).await?;
    let ctx = build_context(&args.encode, &config, metadata);

    let engine = load_engine(&config).await?;
    let cancel = cancel_on_ctrl_c();
    // The search log is buffered and replayed after the result line.
    let log = MemoryLogSink::new();
    let progress = TracingProgressSink::new();

    let recommendation = RecommendInteractor::new(engine)
        .recommend(
            &args.encode.input,
            &ctx.params(),
            ctx.metadata(),
            target_bytes,
            &cancel,
            &progress,
            &log,
        )
        .await?;

    if recommendation.met_target {
        println!(
            "recommended: fps {} quality {} (estimated {}, {} probes)",
            recommendation.params.fps,
            recommendation.params.quality,
            format_bytes(recommendation.estimated_bytes),
            recommendation.probes_used
        );
    } else {
        println!(
            "target {} is unreachable; smallest configuration is fps {} quality {} (estimated {})",
            format_bytes(target_bytes),
            recommendation.params.fps,
            recommendation.params.quality,
            format_bytes(recommendation.estimated_bytes)
        );
    }
    for line in log.snapshot() {
        println!("  {line}");
    }
    Ok(())
}

/// Execute the probe command
pub async fn probe(args: ProbeArgs, config: Config) -> Result<()> {
    let metadata = probe_source(&args.input, &config).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    } else {
        println!(
            "{}x{}, {}",
            metadata.width,
            metadata.height,
            format_duration(metadata.duration)
        );
    }
    Ok(())
}

async fn probe_source(input: &Path, config: &Config) -> Result<VideoMetadata> {
    if !input.exists() {
        anyhow::bail!("input file does not exist: {}", input.display());
    }
    let probe = FfprobeProbe::load(config.ffprobe_path.clone());
    let metadata = probe
        .probe(input)
        .await
        .context("failed to probe input file")?;
    info!(
        width = metadata.width,
        height = metadata.height,
        duration = metadata.duration,
        "probed source"
    );
    Ok(metadata)
}

async fn load_engine(config: &Config) -> Result<Arc<FfmpegEngine>> {
    let log = TracingLogSink::new();
    let engine = FfmpegEngine::load(config.ffmpeg_path.clone(), &log)
        .await
        .context("failed to load the encode engine")?;
    Ok(Arc::new(engine))
}

/// Build the editing session from the probed metadata and the command line,
/// with config defaults filling unset parameters.
fn build_context(encode: &EncodeArgs, config: &Config, metadata: VideoMetadata) -> AppContext {
    let mut ctx = AppContext::new(
        metadata,
        encode.fps.unwrap_or(config.defaults.fps),
        encode.quality.unwrap_or(config.defaults.quality),
        encode.speed.unwrap_or(config.defaults.speed),
    );

    if let Some(start) = encode.trim_start {
        ctx.apply_trim_edit(TrimField::Start, start);
    }
    if let Some(end) = encode.trim_end {
        ctx.apply_trim_edit(TrimField::End, end);
    }

    if let Some(crop) = encode.crop {
        ctx.apply_crop_input(RawCrop::new(crop.x, crop.y, crop.w, crop.h));
        ctx.snap_resize_to_crop();
    }

    // Explicit dimensions win; a single one keeps the crop aspect ratio.
    let crop = ctx.crop();
    match (encode.width, encode.height) {
        (Some(w), Some(h)) => ctx.set_resize(w, h),
        (Some(w), None) => {
            let h = scale_to_aspect(w, crop.h, crop.w);
            ctx.set_resize(w, h);
        }
        (None, Some(h)) => {
            let w = scale_to_aspect(h, crop.w, crop.h);
            ctx.set_resize(w, h);
        }
        (None, None) => {}
    }

    ctx
}

fn scale_to_aspect(given: u32, other_dim: u32, given_dim: u32) -> u32 {
    let scaled = f64::from(given) * f64::from(other_dim) / f64::from(given_dim.max(1));
    (scaled.round() as u32).max(1)
}

fn resolve_output(explicit: Option<PathBuf>, input: &Path, extension: &str) -> PathBuf {
    explicit.unwrap_or_else(|| input.with_extension(extension))
}

fn cancel_on_ctrl_c() -> CancelFlag {
    let cancel = CancelFlag::new();
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received; cancelling");
            flag.cancel();
        }
    });
    cancel
}
