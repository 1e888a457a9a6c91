//! Recommendation search behavior against a scripted engine

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use webpcut::domain::model::{CropRect, EncodeParameters, TrimInterval, VideoMetadata};
use webpcut::engine::{Recommender, RECOMMEND_SAMPLE_SECS};
use webpcut::ports::{CancelFlag, EncodePort, EncodedOutput, LogSink, ProgressSink};
use webpcut::{WebpcutError, WebpcutResult};

/// Engine double whose sample sizes follow a fixed function of (fps, quality).
struct ScriptedEngine {
    size_fn: fn(u32, u32) -> u64,
    calls: Mutex<Vec<(u32, u32)>>,
}

impl ScriptedEngine {
    fn new(size_fn: fn(u32, u32) -> u64) -> Self {
        Self {
            size_fn,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(u32, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EncodePort for ScriptedEngine {
    async fn encode(
        &self,
        _input: &Path,
        output: &Path,
        params: &EncodeParameters,
        _source_duration: f64,
        cancel: &CancelFlag,
        _progress: Option<&dyn ProgressSink>,
    ) -> WebpcutResult<EncodedOutput> {
        cancel.check()?;
        // Every probe must arrive with the sample window applied.
        assert!(
            params.trim_duration() <= RECOMMEND_SAMPLE_SECS + 1e-9,
            "probe trim window exceeds the sample cap: {:?}",
            params.trim
        );
        self.calls.lock().unwrap().push((params.fps, params.quality));
        Ok(EncodedOutput {
            path: output.to_path_buf(),
            size_bytes: (self.size_fn)(params.fps, params.quality),
        })
    }
}

struct NullLog;

impl LogSink for NullLog {
    fn line(&self, _line: &str) {}
}

struct LastProgress(Mutex<f64>);

impl LastProgress {
    fn new() -> Self {
        Self(Mutex::new(0.0))
    }

    fn get(&self) -> f64 {
        *self.0.lock().unwrap()
    }
}

impl ProgressSink for LastProgress {
    fn set(&self, fraction: f64) {
        *self.0.lock().unwrap() = fraction;
    }
}

fn baseline() -> EncodeParameters {
    EncodeParameters {
        trim: TrimInterval::new(0.0, 10.0),
        crop: CropRect::new(0, 0, 1920, 1080),
        resize_w: 1920,
        resize_h: 1080,
        fps: 30,
        quality: 80,
        speed: 1.0,
    }
}

fn metadata() -> VideoMetadata {
    VideoMetadata::new(1920, 1080, 10.0).unwrap()
}

async fn run(
    engine: &ScriptedEngine,
    target_bytes: u64,
    cancel: &CancelFlag,
    progress: &LastProgress,
) -> WebpcutResult<webpcut::engine::Recommendation> {
    let input = PathBuf::from("in.mp4");
    let scratch = TempDir::new().unwrap();
    let log = NullLog;
    let recommender = Recommender::new(
        engine,
        &input,
        metadata().duration,
        scratch.path(),
        cancel,
        progress,
        &log,
    );
    recommender.recommend(&baseline(), target_bytes).await
}

/// Sample size grows with both knobs: fps * 2000 + quality * 500 bytes.
fn linear_size(fps: u32, quality: u32) -> u64 {
    u64::from(fps) * 2000 + u64::from(quality) * 500
}

#[tokio::test]
async fn baseline_meeting_target_short_circuits() {
    let engine = ScriptedEngine::new(linear_size);
    let cancel = CancelFlag::new();
    let progress = LastProgress::new();

    // Baseline sample is 100000 bytes -> ~666667 extrapolated, well under.
    let rec = run(&engine, 10_000_000, &cancel, &progress).await.unwrap();

    assert!(rec.met_target);
    assert_eq!(rec.probes_used, 1);
    assert_eq!(rec.params, baseline());
    assert_eq!(rec.estimated_bytes, 666_667);
    assert_eq!(engine.calls(), vec![(30, 80)]);
    assert!((progress.get() - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn search_finds_highest_quality_at_the_first_feasible_rate() {
    let engine = ScriptedEngine::new(linear_size);
    let cancel = CancelFlag::new();
    let progress = LastProgress::new();

    // Target 500000 bytes over 10s -> 75000 at the 1.5s sample scale.
    // At 30 fps, 60000 + 500*q <= 75000 holds up to quality 30.
    let rec = run(&engine, 500_000, &cancel, &progress).await.unwrap();

    assert!(rec.met_target);
    assert_eq!(rec.params.fps, 30);
    assert_eq!(rec.params.quality, 30);
    assert_eq!(rec.estimated_bytes, 500_000);
    // One baseline probe, one minimum-quality probe, seven bisections.
    assert_eq!(rec.probes_used, 9);

    let calls = engine.calls();
    assert_eq!(calls[0], (30, 80));
    assert_eq!(calls[1], (30, 1));
    assert!(calls[2..].iter().all(|&(fps, _)| fps == 30));
}

#[tokio::test]
async fn unreachable_target_returns_minimum_settings() {
    let engine = ScriptedEngine::new(|_, _| 1_000_000);
    let cancel = CancelFlag::new();
    let progress = LastProgress::new();

    let rec = run(&engine, 1_000, &cancel, &progress).await.unwrap();

    assert!(!rec.met_target);
    assert_eq!(rec.params.fps, 1);
    assert_eq!(rec.params.quality, 1);
    assert_eq!(rec.estimated_bytes, 6_666_667);
    // Baseline, one probe per rejected candidate, one fallback probe.
    assert_eq!(rec.probes_used, 10);

    let calls = engine.calls();
    // Every post-baseline probe ran at minimum quality.
    assert!(calls[1..].iter().all(|&(_, quality)| quality == 1));
    // Candidates are tried in descending order.
    let swept: Vec<u32> = calls[1..calls.len() - 1].iter().map(|&(f, _)| f).collect();
    assert_eq!(swept, vec![30, 27, 23, 18, 14, 10, 8, 1]);
}

#[tokio::test]
async fn zero_target_is_rejected_without_probing() {
    let engine = ScriptedEngine::new(linear_size);
    let cancel = CancelFlag::new();
    let progress = LastProgress::new();

    let err = run(&engine, 0, &cancel, &progress).await.unwrap_err();
    assert!(matches!(err, WebpcutError::Validation { .. }));
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn pre_cancelled_search_never_probes() {
    let engine = ScriptedEngine::new(linear_size);
    let cancel = CancelFlag::new();
    cancel.cancel();
    let progress = LastProgress::new();

    let err = run(&engine, 500_000, &cancel, &progress).await.unwrap_err();
    assert!(matches!(err, WebpcutError::Cancelled));
    assert!(engine.calls().is_empty());
}
