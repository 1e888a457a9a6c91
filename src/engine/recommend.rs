//! Target-size parameter recommendation
//!
//! Two-phase search over (fps, quality) driven by short sample encodes:
//! a descending frame-rate sweep at minimum quality prunes infeasible rates,
//! then a bounded binary search on quality finds the highest quality that
//! still meets the byte budget at the first feasible rate. Probes are issued
//! strictly sequentially; the engine owns one job at a time.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::domain::model::{EncodeParameters, FPS_MAX, FPS_MIN, QUALITY_MAX, QUALITY_MIN};
use crate::engine::estimate::extrapolate_size;
use crate::error::{WebpcutError, WebpcutResult};
use crate::ports::{CancelFlag, EncodePort, LogSink, ProgressSink};
use crate::utils::format::format_bytes;

/// Probe encodes cover at most this many seconds of the clip.
pub const RECOMMEND_SAMPLE_SECS: f64 = 1.5;

/// Upper bound on binary-search iterations per frame-rate candidate.
const QUALITY_SEARCH_ITERATIONS: u32 = 7;

/// Reduction factors swept over the baseline frame rate.
const FPS_FACTORS: [f64; 7] = [1.0, 0.9, 0.75, 0.6, 0.45, 0.33, 0.25];

/// Outcome of a recommendation search.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// Baseline parameters with the recommended fps and quality applied.
    pub params: EncodeParameters,
    /// Extrapolated full-duration output size for those parameters.
    pub estimated_bytes: u64,
    /// False when no candidate met the budget and the minimum-size
    /// configuration was returned instead.
    pub met_target: bool,
    /// Sample encodes actually issued.
    pub probes_used: u32,
}

/// Descending, de-duplicated frame-rate candidates derived from the baseline
/// rate, each clamped to the encoder domain, always ending at 1 fps.
pub fn fps_candidates(current_fps: u32) -> Vec<u32> {
    let mut values: Vec<u32> = FPS_FACTORS
        .iter()
        .map(|factor| {
            let scaled = (f64::from(current_fps) * factor).round();
            scaled.clamp(f64::from(FPS_MIN), f64::from(FPS_MAX)) as u32
        })
        .chain(std::iter::once(FPS_MIN))
        .collect();
    values.sort_unstable_by(|a, b| b.cmp(a));
    values.dedup();
    values
}

/// Drives the sample-encode search. Owns the per-probe artifact counter so
/// overlapping or successive probes can never collide on an output name.
pub struct Recommender<'a> {
    engine: &'a dyn EncodePort,
    input: &'a Path,
    source_duration: f64,
    /// Scratch directory for ephemeral probe outputs.
    workdir: &'a Path,
    probe_seq: AtomicU64,
    cancel: &'a CancelFlag,
    progress: &'a dyn ProgressSink,
    log: &'a dyn LogSink,
}

impl<'a> Recommender<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        engine: &'a dyn EncodePort,
        input: &'a Path,
        source_duration: f64,
        workdir: &'a Path,
        cancel: &'a CancelFlag,
        progress: &'a dyn ProgressSink,
        log: &'a dyn LogSink,
    ) -> Self {
        Self {
            engine,
            input,
            source_duration,
            workdir,
            probe_seq: AtomicU64::new(0),
            cancel,
            progress,
            log,
        }
    }

    /// Find an (fps, quality) pair whose extrapolated output size meets
    /// `target_bytes`, preferring the highest frame rate and then the highest
    /// quality that fits. Falls back to the minimum-size configuration with
    /// `met_target == false` when the budget is unreachable.
    pub async fn recommend(
        &self,
        baseline: &EncodeParameters,
        target_bytes: u64,
    ) -> WebpcutResult<Recommendation> {
        if target_bytes == 0 {
            return Err(WebpcutError::validation("target size must be positive"));
        }

        let full_duration = baseline.trim_duration();
        let sample_duration = RECOMMEND_SAMPLE_SECS.min(full_duration);
        if sample_duration <= 0.0 {
            return Err(WebpcutError::validation(
                "trim range is empty; nothing to sample",
            ));
        }

        // Probes are compared at sample scale instead of extrapolating each
        // one; the two are equivalent modulo rounding.
        let target_sample_bytes = target_bytes as f64 * (sample_duration / full_duration);

        let candidates = fps_candidates(baseline.fps);
        let probe_budget = candidates.len() as u32 * (QUALITY_SEARCH_ITERATIONS + 1) + 2;
        let mut probes_used: u32 = 0;

        let baseline_sample = self.probe(baseline, sample_duration).await?;
        probes_used += 1;
        self.report(probes_used, probe_budget);

        let baseline_estimate = extrapolate_size(baseline_sample, sample_duration, full_duration)?;
        self.log.line(&format!(
            "recommend baseline estimate={} target={}",
            format_bytes(baseline_estimate),
            format_bytes(target_bytes)
        ));

        if baseline_estimate <= target_bytes {
            self.progress.set(1.0);
            return Ok(Recommendation {
                params: baseline.clone(),
                estimated_bytes: baseline_estimate,
                met_target: true,
                probes_used,
            });
        }

        let mut best: Option<(u32, u32, u64)> = None;
        let mut met_target = true;

        for &fps in &candidates {
            self.cancel.check()?;
            let min_quality_bytes = self
                .probe(&baseline.with_fps_quality(fps, QUALITY_MIN), sample_duration)
                .await?;
            probes_used += 1;
            self.report(probes_used, probe_budget);

            // Lower frame rate only reduces size, so an infeasible minimum
            // quality rules out this rate entirely.
            if min_quality_bytes as f64 > target_sample_bytes {
                debug!(fps, min_quality_bytes, "fps candidate infeasible at minimum quality");
                continue;
            }

            let mut low = QUALITY_MIN;
            let mut high = QUALITY_MAX;
            let mut feasible_quality = QUALITY_MIN;
            let mut feasible_bytes = min_quality_bytes;
            let mut iterations = 0;

            while low <= high && iterations < QUALITY_SEARCH_ITERATIONS {
                self.cancel.check()?;
                let mid = (low + high) / 2;
                let sample_bytes = self
                    .probe(&baseline.with_fps_quality(fps, mid), sample_duration)
                    .await?;
                probes_used += 1;
                self.report(probes_used, probe_budget);
                iterations += 1;

                if sample_bytes as f64 <= target_sample_bytes {
                    feasible_quality = mid;
                    feasible_bytes = sample_bytes;
                    low = mid + 1;
                } else {
                    high = mid - 1;
                }
            }

            best = Some((fps, feasible_quality, feasible_bytes));
            break;
        }

        let (fps, quality, sample_bytes) = match best {
            Some(found) => found,
            None => {
                self.cancel.check()?;
                let fallback_fps = candidates.last().copied().unwrap_or(FPS_MIN);
                let fallback_bytes = self
                    .probe(
                        &baseline.with_fps_quality(fallback_fps, QUALITY_MIN),
                        sample_duration,
                    )
                    .await?;
                probes_used += 1;
                self.report(probes_used, probe_budget);
                met_target = false;
                self.log
                    .line("no feasible combination under target; returning minimum settings");
                (fallback_fps, QUALITY_MIN, fallback_bytes)
            }
        };

        let estimated_bytes = extrapolate_size(sample_bytes, sample_duration, full_duration)?;
        self.progress.set(1.0);

        Ok(Recommendation {
            params: baseline.with_fps_quality(fps, quality),
            estimated_bytes,
            met_target,
            probes_used,
        })
    }

    /// One sample encode at the candidate parameters. The output artifact
    /// name embeds a monotonic counter so no two probes collide; deletion
    /// afterwards is best-effort and never fatal.
    async fn probe(&self, params: &EncodeParameters, sample_duration: f64) -> WebpcutResult<u64> {
        self.cancel.check()?;
        let seq = self.probe_seq.fetch_add(1, Ordering::Relaxed);
        let output = self.probe_output_path(seq);
        let sampled = params.sample_window(sample_duration);

        let encoded = self
            .engine
            .encode(
                self.input,
                &output,
                &sampled,
                self.source_duration,
                self.cancel,
                None,
            )
            .await?;

        debug!(
            fps = params.fps,
            quality = params.quality,
            bytes = encoded.size_bytes,
            "probe complete"
        );

        // Cleanup failures are swallowed; the scratch directory is removed
        // wholesale when the operation ends.
        let _ = tokio::fs::remove_file(&encoded.path).await;

        Ok(encoded.size_bytes)
    }

    fn probe_output_path(&self, seq: u64) -> PathBuf {
        self.workdir.join(format!("probe-{seq}.webp"))
    }

    fn report(&self, probes: u32, budget: u32) {
        self.progress
            .set(f64::from(probes) / f64::from(budget.max(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_for_30_fps() {
        assert_eq!(fps_candidates(30), vec![30, 27, 23, 18, 14, 10, 8, 1]);
    }

    #[test]
    fn candidates_are_descending_and_unique() {
        for fps in [1, 2, 5, 12, 24, 30, 48, 60] {
            let candidates = fps_candidates(fps);
            assert!(candidates.windows(2).all(|w| w[0] > w[1]), "{candidates:?}");
            assert_eq!(*candidates.last().unwrap(), 1);
            assert!(candidates.iter().all(|&f| (1..=60).contains(&f)));
        }
    }

    #[test]
    fn candidates_for_minimum_fps_collapse_to_one() {
        assert_eq!(fps_candidates(1), vec![1]);
    }

    #[test]
    fn candidates_clamp_to_encoder_domain() {
        let candidates = fps_candidates(60);
        assert_eq!(candidates[0], 60);
        assert!(candidates.iter().all(|&f| f <= 60));
    }
}
