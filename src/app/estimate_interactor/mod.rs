//! Output-size estimation use case
//!
//! Encodes a short sample of the trim window into a scratch directory and
//! extrapolates the full-duration size linearly. The scratch directory and
//! its artifact are removed when the estimate returns.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use tracing::debug;

use crate::domain::model::{EncodeParameters, VideoMetadata};
use crate::engine::estimate::extrapolate_size;
use crate::error::WebpcutResult;
use crate::ports::{CancelFlag, EncodePort, LogSink};
use crate::utils::format::format_bytes;

/// Sample encodes for estimation cover at most this many seconds.
pub const ESTIMATE_SAMPLE_SECS: f64 = 2.0;

/// Extrapolated size for the current parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateReport {
    pub estimated_bytes: u64,
    pub sample_bytes: u64,
    pub sample_duration: f64,
}

pub struct EstimateInteractor {
    engine: Arc<dyn EncodePort>,
}

impl EstimateInteractor {
    pub fn new(engine: Arc<dyn EncodePort>) -> Self {
        Self { engine }
    }

    pub async fn estimate(
        &self,
        input: &Path,
        params: &EncodeParameters,
        metadata: &VideoMetadata,
        cancel: &CancelFlag,
        log: &dyn LogSink,
    ) -> WebpcutResult<EstimateReport> {
        params.validate(metadata)?;

        let full_duration = params.trim_duration();
        let sample_duration = ESTIMATE_SAMPLE_SECS.min(full_duration);
        let sampled = params.sample_window(sample_duration);

        let scratch = TempDir::new()?;
        let output = scratch.path().join("estimate.webp");

        debug!(sample_duration, "encoding estimation sample");
        let encoded = self
            .engine
            .encode(input, &output, &sampled, metadata.duration, cancel, None)
            .await?;

        let estimated_bytes =
            extrapolate_size(encoded.size_bytes, sample_duration, full_duration)?;
        log.line(&format!(
            "estimated output size {} (sampled {} over {:.2}s)",
            format_bytes(estimated_bytes),
            format_bytes(encoded.size_bytes),
            sample_duration
        ));

        Ok(EstimateReport {
            estimated_bytes,
            sample_bytes: encoded.size_bytes,
            sample_duration,
        })
    }
}
