//! Conversion use case
//!
//! Full conversions and short previews share one code path; a preview is a
//! conversion whose trim window is capped at a few seconds.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::model::{EncodeParameters, VideoMetadata};
use crate::error::WebpcutResult;
use crate::ports::{CancelFlag, EncodePort, EncodedOutput, LogSink, ProgressSink};
use crate::utils::format::format_bytes;

/// Preview encodes cover at most this many seconds of the clip.
pub const PREVIEW_SECS: f64 = 3.0;

/// Outcome of a conversion, with the size change against the source.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertReport {
    pub output: EncodedOutput,
    pub input_bytes: u64,
    /// Output-vs-input size change in percent; negative means smaller.
    pub delta_percent: f64,
}

pub struct ConvertInteractor {
    engine: Arc<dyn EncodePort>,
}

impl ConvertInteractor {
    pub fn new(engine: Arc<dyn EncodePort>) -> Self {
        Self { engine }
    }

    /// Encode the full trim window to `output`.
    pub async fn convert(
        &self,
        input: &Path,
        output: &Path,
        params: &EncodeParameters,
        metadata: &VideoMetadata,
        cancel: &CancelFlag,
        progress: &dyn ProgressSink,
        log: &dyn LogSink,
    ) -> WebpcutResult<ConvertReport> {
        params.validate(metadata)?;

        let input_bytes = tokio::fs::metadata(input).await?.len();
        log.line(&format!(
            "converting {} ({})",
            input.display(),
            format_bytes(input_bytes)
        ));

        let encoded = self
            .engine
            .encode(
                input,
                output,
                params,
                metadata.duration,
                cancel,
                Some(progress),
            )
            .await?;

        let delta_percent = if input_bytes > 0 {
            (encoded.size_bytes as f64 - input_bytes as f64) / input_bytes as f64 * 100.0
        } else {
            f64::NAN
        };

        info!(
            output = %encoded.path.display(),
            bytes = encoded.size_bytes,
            "conversion complete"
        );

        Ok(ConvertReport {
            output: encoded,
            input_bytes,
            delta_percent,
        })
    }

    /// Encode only the first seconds of the trim window, for a quick look at
    /// the output before committing to a full conversion.
    pub async fn preview(
        &self,
        input: &Path,
        output: &Path,
        params: &EncodeParameters,
        metadata: &VideoMetadata,
        cancel: &CancelFlag,
        progress: &dyn ProgressSink,
        log: &dyn LogSink,
    ) -> WebpcutResult<ConvertReport> {
        let sample_duration = PREVIEW_SECS.min(params.trim_duration());
        let sampled = params.sample_window(sample_duration);
        self.convert(input, output, &sampled, metadata, cancel, progress, log)
            .await
    }
}
