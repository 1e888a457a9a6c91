//! Target-size recommendation use case
//!
//! Wraps the search driver with parameter validation and a scratch directory
//! for its probe artifacts.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use crate::domain::model::{EncodeParameters, VideoMetadata};
use crate::engine::recommend::{Recommendation, Recommender};
use crate::error::{WebpcutError, WebpcutResult};
use crate::ports::{CancelFlag, EncodePort, LogSink, ProgressSink};

pub struct RecommendInteractor {
    engine: Arc<dyn EncodePort>,
}

impl RecommendInteractor {
    pub fn new(engine: Arc<dyn EncodePort>) -> Self {
        Self { engine }
    }

    pub async fn recommend(
        &self,
        input: &Path,
        baseline: &EncodeParameters,
        metadata: &VideoMetadata,
        target_bytes: u64,
        cancel: &CancelFlag,
        progress: &dyn ProgressSink,
        log: &dyn LogSink,
    ) -> WebpcutResult<Recommendation> {
        baseline.validate(metadata)?;
        if target_bytes == 0 {
            return Err(WebpcutError::validation("target size must be positive"));
        }

        let scratch = TempDir::new()?;
        let recommender = Recommender::new(
            self.engine.as_ref(),
            input,
            metadata.duration,
            scratch.path(),
            cancel,
            progress,
            log,
        );

        recommender.recommend(baseline, target_bytes).await
    }
}
