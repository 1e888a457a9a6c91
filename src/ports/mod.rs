// Ports - interface contracts between the core and its collaborators

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::model::{EncodeParameters, VideoMetadata};
use crate::error::{WebpcutError, WebpcutResult};

/// Result of one encode job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOutput {
    /// Where the encoded artifact was written.
    pub path: PathBuf,
    /// Encoded size in bytes.
    pub size_bytes: u64,
}

/// Port for the external codec engine.
///
/// The engine processes one job at a time; callers never issue overlapping
/// jobs. Sample probes and full conversions go through the same operation,
/// distinguished only by the trim window in `params`.
#[async_trait]
pub trait EncodePort: Send + Sync {
    /// Encode `input` to `output` with the given parameter snapshot.
    ///
    /// `source_duration` is the full duration of the input in seconds; the
    /// backend omits the duration argument when the trim spans the whole
    /// source. Cancellation aborts the job in flight. Progress, when a sink
    /// is given, is the backend's own fractional report in `[0, 1]`.
    async fn encode(
        &self,
        input: &Path,
        output: &Path,
        params: &EncodeParameters,
        source_duration: f64,
        cancel: &CancelFlag,
        progress: Option<&dyn ProgressSink>,
    ) -> WebpcutResult<EncodedOutput>;
}

/// Port for source metadata probing.
#[async_trait]
pub trait ProbePort: Send + Sync {
    async fn probe(&self, input: &Path) -> WebpcutResult<VideoMetadata>;
}

/// Sink for free-text diagnostic lines.
pub trait LogSink: Send + Sync {
    fn line(&self, line: &str);
}

/// Sink for estimated operation progress in `[0, 1]`.
pub trait ProgressSink: Send + Sync {
    fn set(&self, fraction: f64);
}

/// Cooperative, coarse cancellation: setting the flag aborts the in-flight
/// engine job and makes search loops exit between probes.
#[derive(Clone, Default)]
pub struct CancelFlag {
    inner: Arc<CancelInner>,
}

#[derive(Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Error out when cancelled; used between probes.
    pub fn check(&self) -> WebpcutResult<()> {
        if self.is_cancelled() {
            Err(WebpcutError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves once the flag is set.
    pub async fn cancelled(&self) {
        while !self.is_cancelled() {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                break;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_flag_starts_clear() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());
        assert!(flag.check().is_ok());
    }

    #[test]
    fn cancel_flag_check_errors_once_set() {
        let flag = CancelFlag::new();
        flag.cancel();
        assert!(flag.is_cancelled());
        assert!(matches!(flag.check(), Err(WebpcutError::Cancelled)));
    }

    #[tokio::test]
    async fn cancelled_future_resolves_after_cancel() {
        let flag = CancelFlag::new();
        let waiter = flag.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        flag.cancel();
        handle.await.unwrap();
    }
}
