//! Log and progress sinks backed by the tracing subscriber

use tracing::{debug, info};

use crate::ports::{LogSink, ProgressSink};

/// LogSink emitting each line at info level.
#[derive(Default)]
pub struct TracingLogSink;

impl TracingLogSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for TracingLogSink {
    fn line(&self, line: &str) {
        info!("{line}");
    }
}

/// ProgressSink emitting fraction updates at debug level.
#[derive(Default)]
pub struct TracingProgressSink;

impl TracingProgressSink {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressSink for TracingProgressSink {
    fn set(&self, fraction: f64) {
        debug!(progress = format!("{:.0}%", fraction * 100.0), "working");
    }
}
