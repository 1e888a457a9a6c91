//! Bounded in-memory log sink
//!
//! Keeps only the most recent lines so long sessions never grow the buffer
//! without limit.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::LogSink;

/// Maximum number of retained lines.
pub const LOG_CAPACITY: usize = 120;

/// LogSink retaining the last [`LOG_CAPACITY`] lines.
#[derive(Default)]
pub struct MemoryLogSink {
    lines: Mutex<VecDeque<String>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current buffer contents, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }
}

impl LogSink for MemoryLogSink {
    fn line(&self, line: &str) {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        if lines.len() == LOG_CAPACITY {
            lines.pop_front();
        }
        lines.push_back(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_kept_in_order() {
        let sink = MemoryLogSink::new();
        sink.line("first");
        sink.line("second");
        assert_eq!(sink.snapshot(), vec!["first", "second"]);
    }

    #[test]
    fn oldest_lines_fall_off_at_capacity() {
        let sink = MemoryLogSink::new();
        for i in 0..(LOG_CAPACITY + 5) {
            sink.line(&format!("line {i}"));
        }
        let snapshot = sink.snapshot();
        assert_eq!(snapshot.len(), LOG_CAPACITY);
        assert_eq!(snapshot[0], "line 5");
        assert_eq!(snapshot[LOG_CAPACITY - 1], format!("line {}", LOG_CAPACITY + 4));
    }
}
