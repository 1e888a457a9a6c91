// Adapters - concrete implementations of the port contracts

pub mod exec_ffmpeg;
pub mod log_memory;
pub mod log_tracing;
pub mod probe_ffprobe;
pub mod toml_config;

pub use exec_ffmpeg::FfmpegEngine;
pub use log_memory::MemoryLogSink;
pub use log_tracing::{TracingLogSink, TracingProgressSink};
pub use probe_ffprobe::FfprobeProbe;
pub use toml_config::{Config, Defaults};
