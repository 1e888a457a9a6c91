//! webpcut - video to animated WebP converter
//!
//! Trims, crops, resizes and re-times a video clip and encodes it as an
//! animated WebP through an external ffmpeg engine. Includes sample-based
//! output-size estimation and a target-size recommendation search over
//! frame rate and quality.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::model::{CropRect, EncodeParameters, TrimInterval, VideoMetadata};
pub use error::{WebpcutError, WebpcutResult};
