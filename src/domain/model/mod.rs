// Domain models - Core types and data structures

use serde::Serialize;

use crate::error::{WebpcutError, WebpcutResult};

/// Smallest trim interval the editor keeps open, in seconds, whenever the
/// source is at least this long.
pub const MIN_TRIM_GAP: f64 = 0.1;

/// Smallest crop edge in frame pixels, clamped down when the frame itself is
/// smaller.
pub const MIN_CROP_SIZE: u32 = 8;

/// Frame-rate domain for encode parameters.
pub const FPS_MIN: u32 = 1;
pub const FPS_MAX: u32 = 60;

/// Quality knob domain (higher = better/larger).
pub const QUALITY_MIN: u32 = 1;
pub const QUALITY_MAX: u32 = 100;

/// Playback-speed domain.
pub const SPEED_MIN: f64 = 0.25;
pub const SPEED_MAX: f64 = 4.0;

/// Probed source properties. Immutable once captured for a given source and
/// replaced wholesale when a new source is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    /// Duration in seconds.
    pub duration: f64,
}

impl VideoMetadata {
    pub fn new(width: u32, height: u32, duration: f64) -> WebpcutResult<Self> {
        if width == 0 || height == 0 {
            return Err(WebpcutError::validation(
                "video dimensions must be positive",
            ));
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(WebpcutError::validation(
                "video duration must be a non-negative number of seconds",
            ));
        }
        Ok(Self {
            width,
            height,
            duration,
        })
    }
}

/// Which trim field the user touched last. The edited field wins whenever the
/// ordering and minimum-gap constraints conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimField {
    Start,
    End,
}

/// Trim interval in seconds; `0 <= start <= end <= duration` and
/// `end - start >= MIN_TRIM_GAP` whenever the source allows it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrimInterval {
    pub start: f64,
    pub end: f64,
}

impl TrimInterval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Full interval over a source of the given duration.
    pub fn full(duration: f64) -> Self {
        Self {
            start: 0.0,
            end: duration.max(0.0),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, position: f64) -> bool {
        position >= self.start && position <= self.end
    }
}

/// Crop rectangle in frame pixels; always fits inside the frame and never
/// degenerates below the minimum size once normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Full-frame rectangle for the given metadata.
    pub fn full_frame(metadata: &VideoMetadata) -> Self {
        Self {
            x: 0,
            y: 0,
            w: metadata.width,
            h: metadata.height,
        }
    }
}

/// Snapshot of every encoder input. Constructed fresh per operation from
/// current session state and never mutated in place; sampling calls receive a
/// copy with `trim.end` overridden via [`EncodeParameters::sample_window`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodeParameters {
    pub trim: TrimInterval,
    pub crop: CropRect,
    pub resize_w: u32,
    pub resize_h: u32,
    pub fps: u32,
    pub quality: u32,
    pub speed: f64,
}

impl EncodeParameters {
    /// Validate every field against its documented domain. Called before any
    /// operation is attempted; geometry fields are expected to already be
    /// normalized.
    pub fn validate(&self, metadata: &VideoMetadata) -> WebpcutResult<()> {
        if !self.trim.start.is_finite() || !self.trim.end.is_finite() {
            return Err(WebpcutError::validation("trim values must be finite"));
        }
        if self.trim.start < 0.0
            || self.trim.end <= self.trim.start
            || self.trim.end > metadata.duration
        {
            return Err(WebpcutError::validation(format!(
                "trim range is invalid: end must exceed start and stay within {:.2}s",
                metadata.duration
            )));
        }
        if u64::from(self.crop.x) + u64::from(self.crop.w) > u64::from(metadata.width)
            || u64::from(self.crop.y) + u64::from(self.crop.h) > u64::from(metadata.height)
        {
            return Err(WebpcutError::validation(
                "crop rectangle does not fit inside the frame",
            ));
        }
        if self.crop.w == 0 || self.crop.h == 0 {
            return Err(WebpcutError::validation("crop size must be positive"));
        }
        if self.resize_w == 0 || self.resize_h == 0 {
            return Err(WebpcutError::validation(
                "resize dimensions must be positive integers",
            ));
        }
        if self.fps < FPS_MIN || self.fps > FPS_MAX {
            return Err(WebpcutError::validation(format!(
                "fps must be an integer between {} and {}",
                FPS_MIN, FPS_MAX
            )));
        }
        if self.quality < QUALITY_MIN || self.quality > QUALITY_MAX {
            return Err(WebpcutError::validation(format!(
                "quality must be an integer between {} and {}",
                QUALITY_MIN, QUALITY_MAX
            )));
        }
        if !self.speed.is_finite() || self.speed < SPEED_MIN || self.speed > SPEED_MAX {
            return Err(WebpcutError::validation(format!(
                "speed must be between {:.2} and {:.2}",
                SPEED_MIN, SPEED_MAX
            )));
        }
        Ok(())
    }

    /// Duration of the trimmed clip in seconds.
    pub fn trim_duration(&self) -> f64 {
        self.trim.duration()
    }

    /// Independent snapshot covering only the first `sample_duration` seconds
    /// of the trim window. Used for probe and preview encodes.
    pub fn sample_window(&self, sample_duration: f64) -> Self {
        let mut sampled = self.clone();
        sampled.trim.end = self.trim.start + sample_duration;
        sampled
    }

    /// Same snapshot with a different frame rate and quality.
    pub fn with_fps_quality(&self, fps: u32, quality: u32) -> Self {
        let mut tuned = self.clone();
        tuned.fps = fps;
        tuned.quality = quality;
        tuned
    }
}
