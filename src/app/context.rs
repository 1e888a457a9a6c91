//! Editing session state
//!
//! One context per loaded source. Geometry edits route through the domain
//! normalizers so the session can never hold an invalid trim or crop, and
//! every operation reads an immutable parameter snapshot built at call time.
//! While an encode operation is running the session is marked busy and
//! further edits are ignored rather than queued.

use crate::domain::drag::{resolve_drag, DragMode, DragSession};
use crate::domain::geometry::{
    clamp_playhead, loop_playhead, normalize_crop, normalize_trim, RawCrop,
};
use crate::domain::model::{
    CropRect, EncodeParameters, TrimField, TrimInterval, VideoMetadata, FPS_MAX, FPS_MIN,
    QUALITY_MAX, QUALITY_MIN, SPEED_MAX, SPEED_MIN,
};

/// Mutable state of one editing session.
#[derive(Debug, Clone)]
pub struct AppContext {
    metadata: VideoMetadata,
    trim: TrimInterval,
    crop: CropRect,
    resize_w: u32,
    resize_h: u32,
    fps: u32,
    quality: u32,
    speed: f64,
    playhead: f64,
    drag: Option<DragSession>,
    processing: bool,
}

impl AppContext {
    /// Fresh session: full trim, full-frame crop, resize matching the crop,
    /// playhead at the trim start.
    pub fn new(metadata: VideoMetadata, fps: u32, quality: u32, speed: f64) -> Self {
        let crop = CropRect::full_frame(&metadata);
        Self {
            metadata,
            trim: TrimInterval::full(metadata.duration),
            crop,
            resize_w: crop.w,
            resize_h: crop.h,
            fps: fps.clamp(FPS_MIN, FPS_MAX),
            quality: quality.clamp(QUALITY_MIN, QUALITY_MAX),
            speed: if speed.is_finite() {
                speed.clamp(SPEED_MIN, SPEED_MAX)
            } else {
                1.0
            },
            playhead: 0.0,
            drag: None,
            processing: false,
        }
    }

    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    pub fn trim(&self) -> TrimInterval {
        self.trim
    }

    pub fn crop(&self) -> CropRect {
        self.crop
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Mark the session busy for the duration of an encode operation.
    pub fn begin_processing(&mut self) {
        self.processing = true;
    }

    pub fn end_processing(&mut self) {
        self.processing = false;
    }

    /// Apply an edit to one trim field. The playhead is clamped back into the
    /// window afterwards.
    pub fn apply_trim_edit(&mut self, field: TrimField, value: f64) {
        if self.processing {
            return;
        }
        let (start, end) = match field {
            TrimField::Start => (value, self.trim.end),
            TrimField::End => (self.trim.start, value),
        };
        self.trim = normalize_trim(start, end, self.metadata.duration, field);
        self.playhead = clamp_playhead(self.playhead, &self.trim);
    }

    /// Move the trim start to the current playhead position.
    pub fn set_start_from_playhead(&mut self) {
        self.apply_trim_edit(TrimField::Start, self.playhead);
    }

    /// Move the trim end to the current playhead position.
    pub fn set_end_from_playhead(&mut self) {
        self.apply_trim_edit(TrimField::End, self.playhead);
    }

    /// Apply raw crop field input, normalized against the frame.
    pub fn apply_crop_input(&mut self, raw: RawCrop) {
        if self.processing {
            return;
        }
        self.crop = normalize_crop(raw, self.metadata.width, self.metadata.height);
    }

    /// Restore the full-frame crop and snap the resize target back to it.
    pub fn reset_crop(&mut self) {
        if self.processing {
            return;
        }
        self.crop = CropRect::full_frame(&self.metadata);
        self.snap_resize_to_crop();
    }

    /// Match the resize target to the current crop size.
    pub fn snap_resize_to_crop(&mut self) {
        if self.processing {
            return;
        }
        self.resize_w = self.crop.w;
        self.resize_h = self.crop.h;
    }

    pub fn set_resize(&mut self, width: u32, height: u32) {
        if self.processing {
            return;
        }
        self.resize_w = width.max(1);
        self.resize_h = height.max(1);
    }

    pub fn set_fps(&mut self, fps: u32) {
        if self.processing {
            return;
        }
        self.fps = fps.clamp(FPS_MIN, FPS_MAX);
    }

    pub fn set_quality(&mut self, quality: u32) {
        if self.processing {
            return;
        }
        self.quality = quality.clamp(QUALITY_MIN, QUALITY_MAX);
    }

    pub fn set_speed(&mut self, speed: f64) {
        if self.processing || !speed.is_finite() {
            return;
        }
        self.speed = speed.clamp(SPEED_MIN, SPEED_MAX);
    }

    /// Seek: the playhead stays inside the trim window.
    pub fn set_playhead(&mut self, position: f64) {
        self.playhead = clamp_playhead(position, &self.trim);
    }

    /// Advance the playhead by one playback tick, looping at the trim end.
    pub fn tick_playhead(&mut self, delta_secs: f64) {
        let delta = if delta_secs.is_finite() { delta_secs } else { 0.0 };
        self.playhead = loop_playhead(self.playhead + delta, &self.trim);
    }

    /// Start a crop-box gesture. An already-active gesture is replaced.
    pub fn begin_drag(
        &mut self,
        pointer_id: u64,
        handle: &str,
        px_x: f64,
        px_y: f64,
        stage_w: f64,
        stage_h: f64,
    ) {
        if self.processing || stage_w <= 0.0 || stage_h <= 0.0 {
            return;
        }
        self.drag = Some(DragSession {
            pointer_id,
            mode: DragMode::from_handle(handle),
            start_px_x: px_x,
            start_px_y: px_y,
            start_rect: self.crop,
            stage_w,
            stage_h,
        });
    }

    /// Pointer movement during a gesture. Events from any other pointer are
    /// ignored.
    pub fn update_drag(&mut self, pointer_id: u64, px_x: f64, px_y: f64) {
        let Some(drag) = &self.drag else {
            return;
        };
        if drag.pointer_id != pointer_id {
            return;
        }
        let (dx, dy) = drag.frame_delta(px_x, px_y, self.metadata.width, self.metadata.height);
        self.crop = resolve_drag(
            drag.start_rect,
            dx,
            dy,
            drag.mode,
            self.metadata.width,
            self.metadata.height,
        );
    }

    /// End the gesture for the matching pointer; the crop keeps its last
    /// resolved value.
    pub fn end_drag(&mut self, pointer_id: u64) {
        if self
            .drag
            .as_ref()
            .is_some_and(|drag| drag.pointer_id == pointer_id)
        {
            self.drag = None;
        }
    }

    pub fn drag_active(&self) -> bool {
        self.drag.is_some()
    }

    /// Adopt a recommended frame rate and quality, clamped to their domains.
    pub fn apply_fps_quality(&mut self, fps: u32, quality: u32) {
        self.fps = fps.clamp(FPS_MIN, FPS_MAX);
        self.quality = quality.clamp(QUALITY_MIN, QUALITY_MAX);
    }

    /// Immutable snapshot of every encoder input.
    pub fn params(&self) -> EncodeParameters {
        EncodeParameters {
            trim: self.trim,
            crop: self.crop,
            resize_w: self.resize_w,
            resize_h: self.resize_h,
            fps: self.fps,
            quality: self.quality,
            speed: self.speed,
        }
    }
}
