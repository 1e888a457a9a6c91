// Drag resolution - crop-box gestures over the preview stage
//
// resolve_drag is pure: pointer delta + mode + starting rectangle in, new
// rectangle out. Every branch routes through normalize_crop, so the crop
// invariant holds even under extreme or negative deltas.

use crate::domain::geometry::{clamp, normalize_crop, RawCrop};
use crate::domain::model::{CropRect, MIN_CROP_SIZE};

/// Active handle of a crop-box gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Translate the rectangle, size unchanged.
    Move,
    /// North-west handle: move the top-left corner, bottom-right fixed.
    NorthWest,
    /// North-east handle: top edge and width move, bottom-left fixed.
    NorthEast,
    /// South-west handle: left edge and height move, top-right fixed.
    SouthWest,
    /// South-east handle: grow/shrink from the fixed top-left corner.
    SouthEast,
}

impl DragMode {
    /// Handle identifier as used by the overlay markup; anything unrecognized
    /// is treated as a plain move.
    pub fn from_handle(handle: &str) -> Self {
        match handle {
            "nw" => Self::NorthWest,
            "ne" => Self::NorthEast,
            "sw" => Self::SouthWest,
            "se" => Self::SouthEast,
            _ => Self::Move,
        }
    }
}

/// Ephemeral state of one crop-box gesture, created on pointer-down and
/// destroyed on pointer-up. Owned by the interaction session via an `Option`;
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub pointer_id: u64,
    pub mode: DragMode,
    pub start_px_x: f64,
    pub start_px_y: f64,
    pub start_rect: CropRect,
    /// Stage pixel dimensions for pixel -> frame-unit conversion.
    pub stage_w: f64,
    pub stage_h: f64,
}

impl DragSession {
    /// Convert a pointer position into frame-unit deltas relative to the
    /// gesture origin: `pixel_delta * frame_dim / stage_px_dim`.
    pub fn frame_delta(&self, px_x: f64, px_y: f64, frame_w: u32, frame_h: u32) -> (f64, f64) {
        let dx = (px_x - self.start_px_x) * f64::from(frame_w) / self.stage_w;
        let dy = (px_y - self.start_px_y) * f64::from(frame_h) / self.stage_h;
        (dx, dy)
    }
}

/// Resolve a drag gesture into a new crop rectangle.
///
/// `dx`/`dy` are pointer deltas already converted to frame units. The result
/// is always normalized against the frame.
pub fn resolve_drag(
    start: CropRect,
    dx: f64,
    dy: f64,
    mode: DragMode,
    max_w: u32,
    max_h: u32,
) -> CropRect {
    let sx = f64::from(start.x);
    let sy = f64::from(start.y);
    let sw = f64::from(start.w);
    let sh = f64::from(start.h);
    let fw = f64::from(max_w);
    let fh = f64::from(max_h);
    let min_size = f64::from(MIN_CROP_SIZE);

    let raw = match mode {
        DragMode::Move => {
            let x = clamp(sx + dx, 0.0, fw - sw);
            let y = clamp(sy + dy, 0.0, fh - sh);
            RawCrop::new(x, y, sw, sh)
        }
        DragMode::SouthEast => {
            let w = clamp(sw + dx, min_size, fw - sx);
            let h = clamp(sh + dy, min_size, fh - sy);
            RawCrop::new(sx, sy, w, h)
        }
        DragMode::NorthWest => {
            let x = clamp(sx + dx, 0.0, sx + sw - min_size);
            let y = clamp(sy + dy, 0.0, sy + sh - min_size);
            RawCrop::new(x, y, sw + (sx - x), sh + (sy - y))
        }
        DragMode::NorthEast => {
            let y = clamp(sy + dy, 0.0, sy + sh - min_size);
            let w = clamp(sw + dx, min_size, fw - sx);
            RawCrop::new(sx, y, w, sh + (sy - y))
        }
        DragMode::SouthWest => {
            let x = clamp(sx + dx, 0.0, sx + sw - min_size);
            let h = clamp(sh + dy, min_size, fh - sy);
            RawCrop::new(x, sy, sw + (sx - x), h)
        }
    };

    normalize_crop(raw, max_w, max_h)
}
