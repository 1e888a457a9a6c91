// Geometry invariants - crop and trim normalization
//
// Normalization never fails: invalid input is silently corrected to the
// nearest valid state. Every crop rectangle and trim interval must route
// through here before being used or displayed.

use crate::domain::model::{CropRect, TrimField, TrimInterval, MIN_CROP_SIZE, MIN_TRIM_GAP};

/// Raw crop input as it arrives from fields or a drag gesture: possibly
/// fractional, out of range, or non-finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawCrop {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl RawCrop {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

impl From<CropRect> for RawCrop {
    fn from(rect: CropRect) -> Self {
        Self {
            x: f64::from(rect.x),
            y: f64::from(rect.y),
            w: f64::from(rect.w),
            h: f64::from(rect.h),
        }
    }
}

/// Clamp with a non-finite fallback to the lower bound.
pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.min(max).max(min)
}

/// Normalize an arbitrary crop input against the frame dimensions.
///
/// Non-finite coordinates fall back to the origin, non-finite sizes to the
/// full frame. The result always fits inside the frame and keeps both edges
/// at or above `min(MIN_CROP_SIZE, frame dim)`; when the minimum edge cannot
/// fit at the requested origin, the origin is pulled back instead.
pub fn normalize_crop(raw: RawCrop, width: u32, height: u32) -> CropRect {
    let max_w = f64::from(width);
    let max_h = f64::from(height);

    let mut x = if raw.x.is_finite() { raw.x.round() } else { 0.0 };
    let mut y = if raw.y.is_finite() { raw.y.round() } else { 0.0 };
    let mut w = if raw.w.is_finite() { raw.w.round() } else { max_w };
    let mut h = if raw.h.is_finite() { raw.h.round() } else { max_h };

    x = clamp(x, 0.0, max_w - 1.0);
    y = clamp(y, 0.0, max_h - 1.0);

    let min_w = f64::from(MIN_CROP_SIZE.min(width));
    let min_h = f64::from(MIN_CROP_SIZE.min(height));

    // The minimum edge wins over the remaining span; overflow is resolved by
    // pulling the origin back below.
    w = w.min(max_w - x).max(min_w);
    h = h.min(max_h - y).max(min_h);

    if x + w > max_w {
        x = max_w - w;
    }
    if y + h > max_h {
        y = max_h - h;
    }

    CropRect {
        x: x as u32,
        y: y as u32,
        w: w as u32,
        h: h as u32,
    }
}

/// Normalize a trim interval after one field was edited.
///
/// Both fields are clamped to `[0, duration]`; if ordering breaks, the
/// un-edited field collapses onto the edited one; if the gap drops below
/// `MIN_TRIM_GAP`, the un-edited field is pushed outward and, when the
/// duration bound blocks the push, the edited field is pulled inward so both
/// stay within range. The just-edited field always has precedence.
pub fn normalize_trim(start: f64, end: f64, duration: f64, edited: TrimField) -> TrimInterval {
    let max_duration = if duration.is_finite() {
        duration.max(0.0)
    } else {
        0.0
    };
    let mut s = clamp(start, 0.0, max_duration);
    let mut e = clamp(end, 0.0, max_duration);

    let min_gap = if max_duration >= MIN_TRIM_GAP {
        MIN_TRIM_GAP
    } else {
        0.0
    };

    if e < s {
        match edited {
            TrimField::Start => e = s,
            TrimField::End => s = e,
        }
    }

    if e - s < min_gap {
        match edited {
            TrimField::Start => {
                e = clamp(s + min_gap, 0.0, max_duration);
                s = clamp(e - min_gap, 0.0, max_duration);
            }
            TrimField::End => {
                s = clamp(e - min_gap, 0.0, max_duration);
                e = clamp(s + min_gap, 0.0, max_duration);
            }
        }
    }

    TrimInterval { start: s, end: e }
}

/// Clamp a playback position into the trim interval.
pub fn clamp_playhead(position: f64, trim: &TrimInterval) -> f64 {
    clamp(position, trim.start, trim.end)
}

/// Playback position after a timeline tick: positions before the window snap
/// to its start, and reaching `end` loops back to `start`. Looping is a
/// consequence of the trim invariant, not a separate feature.
pub fn loop_playhead(position: f64, trim: &TrimInterval) -> f64 {
    if !position.is_finite() || position < trim.start {
        return trim.start;
    }
    if trim.end > trim.start && position >= trim.end {
        return trim.start;
    }
    position
}
