//! Full-duration output size extrapolation from a short sample encode
//!
//! Assumes near-linear scaling of encoded size with duration for a fixed
//! content style. This is a documented heuristic traded for bounding the
//! number of expensive sample encodes, not a guaranteed bound; content with
//! highly non-uniform motion will drift from it.

use crate::error::{WebpcutError, WebpcutResult};

/// Extrapolate a sample byte size to the full trim duration, floored at one
/// byte. Rejects non-positive sample durations; callers must validate the
/// trim window before sampling.
pub fn extrapolate_size(
    sample_bytes: u64,
    sample_duration: f64,
    full_duration: f64,
) -> WebpcutResult<u64> {
    if !sample_duration.is_finite() || sample_duration <= 0.0 {
        return Err(WebpcutError::validation(
            "sample duration must be positive to extrapolate a size",
        ));
    }
    if !full_duration.is_finite() || full_duration < 0.0 {
        return Err(WebpcutError::validation(
            "full duration must be non-negative to extrapolate a size",
        ));
    }

    let scaled = sample_bytes as f64 * (full_duration / sample_duration);
    Ok((scaled.round() as u64).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_when_sample_spans_full_duration() {
        assert_eq!(extrapolate_size(123_456, 2.0, 2.0).unwrap(), 123_456);
    }

    #[test]
    fn scales_linearly_with_duration_ratio() {
        assert_eq!(extrapolate_size(75_000, 1.5, 10.0).unwrap(), 500_000);
        assert_eq!(extrapolate_size(100, 2.0, 1.0).unwrap(), 50);
    }

    #[test]
    fn rounds_to_nearest_byte() {
        // 10 * (1.0 / 3.0) = 3.33.. -> 3
        assert_eq!(extrapolate_size(10, 3.0, 1.0).unwrap(), 3);
        // 11 * (1.0 / 2.0) = 5.5 -> 6
        assert_eq!(extrapolate_size(11, 2.0, 1.0).unwrap(), 6);
    }

    #[test]
    fn floors_at_one_byte() {
        assert_eq!(extrapolate_size(1, 10.0, 0.001).unwrap(), 1);
        assert_eq!(extrapolate_size(0, 1.0, 1.0).unwrap(), 1);
    }

    #[test]
    fn rejects_non_positive_sample_duration() {
        assert!(extrapolate_size(100, 0.0, 1.0).is_err());
        assert!(extrapolate_size(100, -1.0, 1.0).is_err());
        assert!(extrapolate_size(100, f64::NAN, 1.0).is_err());
    }
}
