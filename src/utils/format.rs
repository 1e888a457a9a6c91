//! Byte, duration and delta formatting for CLI output

/// Human-readable byte count with binary units.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let exp = (((bytes as f64).ln() / 1024f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let num = bytes as f64 / 1024f64.powi(exp as i32);

    if num >= 100.0 || exp == 0 {
        format!("{:.0} {}", num, UNITS[exp])
    } else {
        format!("{:.2} {}", num, UNITS[exp])
    }
}

/// `MM:SS.cc`, or `HH:MM:SS.cc` once the duration reaches an hour.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00.00".to_string();
    }

    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = seconds % 60.0;

    if hours > 0 {
        format!("{:02}:{:02}:{:05.2}", hours, minutes, secs)
    } else {
        format!("{:02}:{:05.2}", minutes, secs)
    }
}

/// Output-vs-input size change as a signed percentage.
pub fn format_delta(delta_ratio: f64) -> String {
    if !delta_ratio.is_finite() {
        return "-".to_string();
    }

    if delta_ratio <= 0.0 {
        format!("-{:.1}%", delta_ratio.abs())
    } else {
        format!("+{:.1}%", delta_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_pick_sensible_units() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_bytes(150 * 1024), "150 KB");
    }

    #[test]
    fn durations_roll_over_to_hours() {
        assert_eq!(format_duration(0.0), "00:00.00");
        assert_eq!(format_duration(90.5), "01:30.50");
        assert_eq!(format_duration(3661.25), "01:01:01.25");
        assert_eq!(format_duration(f64::NAN), "00:00.00");
        assert_eq!(format_duration(-5.0), "00:00.00");
    }

    #[test]
    fn deltas_are_signed() {
        assert_eq!(format_delta(-42.35), "-42.3%");
        assert_eq!(format_delta(12.04), "+12.0%");
        assert_eq!(format_delta(0.0), "-0.0%");
        assert_eq!(format_delta(f64::NAN), "-");
    }
}
