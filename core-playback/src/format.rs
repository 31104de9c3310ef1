//! Time display helpers shared with UI collaborators.

/// Format seconds as `m:ss`.
///
/// Minutes are unpadded and unbounded; seconds are truncated and zero-padded.
/// Negative and non-finite inputs render as `0:00`.
///
/// ```rust
/// use core_playback::format_time;
///
/// assert_eq!(format_time(65.9), "1:05");
/// assert_eq!(format_time(3600.0), "60:00");
/// ```
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format an optional duration; unknown durations render as `0:00`.
pub fn format_duration(duration: Option<f64>) -> String {
    format_time(duration.unwrap_or(0.0))
}
