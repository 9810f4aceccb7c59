//! Lecture duration and progress helpers shared by course and profile views.

/// Formats a total number of seconds the way course cards display it.
///
/// Hours win over seconds: `3725` renders as `"1h 2m"`, `125` as `"2m 5s"`,
/// `42` as `"42s"`. Fractional seconds are truncated.
pub fn format_duration(total_seconds: f64) -> String {
    let total = if total_seconds.is_finite() && total_seconds > 0.0 {
        total_seconds as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Percentage of lectures completed, rounded to two decimals.
///
/// A course without lectures counts as fully complete.
pub fn progress_percentage(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 100.0;
    }
    let completed = completed.clamp(0, total) as f64;
    let raw = completed / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}
