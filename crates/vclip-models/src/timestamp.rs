//! Clock formatting for clip offsets.
//!
//! Offsets travel as seconds on the wire and are shown as `M:SS`, switching
//! to `H:MM:SS` once a source video runs past the hour mark.

/// Format seconds as `M:SS`, or `H:MM:SS` from one hour on.
///
/// # Examples
/// ```
/// use vclip_models::timestamp::format_clock;
/// assert_eq!(format_clock(754.0), "12:34");
/// assert_eq!(format_clock(3730.0), "1:02:10");
/// assert_eq!(format_clock(5.9), "0:05");
/// ```
pub fn format_clock(total_secs: f64) -> String {
    let total = if total_secs.is_finite() && total_secs > 0.0 {
        total_secs.floor() as u64
    } else {
        0
    };

    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Format a start/end pair as `start - end`.
pub fn format_time_range(start_secs: f64, end_secs: f64) -> String {
    format!("{} - {}", format_clock(start_secs), format_clock(end_secs))
}
