//! Duration rendering for song-length display

/// Format a duration in seconds as "M:SS".
///
/// Rounds to the nearest whole second and zero-pads the seconds field. There
/// is no hour component; very long files render as large minute counts, which
/// matches the song-length display this feeds. Non-positive or non-finite
/// input yields the "0:00" sentinel, the same rendering callers use for
/// "duration unknown".
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
