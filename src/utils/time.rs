//! Time utilities

use crate::constants::MAX_TIME_TAKEN_MS;

/// Clamp a client-reported answer time into `0..=MAX_TIME_TAKEN_MS`
pub fn clamp_time_taken(ms: i64) -> i64 {
    ms.clamp(0, MAX_TIME_TAKEN_MS)
}

/// Convert a limit in seconds to milliseconds
pub fn seconds_to_ms(seconds: u32) -> i64 {
    i64::from(seconds) * 1000
}

/// Format milliseconds as a human-readable string
pub fn format_milliseconds(ms: i64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let seconds = ms / 1000;
        let minutes = seconds / 60;
        let remaining_seconds = seconds % 60;
        format!("{}m {}s", minutes, remaining_seconds)
    }
}
