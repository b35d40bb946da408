// src/transform/timestamp.rs

use chrono::{DateTime, Local};

/// `[HH:MM:SS.mmm] ` for the current local time, or an empty string when disabled.
///
/// Call at the moment of the event; nothing is cached.
pub fn timestamp_prefix(enabled: bool) -> String {
    if enabled {
        format_timestamp_prefix(&Local::now())
    } else {
        String::new()
    }
}

pub fn format_timestamp_prefix(at: &DateTime<Local>) -> String {
    at.format("[%H:%M:%S%.3f] ").to_string()
}
