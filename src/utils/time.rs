use chrono::{Local, TimeZone};

/// Render epoch seconds on the local clock, falling back to the raw number when out of range.
pub fn format_epoch_local(secs: i64) -> String {
    match Local.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => secs.to_string(),
    }
}

pub fn current_human_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
