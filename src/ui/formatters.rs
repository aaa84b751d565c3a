use chrono::{DateTime, Local};
use colored::Colorize;

use crate::core::sensors::Readings;

/// Unit suffix derived from the metric key's kind
fn unit_for(key: &str) -> &'static str {
    match key.rsplit('.').next() {
        Some("Load") => "%",
        Some("Clock") => "MHz",
        Some("Temp") => "°C",
        _ if key.starts_with("TEMP.") => "°C",
        _ => "",
    }
}

/// Format one reading, e.g. `CPU.Temp 54.0°C`
pub fn format_reading(key: &str, value: f32) -> String {
    match unit_for(key) {
        "MHz" => format!("{} {:.0}MHz", key, value),
        unit => format!("{} {:.1}{}", key, value, unit),
    }
}

/// Single overlay line with the enabled items, in configured order.
///
/// Enabled keys without a value show as `--`.
pub fn format_readings_line(readings: &Readings, enabled_items: &[String]) -> String {
    enabled_items
        .iter()
        .map(|key| match readings.values.get(key) {
            Some(value) => format_reading(key, *value),
            None => format!("{} {}", key, "--".dimmed()),
        })
        .collect::<Vec<_>>()
        .join(" │ ")
}

/// Format a reading timestamp in local time (HH:MM:SS)
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}
