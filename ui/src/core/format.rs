//! Formatting helpers for axis ticks and readouts.

use time::{macros::format_description, OffsetDateTime};

/// Tick label for the pre-data x axis, which counts minutes after the meal.
pub fn format_hours(minutes: f64) -> String {
    let hours = minutes / 60.0;
    if (hours - hours.round()).abs() < 1e-9 {
        format!("{}hr", hours.round() as i64)
    } else {
        format!("{hours:.1}hr")
    }
}

/// Tick label for a bound x axis, whose values are unix seconds.
pub fn format_clock(unix_seconds: f64) -> String {
    OffsetDateTime::from_unix_timestamp(unix_seconds.round() as i64)
        .ok()
        .and_then(|ts| ts.format(&format_description!("[hour]:[minute]")).ok())
        .unwrap_or_else(|| "—".to_string())
}

pub fn format_number(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}")
    } else {
        "—".to_string()
    }
}
