//! Display-only formatting helpers.
//!
//! Pure numeric-to-string conversion for the CLI tables. All rounding is
//! confined to this module; model code never rounds.

/// Placeholder shown when a pace or time has no finite value.
const PLACEHOLDER: &str = "--:--";

/// Format a duration in seconds as `5s`, `3m 20s` or `1h 5m`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return PLACEHOLDER.to_string();
    }
    let total = seconds.round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Format a pace in seconds per kilometre as `m:ss`, e.g. `4:30`.
pub fn format_pace(seconds_per_km: f64) -> String {
    if !seconds_per_km.is_finite() || seconds_per_km <= 0.0 {
        return PLACEHOLDER.to_string();
    }
    let total = seconds_per_km.round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format power in watts to the nearest watt.
pub fn format_power(watts: f64) -> String {
    if !watts.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{:.0} W", watts)
}

/// Format a distance in metres, switching to kilometres past 1 km.
pub fn format_distance(meters: f64) -> String {
    if !meters.is_finite() || meters < 0.0 {
        return PLACEHOLDER.to_string();
    }
    if meters >= 1000.0 {
        format!("{:.2} km", meters / 1000.0)
    } else {
        format!("{:.0} m", meters)
    }
}

/// Format a speed in m/s with two decimals.
pub fn format_speed(meters_per_second: f64) -> String {
    if !meters_per_second.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{:.2} m/s", meters_per_second)
}
