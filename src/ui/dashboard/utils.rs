//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::controller::ConnectionState;
use crate::events::Source;
use ratatui::prelude::Color;

/// Get a ratatui color for an event based on where it came from
pub fn get_source_color(source: &Source) -> Color {
    match source {
        Source::Poller => Color::Cyan,
        Source::Dispatcher => Color::Yellow,
        Source::Controller => Color::LightBlue,
    }
}

/// Color for a device card, keyed on the lower-cased status phase.
pub fn status_color(status_class: &str) -> Color {
    match status_class {
        "completed" | "success" | "done" => Color::LightGreen,
        "error" | "failed" => Color::LightRed,
        "wiping" | "in_progress" | "running" => Color::LightYellow,
        "pending" | "wipe_pending" | "queued" => Color::Yellow,
        "idle" | "online" | "registered" | "ready" => Color::Cyan,
        _ => Color::Gray,
    }
}

pub fn connection_color(state: ConnectionState) -> Color {
    match state {
        ConnectionState::Disconnected => Color::LightRed,
        ConnectionState::Connecting => Color::LightYellow,
        ConnectionState::Connected => Color::LightGreen,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    if let Some((date_part, time_part)) = timestamp.split_once(' ') {
        if let (Some(month_day), Some(hour_min_sec)) = (date_part.get(5..10), time_part.get(0..8))
        {
            return format!("{} {}", month_day, hour_min_sec);
        }
    }
    timestamp.to_string()
}

/// Clean HTTP error messages
pub fn clean_http_error_message(msg: &str) -> String {
    if msg.contains("operation timed out") || msg.contains("TimedOut") {
        return msg
            .split_once(": ")
            .map(|(prefix, _)| format!("{}: request timed out", prefix))
            .unwrap_or_else(|| "Request timed out".to_string());
    }
    if msg.contains("error sending request") {
        return msg
            .split_once(": ")
            .map(|(prefix, _)| format!("{}: backend unreachable", prefix))
            .unwrap_or_else(|| "Backend unreachable".to_string());
    }
    msg.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_timestamp_keeps_month_day_and_time() {
        assert_eq!(
            format_compact_timestamp("2025-01-31 23:59:58"),
            "01-31 23:59:58"
        );
        assert_eq!(format_compact_timestamp("garbage"), "garbage");
    }

    #[test]
    fn unknown_phases_are_gray() {
        assert_eq!(status_color("completed"), Color::LightGreen);
        assert_eq!(status_color(""), Color::Gray);
        assert_eq!(status_color("exploded"), Color::Gray);
    }

    #[test]
    fn transport_errors_are_shortened() {
        let msg = "Could not fetch devices: error sending request for url (http://localhost:5000/api/devices)";
        assert_eq!(
            clean_http_error_message(msg),
            "Could not fetch devices: backend unreachable"
        );
        assert_eq!(
            clean_http_error_message("Could not fetch devices: HTTP 500"),
            "Could not fetch devices: HTTP 500"
        );
    }
}
