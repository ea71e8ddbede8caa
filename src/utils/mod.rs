//! Common utilities and helpers

use std::time::Duration;

pub mod logging;
pub mod path;

/// Utility functions for vid2webp
pub struct Utils;

impl Utils {
    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        let milliseconds = duration.subsec_millis();

        if hours > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }

    /// Calculate progress percentage
    pub fn calculate_progress(current: usize, total: usize) -> f32 {
        if total == 0 {
            0.0
        } else {
            (current as f32 / total as f32) * 100.0
        }
    }

    /// Format seconds for the transcoder: shortest exact form, no trailing zeros
    pub fn format_seconds(seconds: f64) -> String {
        seconds.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(Utils::format_duration(Duration::from_millis(61_250)), "01:01.250");
        assert_eq!(Utils::format_duration(Duration::from_secs(3_725)), "01:02:05.000");
    }

    #[test]
    fn test_calculate_progress() {
        assert_eq!(Utils::calculate_progress(0, 0), 0.0);
        assert_eq!(Utils::calculate_progress(1, 4), 25.0);
        assert_eq!(Utils::calculate_progress(3, 3), 100.0);
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(Utils::format_seconds(2.0), "2");
        assert_eq!(Utils::format_seconds(2.5), "2.5");
        assert_eq!(Utils::format_seconds(0.125), "0.125");
        assert_eq!(Utils::format_seconds(10.0), "10");
        // No rounding: tiny positive values stay positive
        assert_eq!(Utils::format_seconds(0.0004), "0.0004");
        assert_eq!(Utils::format_seconds(1.23456), "1.23456");
    }
}
