//! Human readable time formatting

use std::time::Duration;

/// Render seconds as `mm:ss`. Minutes are zero-padded to two digits but not
/// capped, so long sessions read `125:05`.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Render an uptime as `1h 2m 3s`, dropping leading zero units
pub fn format_uptime(duration: Duration) -> String {
    let hours = duration.as_secs() / 3600;
    let minutes = (duration.as_secs() % 3600) / 60;
    let seconds = duration.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::{format_time, format_uptime};
    use std::time::Duration;

    #[test]
    fn pads_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(9), "00:09");
        assert_eq!(format_time(70), "01:10");
        assert_eq!(format_time(600), "10:00");
    }

    #[test]
    fn minutes_are_unbounded() {
        assert_eq!(format_time(125 * 60 + 5), "125:05");
    }

    #[test]
    fn session_totals_format() {
        // workout*reps + rest*(reps-1)
        let presets = [(30, 10, 8), (45, 60, 5), (20, 5, 1), (3599, 1, 3)];
        for (workout, rest, reps) in presets {
            let total: u64 = workout * reps + rest * (reps - 1);
            let rendered = format_time(total);
            let (mins, secs) = rendered.split_once(':').unwrap();
            assert!(mins.len() >= 2);
            assert_eq!(secs.len(), 2);
            assert_eq!(mins.parse::<u64>().unwrap() * 60 + secs.parse::<u64>().unwrap(), total);
        }
    }

    #[test]
    fn largest_preset_total_formats() {
        assert_eq!(format_time(6_000_000_001), "100000000:01");
        assert_eq!(format_time(u64::MAX), format!("{}:15", u64::MAX / 60));
    }

    #[test]
    fn uptime_units() {
        assert_eq!(format_uptime(Duration::from_secs(42)), "42s");
        assert_eq!(format_uptime(Duration::from_secs(61)), "1m 1s");
        assert_eq!(format_uptime(Duration::from_secs(3723)), "1h 2m 3s");
    }
}
