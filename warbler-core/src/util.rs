/// Convert a number of seconds to a string in the format "H:MM:SS".
/// If the number of hours is 0, it will be omitted. Negative and
/// non-finite inputs are treated as 0.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() {
        seconds.max(0.0) as u64
    } else {
        0
    };
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        // Test with hours
        assert_eq!(format_time(3661.0), "1:01:01");
        assert_eq!(format_time(7323.0), "2:02:03");
        assert_eq!(format_time(3600.0), "1:00:00");

        // Test without hours
        assert_eq!(format_time(61.0), "1:01");
        assert_eq!(format_time(123.9), "2:03");
        assert_eq!(format_time(210.0), "3:30");

        // Test edge cases
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(59.0), "0:59");
        assert_eq!(format_time(-4.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }
}
