use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

/// Countdown label as `m:ss`.
#[must_use]
pub fn format_countdown(seconds: u64) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("{minutes}:{remainder:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn countdown_pads_seconds() {
        assert_eq!(format_countdown(0), "0:00");
        assert_eq!(format_countdown(9), "0:09");
        assert_eq!(format_countdown(300), "5:00");
        assert_eq!(format_countdown(61), "1:01");
    }

    #[test]
    fn datetime_is_minute_precision() {
        let label = format_datetime(fixed_now());
        assert_eq!(label.len(), "2024-01-01 00:00".len());
    }
}
