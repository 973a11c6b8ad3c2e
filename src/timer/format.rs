//! `mm:ss` display formatting

/// Format a second count as `mm:ss`.
///
/// The sign is dropped, so `-65` renders the same as `65`. Minutes are not
/// wrapped into hours; `6000` renders as `100:00`.
pub fn format_mm_ss(seconds: i64) -> String {
    let total = seconds.unsigned_abs();
    format_remaining(total)
}

/// Format an unsigned remaining-time count as `mm:ss`
pub fn format_remaining(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_all_zeros() {
        assert_eq!(format_mm_ss(0), "00:00");
    }

    #[test]
    fn pads_minutes_and_seconds() {
        assert_eq!(format_mm_ss(65), "01:05");
        assert_eq!(format_mm_ss(9), "00:09");
        assert_eq!(format_mm_ss(600), "10:00");
    }

    #[test]
    fn negative_uses_absolute_value() {
        assert_eq!(format_mm_ss(-65), "01:05");
        assert_eq!(format_mm_ss(-1), "00:01");
    }

    #[test]
    fn minutes_are_not_wrapped() {
        assert_eq!(format_mm_ss(6000), "100:00");
    }
}
