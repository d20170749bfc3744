use chrono::{DateTime, Local, NaiveDate};

pub const INVALID_DATE: &str = "Invalid date";

pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Format a millisecond offset as MM:SS (whole seconds, truncated)
pub fn format_clock(ms: f64) -> String {
    let total_seconds = (ms.max(0.0) / 1000.0).floor() as u64;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Local calendar date of an ISO-8601 timestamp, or "Invalid date"
pub fn format_start_date(start_time: &str) -> String {
    let trimmed = start_time.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.with_timezone(&Local).format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    INVALID_DATE.to_string()
}

/// Truncate to a display width, appending an ellipsis when shortened
pub fn truncate_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if unicode_width::UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10., 20., 30., 15., 22.]), Some(19.4));
        assert_eq!(mean(&[15., 7., 55., 12., 4.]), Some(18.6));
    }

    #[test]
    fn test_mean_empty_slice() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(999.9), "00:00");
        assert_eq!(format_clock(61_500.0), "01:01");
        assert_eq!(format_clock(3_599_000.0), "59:59");
        assert_eq!(format_clock(6_000_000.0), "100:00");
    }

    #[test]
    fn test_format_clock_negative_is_zero() {
        assert_eq!(format_clock(-500.0), "00:00");
    }

    #[test]
    fn test_format_start_date_invalid() {
        assert_eq!(format_start_date("not a date"), INVALID_DATE);
        assert_eq!(format_start_date(""), INVALID_DATE);
        assert_eq!(format_start_date("2024-13-45T00:00:00Z"), INVALID_DATE);
    }

    #[test]
    fn test_format_start_date_valid() {
        let formatted = format_start_date("2024-03-01T12:00:00.000Z");
        assert_ne!(formatted, INVALID_DATE);
        // noon UTC stays on the same or an adjacent day in any timezone
        assert!(
            ["2024-02-29", "2024-03-01", "2024-03-02"].contains(&formatted.as_str()),
            "unexpected {formatted}"
        );
        assert_eq!(format_start_date("2024-03-01"), "2024-03-01");
    }

    #[test]
    fn test_truncate_width() {
        assert_eq!(truncate_width("short", 10), "short");
        assert_eq!(truncate_width("abcdefghij", 5), "abcd…");
    }
}
