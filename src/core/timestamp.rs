//! Civil-time decomposition and emission line formatting
//!
//! The emission line reproduces the legacy on-disk format byte for byte:
//! unpadded civil fields, nanosecond subseconds, a double tab before the
//! shard field, and a trailing newline. Readers that need a global order
//! across shards sort on this embedded timestamp.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Render one emission line:
/// `{Y}-{M}-{D} {h}:{m}:{s}.{ns}\t\tThread ID : {shard}\t{text}\n`
pub fn format_line(timestamp: &DateTime<Utc>, shard_id: usize, text: &str) -> String {
    format!(
        "{}-{}-{} {}:{}:{}.{}\t\tThread ID : {}\t{}\n",
        timestamp.year(),
        timestamp.month(),
        timestamp.day(),
        timestamp.hour(),
        timestamp.minute(),
        timestamp.second(),
        timestamp.nanosecond(),
        shard_id,
        text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::nanoseconds(123_456_789)
    }

    #[test]
    fn test_line_is_bit_exact() {
        let line = format_line(&fixed_datetime(), 3, "hello");
        assert_eq!(line, "2025-1-8 10:30:45.123456789\t\tThread ID : 3\thello\n");
    }

    #[test]
    fn test_fields_are_unpadded() {
        let ts = Utc
            .with_ymd_and_hms(2024, 12, 31, 4, 5, 6)
            .single()
            .expect("valid datetime")
            + chrono::Duration::nanoseconds(7);
        let line = format_line(&ts, 0, "x");
        assert_eq!(line, "2024-12-31 4:5:6.7\t\tThread ID : 0\tx\n");
    }

    #[test]
    fn test_text_field_is_fourth_tab_field() {
        let line = format_line(&fixed_datetime(), 12, "a b c");
        let text = line.trim_end_matches('\n').splitn(4, '\t').nth(3);
        assert_eq!(text, Some("a b c"));
    }
}
