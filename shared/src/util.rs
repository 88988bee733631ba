//! Small helpers shared by the form, the admin console and the exporter

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Taipei, the offset the order form was built for
pub const DEFAULT_DISPLAY_OFFSET_MINUTES: i32 = 480;

/// 获取当前 UTC 时间
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Build a display offset from minutes east of UTC, falling back to +08:00
pub fn display_offset(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.saturating_mul(60))
        .or_else(|| FixedOffset::east_opt(DEFAULT_DISPLAY_OFFSET_MINUTES * 60))
        .unwrap_or_else(|| Utc.fix())
}

/// Strip everything except ASCII digits
pub fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parse a form datetime into an instant.
///
/// Accepts RFC 3339 (`2024-05-01T10:00:00Z`, `...+08:00`) and the browser
/// `datetime-local` shape (`2024-05-01T10:00`, optional seconds with an
/// optional fraction, `T` or space), the latter interpreted in `offset`.
pub fn parse_local_datetime(text: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    const LOCAL_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    LOCAL_FORMATS.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(text, fmt).ok()?;
        offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

/// `YYYY/MM/DD HH:MM` in the display offset; missing instants render empty
pub fn format_display(instant: Option<&DateTime<Utc>>, offset: FixedOffset) -> String {
    instant
        .map(|dt| dt.with_timezone(&offset).format("%Y/%m/%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Inverse of the browser `datetime-local` input: `YYYY-MM-DDTHH:MM` in `offset`
pub fn to_local_input(instant: &DateTime<Utc>, offset: FixedOffset) -> String {
    instant
        .with_timezone(&offset)
        .format("%Y-%m-%dT%H:%M")
        .to_string()
}

/// Deserialize `null` as `T::default()`
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a timestamp column, treating null and unparseable text as absent
pub fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|text| {
        DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                // PostgREST may omit the `T` separator for timestamptz
                NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn taipei() -> FixedOffset {
        display_offset(DEFAULT_DISPLAY_OFFSET_MINUTES)
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("0912-345 678"), "0912345678");
        assert_eq!(digits_only("abc"), "");
        assert_eq!(digits_only("０9"), "9");
    }

    #[test]
    fn test_parse_datetime_local_uses_offset() {
        let dt = parse_local_datetime("2024-05-01T10:30", taipei()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T02:30:00+00:00");

        let with_seconds = parse_local_datetime("2024-05-01 10:30:15", taipei()).unwrap();
        assert_eq!(with_seconds.second(), 15);
    }

    #[test]
    fn test_parse_datetime_local_with_fraction() {
        let dt = parse_local_datetime("2024-05-01T10:30:00.000", taipei()).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T02:30:00+00:00");

        let dt = parse_local_datetime("2024-05-01 10:30:15.250", taipei()).unwrap();
        assert_eq!(dt.second(), 15);
        assert_eq!(dt.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_rfc3339_ignores_offset() {
        let dt = parse_local_datetime("2024-05-01T10:30:00Z", taipei()).unwrap();
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_local_datetime("", taipei()).is_none());
        assert!(parse_local_datetime("yesterday", taipei()).is_none());
        assert!(parse_local_datetime("2024-13-01T10:00", taipei()).is_none());
    }

    #[test]
    fn test_format_display() {
        let dt = parse_local_datetime("2024-05-01T02:05:00Z", taipei()).unwrap();
        assert_eq!(format_display(Some(&dt), taipei()), "2024/05/01 10:05");
        assert_eq!(format_display(None, taipei()), "");
        assert_eq!(to_local_input(&dt, taipei()), "2024-05-01T10:05");
    }

    #[test]
    fn test_display_offset_out_of_range_falls_back() {
        assert_eq!(display_offset(100_000), taipei());
        assert_eq!(display_offset(0).local_minus_utc(), 0);
    }

    #[test]
    fn test_lenient_datetime() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "lenient_datetime")]
            at: Option<DateTime<Utc>>,
        }

        let row: Row = serde_json::from_str(r#"{"at":"2024-05-01T02:05:00.123+00:00"}"#).unwrap();
        assert!(row.at.is_some());
        let row: Row = serde_json::from_str(r#"{"at":"2024-05-01 02:05:00"}"#).unwrap();
        assert!(row.at.is_some());
        let row: Row = serde_json::from_str(r#"{"at":"garbage"}"#).unwrap();
        assert!(row.at.is_none());
        let row: Row = serde_json::from_str(r#"{"at":null}"#).unwrap();
        assert!(row.at.is_none());
        let row: Row = serde_json::from_str("{}").unwrap();
        assert!(row.at.is_none());
    }
}
