//! Service-time parsing and formatting.

use crate::model::types::Time;

/// Parse `HH:MM:SS` into seconds since service midnight.
///
/// Hours may exceed 23 (service-day encoding), minutes and seconds must be
/// exactly two digits. Returns `None` on any malformed input.
pub fn parse_hms(text: &str) -> Option<Time> {
    let trimmed = text.trim();
    let mut parts = trimmed.split(':');
    let (h, m, s) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    if h.is_empty() || m.len() != 2 || s.len() != 2 {
        return None;
    }
    if ![h, m, s]
        .iter()
        .all(|p| p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }
    let h: Time = h.parse().ok()?;
    let m: Time = m.parse().ok()?;
    let s: Time = s.parse().ok()?;
    Some(h * 3600 + m * 60 + s)
}

/// Parse a query start time. Unlike feed rows, which are silently
/// discarded when malformed, a bad start time surfaces as an error.
pub fn parse_start_time(text: &str) -> Result<Time, crate::Error> {
    parse_hms(text).ok_or_else(|| crate::Error::MalformedTime(text.to_string()))
}

/// Format seconds since service midnight as `HH:MM`, truncating seconds.
pub fn format_hm(sec: Time) -> String {
    format!("{:02}:{:02}", sec / 3600, (sec % 3600) / 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_times() {
        assert_eq!(parse_hms("10:00:00"), Some(36000));
        assert_eq!(parse_hms("00:00:30"), Some(30));
        assert_eq!(parse_hms(" 13:05:09 "), Some(47109));
    }

    #[test]
    fn parses_service_day_overflow() {
        assert_eq!(parse_hms("25:30:00"), Some(91800));
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", "10:00", "10:0:00", "10:000:00", "ab:cd:ef", "10:+1:00", "10:00:00:00"] {
            assert_eq!(parse_hms(bad), None, "accepted {bad:?}");
        }
    }

    #[test]
    fn format_truncates_to_minutes() {
        assert_eq!(format_hm(36059), "10:00");
        assert_eq!(format_hm(91800), "25:30");
    }

    #[test]
    fn round_trip_to_minutes() {
        let sec = parse_hms("09:41:27").unwrap();
        assert_eq!(format_hm(sec), "09:41");
    }

    #[test]
    fn start_time_errors_surface() {
        assert_eq!(parse_start_time("10:00:00").unwrap(), 36000);
        assert!(matches!(
            parse_start_time("noon"),
            Err(crate::Error::MalformedTime(_))
        ));
    }
}
