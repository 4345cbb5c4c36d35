//! Time related utils.
//!
//! All signing happens in UTC. The formats here are the only ones that ever
//! appear on the wire.

use crate::{Error, Result};
use chrono::Utc;

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// TimeDelta is the alias for `chrono::TimeDelta`.
pub type TimeDelta = chrono::TimeDelta;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format time into ISO 8601 basic form: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Format time into http date: `Sun, 06 Nov 1994 08:49:37 GMT`
///
/// ## Note
///
/// HTTP date is slightly different from RFC2822.
///
/// - Timezone is fixed to GMT.
/// - Day must be 2 digit.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse http date like `Sun, 06 Nov 1994 08:49:37 GMT` into datetime.
pub fn parse_http_date(s: &str) -> Result<DateTime> {
    let t = chrono::DateTime::parse_from_rfc2822(s).map_err(|e| {
        Error::unexpected(format!("parse '{s}' as http date failed")).with_source(e)
    })?;
    Ok(t.with_timezone(&Utc))
}

/// Build datetime from unix seconds.
///
/// Returns `None` if the value is out of the representable range.
pub fn from_unix_seconds(secs: i64) -> Option<DateTime> {
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_time() -> DateTime {
        from_unix_seconds(1702743657).expect("must be valid")
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(test_time()), "20231216");
    }

    #[test]
    fn test_format_iso8601() {
        assert_eq!(format_iso8601(test_time()), "20231216T162057Z");
    }

    #[test]
    fn test_format_http_date() {
        assert_eq!(format_http_date(test_time()), "Sat, 16 Dec 2023 16:20:57 GMT");
    }

    #[test]
    fn test_http_date_pads_day() {
        let t = from_unix_seconds(1672542000).expect("must be valid");
        assert_eq!(format_http_date(t), "Sun, 01 Jan 2023 03:00:00 GMT");
    }

    #[test]
    fn test_parse_http_date() -> Result<()> {
        let t = parse_http_date("Wed, 28 Dec 2022 10:27:41 GMT")?;
        assert_eq!(t.timestamp(), 1672223261);
        assert_eq!(format_http_date(t), "Wed, 28 Dec 2022 10:27:41 GMT");
        Ok(())
    }

    #[test]
    fn test_parse_http_date_invalid() {
        assert!(parse_http_date("not a date").is_err());
    }
}
