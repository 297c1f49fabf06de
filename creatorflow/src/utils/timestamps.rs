//! Timestamp helpers.

use chrono::Utc;

/// Returns the current UTC time as an ISO 8601 formatted string.
///
/// The format is `YYYY-MM-DDTHH:MM:SS.mmmZ`, matching what the hosted record
/// store writes for `created_at` columns.
///
/// # Examples
///
/// ```
/// use creatorflow::utils::iso_timestamp;
///
/// let ts = iso_timestamp();
/// assert!(ts.contains('T'));
/// assert!(ts.ends_with('Z'));
/// ```
#[must_use]
pub fn iso_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Milliseconds since the Unix epoch, used in generated record identifiers.
#[must_use]
pub fn unix_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_iso_timestamp_parses_back() {
        let ts = iso_timestamp();
        let parsed = DateTime::parse_from_rfc3339(&ts).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_unix_millis_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(unix_millis() > 1_577_836_800_000);
    }
}
