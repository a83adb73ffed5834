use chrono::{DateTime, FixedOffset};

/// Date/time text format of the wire contract (W3C, `Y-m-d\TH:i:sP`).
///
/// Clients parse this exact shape, e.g. `2024-01-31T12:00:00+01:00`.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Render a date/time value with [`DEFAULT_DATE_FORMAT`].
pub fn format_temporal(value: &DateTime<FixedOffset>) -> String {
    value.format(DEFAULT_DATE_FORMAT).to_string()
}
