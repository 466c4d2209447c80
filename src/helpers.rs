//! Shared numeric and time helpers.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Round to `dp` decimal places.
///
/// Non-finite inputs (NaN, ±Inf) round to 0 rather than poisoning every
/// downstream accumulation.
pub(crate) fn round_dp(v: f64, dp: i32) -> f64 {
    if !v.is_finite() {
        tracing::warn!("round_dp received non-finite value {}, defaulting to 0", v);
        return 0.0;
    }
    let factor = 10f64.powi(dp);
    (v * factor).round() / factor
}

/// Parse an ISO 8601 / RFC 3339 timestamp. Timestamps without an offset are
/// assumed UTC.
pub(crate) fn parse_utc_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return Ok(dt);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
    }
    Err(format!("not a valid ISO 8601 datetime: '{}'", s))
}
