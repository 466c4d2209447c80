//! Weather enrichment for route segments.
//!
//! Attaches a clear-sky UV estimate derived from solar elevation to each
//! segment (elevation 0° → UV 0, the 90° ceiling → UV 10). Cloud cover stays
//! at 0 until a real weather source is wired in. A failed solar lookup for a
//! segment falls back to a coarse time-of-day estimate instead of failing
//! the request — a transient data-provider outage must not abort the whole
//! recommendation.

use std::f64::consts::PI;

use chrono::{DateTime, Timelike, Utc};

use crate::helpers::round_dp;
use crate::services::directions::RouteSegment;
use crate::services::solar::{SolarError, SolarPositionProvider};

/// Solar elevation (degrees) that maps to one UV index unit.
const ELEVATION_PER_UV: f64 = 9.0;

/// Populate `uv_index` and `cloud_cover_pct` on each segment in place.
pub fn enrich_segments<P: SolarPositionProvider>(provider: &P, segments: &mut [RouteSegment]) {
    for seg in segments.iter_mut() {
        seg.uv_index = match provider.sun_position(seg.lat, seg.lng, seg.timestamp_utc) {
            Ok(sun) => round_dp(sun.elevation / ELEVATION_PER_UV, 2).max(0.0),
            Err(SolarError::Unavailable(reason)) => {
                tracing::warn!(
                    "Solar provider unavailable for segment at ({:.4}, {:.4}): {}; \
                     falling back to time-of-day UV estimate",
                    seg.lat,
                    seg.lng,
                    reason
                );
                estimate_uv_from_time(seg.timestamp_utc)
            }
            Err(SolarError::InvalidInput(reason)) => {
                // Segments come from decoded provider geometry, so this points
                // at malformed upstream data rather than a transient outage.
                tracing::warn!(
                    "Solar provider rejected segment at ({:.4}, {:.4}): {}; \
                     falling back to time-of-day UV estimate",
                    seg.lat,
                    seg.lng,
                    reason
                );
                estimate_uv_from_time(seg.timestamp_utc)
            }
        };
        seg.cloud_cover_pct = 0.0;
    }
}

/// Coarse UV estimate from the UTC hour alone: a bell curve over daylight
/// hours, zero outside 06–18, peaking at ~6 around 12 UTC.
fn estimate_uv_from_time(timestamp_utc: f64) -> f64 {
    let hour = match DateTime::<Utc>::from_timestamp(timestamp_utc as i64, 0) {
        Some(dt) => dt.hour(),
        None => return 0.0,
    };
    if (6..=18).contains(&hour) {
        round_dp(
            (6.0 * (PI * (f64::from(hour) - 6.0) / 12.0).sin()).max(0.0),
            2,
        )
    } else {
        0.0
    }
}
