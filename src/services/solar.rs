//! Solar position provider.
//!
//! `SolarPositionProvider` is the seam between the exposure pipeline and
//! whatever source supplies sun angles. The bundled `SolarCalculator`
//! computes them locally from standard astronomical formulas (day-of-year
//! declination, equation of time, hour angle), so no network round trip is
//! needed per segment.

use chrono::{DateTime, Datelike, Timelike, Utc};
use thiserror::Error;

use crate::helpers::round_dp;

/// Closed error classification for solar position lookups.
#[derive(Debug, Error)]
pub enum SolarError {
    #[error("invalid input for solar position: {0}")]
    InvalidInput(String),

    /// Produced by network-backed providers. The bundled astronomical
    /// calculator never constructs it.
    #[allow(dead_code)]
    #[error("solar position unavailable: {0}")]
    Unavailable(String),
}

/// Sun angles as seen from a point at an instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// Degrees clockwise from north, [0, 360).
    pub azimuth: f64,
    /// Degrees above the horizon; negative means below (night).
    pub elevation: f64,
}

/// Source of sun angles for a (lat, lng, time) query.
///
/// Results are produced fresh per query — nothing is cached or persisted.
pub trait SolarPositionProvider {
    fn sun_position(
        &self,
        lat: f64,
        lng: f64,
        timestamp_utc: f64,
    ) -> Result<SunPosition, SolarError>;
}

/// Local astronomical implementation of [`SolarPositionProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarCalculator;

const EARTH_AXIAL_TILT: f64 = 23.45;
const DEGREES_PER_HOUR: f64 = 15.0;

impl SolarPositionProvider for SolarCalculator {
    fn sun_position(
        &self,
        lat: f64,
        lng: f64,
        timestamp_utc: f64,
    ) -> Result<SunPosition, SolarError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(SolarError::InvalidInput(format!(
                "latitude {} outside [-90, 90]",
                lat
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(SolarError::InvalidInput(format!(
                "longitude {} outside [-180, 180]",
                lng
            )));
        }
        if !timestamp_utc.is_finite() {
            return Err(SolarError::InvalidInput(format!(
                "timestamp {} is not finite",
                timestamp_utc
            )));
        }
        let when = DateTime::<Utc>::from_timestamp(timestamp_utc as i64, 0).ok_or_else(|| {
            SolarError::InvalidInput(format!("timestamp {} out of range", timestamp_utc))
        })?;

        let utc_hours =
            f64::from(when.hour()) + f64::from(when.minute()) / 60.0 + f64::from(when.second()) / 3600.0;
        let n = when.ordinal() as i32;

        let eot = equation_of_time(n);
        let decl = solar_declination(n);

        // Local solar time: longitude correction (4 min per degree) plus the
        // equation of time, both in minutes.
        let correction_hours = (4.0 * lng + eot) / 60.0;
        let local_solar_time = (utc_hours + correction_hours).rem_euclid(24.0);
        let hour_angle = DEGREES_PER_HOUR * (local_solar_time - 12.0);

        let lat_rad = lat.to_radians();
        let decl_rad = decl.to_radians();
        let ha_rad = hour_angle.to_radians();

        let cos_zenith =
            lat_rad.sin() * decl_rad.sin() + lat_rad.cos() * decl_rad.cos() * ha_rad.cos();
        let zenith = cos_zenith.clamp(-1.0, 1.0).acos().to_degrees();
        let elevation = 90.0 - zenith;

        let sin_az = -decl_rad.cos() * ha_rad.sin();
        let cos_az = decl_rad.sin() * lat_rad.cos() - decl_rad.cos() * lat_rad.sin() * ha_rad.cos();
        let azimuth = sin_az.atan2(cos_az).to_degrees().rem_euclid(360.0);

        Ok(SunPosition {
            azimuth: round_dp(azimuth, 4),
            elevation: round_dp(elevation, 4),
        })
    }
}

/// Equation of time in minutes for day-of-year `n` (Spencer's Fourier fit).
fn equation_of_time(n: i32) -> f64 {
    let b = ((n - 1) as f64 * (360.0 / 365.0)).to_radians();
    229.18
        * (0.000075 + 0.001868 * b.cos() - 0.032077 * b.sin()
            - 0.014615 * (2.0 * b).cos()
            - 0.040849 * (2.0 * b).sin())
}

/// Solar declination in degrees for day-of-year `n`.
fn solar_declination(n: i32) -> f64 {
    EARTH_AXIAL_TILT * (360.0 * ((284 + n) as f64 / 365.0)).to_radians().sin()
}
