//! Spot solar endpoints.
//!
//! - GET /api/v1/sun-position?lat&lng[&datetime]
//! - GET /api/v1/seat-score?lat&lng&heading[&datetime]
//!
//! Single-point lookups, independent of any route: where the sun is, and
//! which side of a vehicle it would hit for a given heading.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::helpers::parse_utc_datetime;
use crate::services::scorer::{side_score, VehicleSide};
use crate::services::solar::{SolarCalculator, SolarPositionProvider};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SunPositionQuery {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
    /// ISO 8601 datetime (UTC); defaults to now
    pub datetime: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SeatScoreQuery {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
    /// Vehicle heading in degrees (0 = north, clockwise)
    pub heading: f64,
    /// ISO 8601 datetime (UTC); defaults to now
    pub datetime: Option<String>,
}

/// Sun angles at a point and time.
#[derive(Debug, Serialize, ToSchema)]
pub struct SunPositionResponse {
    /// Degrees clockwise from north (0–360)
    pub azimuth: f64,
    /// Degrees above the horizon; negative below
    pub elevation: f64,
}

/// Single-instant side score with the solar position that produced it.
#[derive(Debug, Serialize, ToSchema)]
pub struct SeatScoreResponse {
    pub azimuth: f64,
    pub elevation: f64,
    /// Side of the vehicle the sun is hitting
    pub sunny_side: VehicleSide,
    pub shaded_side: VehicleSide,
    /// 0–1, peaking when the sun is square abeam
    pub intensity: f64,
}

fn resolve_datetime(datetime: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    match datetime {
        Some(s) => parse_utc_datetime(s)
            .map_err(|e| AppError::BadRequest(format!("Invalid datetime: {}", e))),
        None => Ok(Utc::now()),
    }
}

/// Get the sun's azimuth and elevation for a location and time.
#[utoipa::path(
    get,
    path = "/api/v1/sun-position",
    tag = "Solar",
    params(SunPositionQuery),
    responses(
        (status = 200, description = "Solar position at the requested point and time", body = SunPositionResponse),
        (status = 400, description = "Invalid coordinates or datetime", body = ErrorResponse),
    )
)]
pub async fn sun_position(
    State(calculator): State<SolarCalculator>,
    Query(params): Query<SunPositionQuery>,
) -> Result<Json<SunPositionResponse>, AppError> {
    let when = resolve_datetime(params.datetime.as_deref())?;
    let sun = calculator.sun_position(params.lat, params.lng, when.timestamp() as f64)?;

    Ok(Json(SunPositionResponse {
        azimuth: sun.azimuth,
        elevation: sun.elevation,
    }))
}

/// Score which side of a vehicle the sun hits at a single point and heading.
#[utoipa::path(
    get,
    path = "/api/v1/seat-score",
    tag = "Solar",
    params(SeatScoreQuery),
    responses(
        (status = 200, description = "Sunnier side and intensity for the given heading", body = SeatScoreResponse),
        (status = 400, description = "Invalid coordinates or datetime", body = ErrorResponse),
    )
)]
pub async fn seat_score(
    State(calculator): State<SolarCalculator>,
    Query(params): Query<SeatScoreQuery>,
) -> Result<Json<SeatScoreResponse>, AppError> {
    let when = resolve_datetime(params.datetime.as_deref())?;
    let sun = calculator.sun_position(params.lat, params.lng, when.timestamp() as f64)?;
    let score = side_score(sun.azimuth, params.heading);

    Ok(Json(SeatScoreResponse {
        azimuth: sun.azimuth,
        elevation: sun.elevation,
        sunny_side: score.sunny_side,
        shaded_side: score.shaded_side,
        intensity: score.intensity,
    }))
}
