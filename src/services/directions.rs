//! Directions provider client and route segmentation.
//!
//! Fetches driving routes from a Google-Directions-compatible endpoint and
//! converts them into time-stamped, headed segments for exposure scoring.
//! The API key and base URL are injected at construction — the client never
//! reads the process environment itself.

use serde::Deserialize;

use crate::services::geo::{bearing, GeoPoint};
use crate::services::polyline::{decode_polyline, PolylineError};

/// Configuration for the directions client.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// Full endpoint URL, e.g. `https://maps.googleapis.com/maps/api/directions/json`.
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

/// Errors from the directions provider, classified so the HTTP boundary can
/// distinguish bad input (4xx) from upstream failure (5xx).
#[derive(Debug, thiserror::Error)]
pub enum DirectionsError {
    /// The provider could not produce a route for this input
    /// (unknown address, no drivable connection, malformed request).
    #[error("directions lookup failed: {0}")]
    NoRoute(String),

    /// The provider refused or failed the request (authorization, quota,
    /// internal provider error).
    #[error("directions provider error: {0}")]
    Provider(String),

    #[error("directions request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client for a Directions-style routing API.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    client: reqwest::Client,
    config: DirectionsConfig,
}

// --- Directions JSON response types ---

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

/// A single route alternative returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub legs: Vec<RouteLeg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteLeg {
    #[serde(default)]
    pub steps: Vec<RouteStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteStep {
    pub duration: StepDuration,
    pub polyline: StepPolyline,
    pub start_location: Coordinate,
    pub end_location: Coordinate,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StepDuration {
    /// Step travel time in seconds.
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StepPolyline {
    pub points: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl DirectionsClient {
    pub fn new(config: DirectionsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");
        Self { client, config }
    }

    /// Fetch the preferred route between two points.
    ///
    /// `origin` and `destination` are addresses or `"lat,lng"` strings;
    /// `departure_ts` is seconds since epoch (UTC). Single attempt, bounded
    /// timeout — retries, if any, belong to a higher layer.
    pub async fn fetch_route(
        &self,
        origin: &str,
        destination: &str,
        departure_ts: i64,
    ) -> Result<DirectionsRoute, DirectionsError> {
        let departure = departure_ts.to_string();
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("departure_time", departure.as_str()),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: DirectionsResponse = response.json().await?;
        classify_status(&body.status, body.error_message.as_deref())?;

        body.routes
            .into_iter()
            .next()
            .ok_or_else(|| DirectionsError::NoRoute("provider returned no routes".to_string()))
    }
}

/// Map a provider status string onto the error classification.
fn classify_status(status: &str, error_message: Option<&str>) -> Result<(), DirectionsError> {
    if status == "OK" {
        return Ok(());
    }
    let detail = format!("{} — {}", status, error_message.unwrap_or("no details"));
    match status {
        "NOT_FOUND" | "ZERO_RESULTS" | "INVALID_REQUEST" | "MAX_WAYPOINTS_EXCEEDED"
        | "MAX_ROUTE_LENGTH_EXCEEDED" => Err(DirectionsError::NoRoute(detail)),
        _ => Err(DirectionsError::Provider(detail)),
    }
}

/// A single time-stamped point along the route with travel heading and
/// environmental readings. The unit the exposure pipeline operates on.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    pub lat: f64,
    pub lng: f64,
    /// Seconds since epoch (UTC) when the vehicle is expected at this point.
    pub timestamp_utc: f64,
    /// Travel direction toward the next point, degrees clockwise from north.
    pub heading_degrees: f64,
    /// Zero until populated by the weather enricher.
    pub uv_index: f64,
    /// Zero until populated by the weather enricher.
    pub cloud_cover_pct: f64,
}

/// Convert a fetched route into an ordered segment sequence.
///
/// Pure function — no I/O. Each step's duration is spread evenly across its
/// decoded point pairs; a step whose polyline decodes to fewer than two
/// points falls back to a single degenerate segment headed from the step's
/// start toward its end. Segment order across steps and legs is the mapping
/// from route geometry to wall-clock time and is preserved exactly.
pub fn build_segments(
    route: &DirectionsRoute,
    departure_ts: f64,
) -> Result<Vec<RouteSegment>, PolylineError> {
    let mut segments = Vec::new();
    let mut elapsed = 0.0;

    for leg in &route.legs {
        for step in &leg.steps {
            let duration = step.duration.value;
            let points = decode_polyline(&step.polyline.points)?;

            if points.len() < 2 {
                let anchor = points.first().copied().unwrap_or(GeoPoint {
                    lat: step.start_location.lat,
                    lng: step.start_location.lng,
                });
                let heading = bearing(
                    GeoPoint {
                        lat: step.start_location.lat,
                        lng: step.start_location.lng,
                    },
                    GeoPoint {
                        lat: step.end_location.lat,
                        lng: step.end_location.lng,
                    },
                );
                segments.push(make_segment(anchor, departure_ts + elapsed, heading));
                elapsed += duration;
                continue;
            }

            let time_per_sub = duration / (points.len() - 1) as f64;
            for pair in points.windows(2) {
                let heading = bearing(pair[0], pair[1]);
                segments.push(make_segment(pair[0], departure_ts + elapsed, heading));
                elapsed += time_per_sub;
            }
        }
    }

    Ok(segments)
}

fn make_segment(point: GeoPoint, timestamp_utc: f64, heading_degrees: f64) -> RouteSegment {
    RouteSegment {
        lat: point.lat,
        lng: point.lng,
        timestamp_utc,
        heading_degrees,
        uv_index: 0.0,
        cloud_cover_pct: 0.0,
    }
}
