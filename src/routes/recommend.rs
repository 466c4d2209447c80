//! Seat recommendation endpoint.
//!
//! POST /api/v1/recommend — the full pipeline:
//!   1. Fetch the driving route from the directions provider
//!   2. Convert it to time-stamped, headed segments
//!   3. Enrich each segment with a clear-sky UV estimate
//!   4. Score all four seats over the route
//!   5. Classify confidence and build the summary line

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, ErrorResponse};
use crate::helpers::parse_utc_datetime;
use crate::services::directions::{build_segments, DirectionsClient};
use crate::services::recommendation::{build_summary, compute_confidence, Confidence};
use crate::services::scorer::{score_seats, DriveSide, Seat, SeatScores};
use crate::services::solar::SolarCalculator;
use crate::services::weather::enrich_segments;

/// Shared application state for the recommendation endpoint.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) directions: DirectionsClient,
    pub(crate) solar: SolarCalculator,
}

fn default_vehicle_type() -> String {
    "sedan".to_string()
}

/// Recommendation request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecommendRequest {
    /// Origin address or "lat,lng"
    pub origin: String,
    /// Destination address or "lat,lng"
    pub destination: String,
    /// Departure time in ISO 8601 format; naive timestamps assumed UTC
    pub departure_time: String,
    /// LHD = driver front-left; RHD = driver front-right
    #[serde(default)]
    pub drive_side: DriveSide,
    /// Vehicle type (informational only, not used in scoring)
    #[serde(default = "default_vehicle_type")]
    pub vehicle_type: String,
}

/// Recommendation response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendResponse {
    /// Seat with the lowest accumulated exposure (shadiest)
    pub best_seat: Seat,
    /// Seat with the highest accumulated exposure (sunniest)
    pub worst_seat: Seat,
    /// Driver's seat for the requested drive side
    pub driver_seat: Seat,
    /// Accumulated exposure score per seat
    pub scores: SeatScores,
    /// How clear-cut the recommendation is
    pub confidence: Confidence,
    /// Human-readable recommendation line
    pub summary: String,
}

/// Recommend the shadiest seat for a journey.
#[utoipa::path(
    post,
    path = "/api/v1/recommend",
    tag = "Recommendations",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Seat recommendation with per-seat scores", body = RecommendResponse),
        (status = 400, description = "Invalid input or unresolvable origin/destination", body = ErrorResponse),
        (status = 422, description = "Route produced no drivable segments", body = ErrorResponse),
        (status = 502, description = "Directions provider unavailable or returned bad data", body = ErrorResponse),
    )
)]
pub async fn recommend(
    State(state): State<AppState>,
    Json(body): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    if body.origin.trim().is_empty() {
        return Err(AppError::BadRequest("origin must not be empty".to_string()));
    }
    if body.destination.trim().is_empty() {
        return Err(AppError::BadRequest(
            "destination must not be empty".to_string(),
        ));
    }
    let departure = parse_utc_datetime(&body.departure_time)
        .map_err(|e| AppError::BadRequest(format!("Invalid departure_time: {}", e)))?;

    tracing::info!(
        "Recommendation requested: {} → {} departing {} ({:?}, {})",
        body.origin,
        body.destination,
        departure,
        body.drive_side,
        body.vehicle_type
    );

    let route = state
        .directions
        .fetch_route(&body.origin, &body.destination, departure.timestamp())
        .await?;

    let mut segments = build_segments(&route, departure.timestamp() as f64)?;
    if segments.is_empty() {
        return Err(AppError::UnusableRoute(
            "The route produced no drivable segments. Check origin and destination.".to_string(),
        ));
    }

    enrich_segments(&state.solar, &mut segments);

    let scored = score_seats(&state.solar, &segments, body.drive_side);
    let confidence = compute_confidence(&segments, &scored.scores);
    let summary = build_summary(scored.best_seat, scored.worst_seat, &scored.scores, &segments);

    tracing::debug!(
        "Scored {} segments: best={:?} worst={:?} confidence={:?}",
        segments.len(),
        scored.best_seat,
        scored.worst_seat,
        confidence
    );

    Ok(Json(RecommendResponse {
        best_seat: scored.best_seat,
        worst_seat: scored.worst_seat,
        driver_seat: scored.driver_seat,
        scores: scored.scores,
        confidence,
        summary,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::directions::DirectionsConfig;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Reference polyline: (38.5, -120.2) → (40.7, -120.95) → (43.252, -126.453).
    // At longitude ≈ -120° solar noon falls around 20:00 UTC.
    const REFERENCE_POLYLINE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn directions_json(polyline: &str) -> serde_json::Value {
        serde_json::json!({
            "status": "OK",
            "routes": [{
                "legs": [{
                    "steps": [{
                        "duration": { "value": 1800.0 },
                        "polyline": { "points": polyline },
                        "start_location": { "lat": 38.5, "lng": -120.2 },
                        "end_location": { "lat": 43.252, "lng": -126.453 }
                    }]
                }]
            }]
        })
    }

    async fn state_for(server: &MockServer) -> AppState {
        AppState {
            directions: DirectionsClient::new(DirectionsConfig {
                base_url: format!("{}/maps/api/directions/json", server.uri()),
                api_key: "test-key".to_string(),
                timeout_secs: 5,
            }),
            solar: SolarCalculator,
        }
    }

    fn request(departure_time: &str) -> RecommendRequest {
        RecommendRequest {
            origin: "Placerville, CA".to_string(),
            destination: "Eureka, CA".to_string(),
            departure_time: departure_time.to_string(),
            drive_side: DriveSide::default(),
            vehicle_type: default_vehicle_type(),
        }
    }

    #[tokio::test]
    async fn test_midday_route_scores_and_recommends() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(directions_json(REFERENCE_POLYLINE)),
            )
            .mount(&server)
            .await;

        // Local solar noon: high southern sun on a roughly northwest-bound
        // route, so the left side takes the exposure.
        let response = recommend(
            State(state_for(&server).await),
            Json(request("2024-06-21T20:00:00Z")),
        )
        .await
        .unwrap();

        assert!(response.scores.total() > 0.0);
        assert!(matches!(
            response.best_seat,
            Seat::FrontRight | Seat::RearRight
        ));
        assert!(matches!(
            response.worst_seat,
            Seat::FrontLeft | Seat::RearLeft
        ));
        assert_eq!(response.driver_seat, Seat::FrontLeft);
        assert!(!response.summary.is_empty());
    }

    #[tokio::test]
    async fn test_night_route_all_zero_and_low_confidence() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(directions_json(REFERENCE_POLYLINE)),
            )
            .mount(&server)
            .await;

        // 08:00 UTC is the middle of the night at longitude -120°.
        let response = recommend(
            State(state_for(&server).await),
            Json(request("2024-06-21T08:00:00Z")),
        )
        .await
        .unwrap();

        for seat in Seat::ALL {
            assert_eq!(response.scores.get(seat), 0.0);
        }
        assert_eq!(response.confidence, Confidence::Low);
        assert!(response
            .summary
            .to_lowercase()
            .contains("no significant difference"));
    }

    #[tokio::test]
    async fn test_zero_results_maps_to_bad_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ZERO_RESULTS",
                "routes": []
            })))
            .mount(&server)
            .await;

        let err = recommend(
            State(state_for(&server).await),
            Json(request("2024-06-21T20:00:00Z")),
        )
        .await
        .unwrap_err();

        match err {
            AppError::BadRequest(msg) => assert!(msg.contains("ZERO_RESULTS"), "{}", msg),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_request_denied_maps_to_external_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "REQUEST_DENIED",
                "error_message": "API key invalid."
            })))
            .mount(&server)
            .await;

        let err = recommend(
            State(state_for(&server).await),
            Json(request("2024-06-21T20:00:00Z")),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_route_with_no_legs_is_unusable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "routes": [{ "legs": [] }]
            })))
            .mount(&server)
            .await;

        let err = recommend(
            State(state_for(&server).await),
            Json(request("2024-06-21T20:00:00Z")),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::UnusableRoute(_)));
    }

    #[tokio::test]
    async fn test_empty_origin_rejected_without_provider_call() {
        let server = MockServer::start().await;
        let mut body = request("2024-06-21T20:00:00Z");
        body.origin = "  ".to_string();

        let err = recommend(State(state_for(&server).await), Json(body))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_invalid_departure_time_rejected() {
        let server = MockServer::start().await;
        let err = recommend(
            State(state_for(&server).await),
            Json(request("next tuesday")),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
