// Sun Seat API v0.1
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod helpers;
mod routes;
mod services;

use config::AppConfig;
use routes::recommend::AppState;
use services::directions::{DirectionsClient, DirectionsConfig};
use services::solar::SolarCalculator;

/// Timeout for directions provider requests.
const DIRECTIONS_TIMEOUT_SECS: u64 = 10;

/// Sun Seat API — OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sun Seat API",
        version = "0.1.0",
        description = "Seat-level sun exposure recommendation API for car journeys. \
            Fetches a driving route, estimates solar position and UV along the path, \
            scores all four seats by accumulated sun exposure, and recommends the \
            shadiest one with a confidence tier and summary.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Solar", description = "Spot solar position and side scoring"),
        (name = "Recommendations", description = "Route-level seat recommendation"),
    ),
    paths(
        routes::health::health_check,
        routes::solar::sun_position,
        routes::solar::seat_score,
        routes::recommend::recommend,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::solar::SunPositionResponse,
            routes::solar::SeatScoreResponse,
            routes::recommend::RecommendRequest,
            routes::recommend::RecommendResponse,
            services::scorer::Seat,
            services::scorer::DriveSide,
            services::scorer::SeatScores,
            services::scorer::VehicleSide,
            services::recommendation::Confidence,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sun_seat_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Create the directions client with its credential injected up front
    let directions = DirectionsClient::new(DirectionsConfig {
        base_url: config.directions_base_url.clone(),
        api_key: config.maps_api_key.clone(),
        timeout_secs: DIRECTIONS_TIMEOUT_SECS,
    });

    // Build shared application state
    let app_state = AppState {
        directions,
        solar: SolarCalculator,
    };

    // CORS — read/score API, no credentials involved
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);

    // Build router
    // Solar routes use the calculator directly; the recommend route uses AppState.
    let solar_routes = Router::new()
        .route("/api/v1/sun-position", get(routes::solar::sun_position))
        .route("/api/v1/seat-score", get(routes::solar::seat_score))
        .with_state(SolarCalculator);

    let recommend_routes = Router::new()
        .route("/api/v1/recommend", post(routes::recommend::recommend))
        .with_state(app_state);

    let health_routes = Router::new().route("/api/v1/health", get(routes::health::health_check));

    let app = Router::new()
        .merge(health_routes)
        .merge(solar_routes)
        .merge(recommend_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
