use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::directions::DirectionsError;
use crate::services::polyline::PolylineError;
use crate::services::solar::SolarError;

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unusable route: {0}")]
    UnusableRoute(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::UnusableRoute(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::ExternalServiceError(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
        };

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<DirectionsError> for AppError {
    fn from(err: DirectionsError) -> Self {
        match &err {
            // Unresolvable input is the caller's problem.
            DirectionsError::NoRoute(_) => AppError::BadRequest(err.to_string()),
            DirectionsError::Provider(_) | DirectionsError::Transport(_) => {
                tracing::error!("Directions provider failure: {}", err);
                AppError::ExternalServiceError(err.to_string())
            }
        }
    }
}

impl From<PolylineError> for AppError {
    fn from(err: PolylineError) -> Self {
        // Malformed geometry from a trusted provider is a contract violation,
        // not a client problem.
        tracing::error!("Route geometry decoding failure: {}", err);
        AppError::ExternalServiceError(format!("route geometry could not be decoded: {}", err))
    }
}

impl From<SolarError> for AppError {
    fn from(err: SolarError) -> Self {
        match &err {
            SolarError::InvalidInput(_) => AppError::BadRequest(err.to_string()),
            SolarError::Unavailable(_) => AppError::ExternalServiceError(err.to_string()),
        }
    }
}
