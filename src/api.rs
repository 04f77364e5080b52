//! HTTP surface: routes, handlers, and response envelopes

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::WeathervaneError;
use crate::forecast::ForecastService;
use crate::models::{ClientForecast, ForecastQuery};

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ForecastService>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/forecast", get(get_forecast))
        .with_state(state)
}

/// Success envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub message: String,
    pub data: ClientForecast,
}

/// Failure envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Liveness probe
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}

/// The forecast endpoint; all real work happens in the service
async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, WeathervaneError> {
    let data = state.service.forecast(&query).await?;
    Ok(Json(ForecastResponse {
        message: "Forecast fetched successfully".to_string(),
        data,
    }))
}

impl IntoResponse for WeathervaneError {
    fn into_response(self) -> Response {
        let status = match &self {
            WeathervaneError::InvalidParameters { .. } => StatusCode::BAD_REQUEST,
            WeathervaneError::LocationNotFound => StatusCode::NOT_FOUND,
            WeathervaneError::Geocoding { .. }
            | WeathervaneError::Connection { .. }
            | WeathervaneError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            WeathervaneError::MalformedResponse { .. }
            | WeathervaneError::Cache { .. }
            | WeathervaneError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            WeathervaneError::InvalidParameters { .. } => "Invalid parameters",
            _ => "Fetching failed",
        };

        let body = ErrorResponse {
            message: message.to_string(),
            errors: self.user_messages(),
        };

        (status, Json(body)).into_response()
    }
}
