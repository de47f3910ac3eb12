//! HTTP surface: the weather API plus the client bundle as a catch-all.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use weather_core::{WeatherError, WeatherReport, WeatherService};

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: WeatherService,
}

/// Build the app router. Paths outside `/api` are served from `static_dir`,
/// falling back to its `index.html` so client-side routes resolve.
pub fn router(state: AppState, static_dir: &std::path::Path) -> Router {
    let client = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/api", get(api_root))
        .route("/api/weather/:zipcode", get(weather_for_zip))
        .fallback_service(client)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn api_root() -> Json<serde_json::Value> {
    Json(json!({ "message": "this message comes from GET at /api" }))
}

async fn weather_for_zip(
    State(state): State<AppState>,
    zipcode: Result<Path<String>, PathRejection>,
) -> Result<Json<WeatherReport>, ApiError> {
    // A segment that is not valid UTF-8 is just another malformed zip code.
    let Path(zipcode) =
        zipcode.map_err(|rejection| WeatherError::InvalidZipCode(rejection.body_text()))?;
    let report = state.service.report(&zipcode).await?;
    Ok(Json(report))
}

/// A [`WeatherError`] rendered as `{"error": "..."}` with a 400 or 500 status.
struct ApiError(WeatherError);

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            tracing::warn!("Rejected weather request: {}", self.0);
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!("Weather request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (status, Json(json!({ "error": self.0.public_message() }))).into_response()
    }
}
