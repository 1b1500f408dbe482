use axum::{extract::State, Json};
use serde::Serialize;

use super::models::CurrentWeatherResponse;
use super::service::WeatherError;
use crate::extractors::LocationQuery;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Health check endpoint. Never touches the upstream provider.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Weather Dashboard Backend is running",
    })
}

/// Get current weather for a city or coordinate pair
///
/// GET /current?city=London&units=metric
/// GET /current?lat=51.5&lon=-0.12
pub async fn get_current_weather(
    State(state): State<AppState>,
    query: LocationQuery,
) -> Result<Json<CurrentWeatherResponse>, WeatherError> {
    let weather = state.weather_service.get_current(&query).await?;
    Ok(Json(weather))
}
