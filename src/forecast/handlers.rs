use axum::{extract::State, Json};

use super::models::ForecastResponse;
use super::service::ForecastError;
use crate::extractors::LocationQuery;
use crate::AppState;

/// Get the 5-day forecast, one entry per day
///
/// GET /forecast?city=London&units=metric
/// GET /forecast?lat=51.5&lon=-0.12&units=imperial
pub async fn get_forecast(
    State(state): State<AppState>,
    query: LocationQuery,
) -> Result<Json<ForecastResponse>, ForecastError> {
    let forecast = state.forecast_service.get_forecast(&query).await?;
    Ok(Json(forecast))
}
