use axum::Json;
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::forecast::models::{DailyForecastEntry, ForecastResponse};
use crate::weather::models::{ConditionBlock, CurrentWeatherResponse, MainBlock, WindBlock};

/// OpenAPI documentation for the response and error schemas
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weatherdash API",
        version = "1.0.0",
        description = "Current weather and 5-day forecasts from OpenWeatherMap, reshaped for the Weather Dashboard frontend."
    ),
    tags(
        (name = "weather", description = "Current weather data"),
        (name = "forecast", description = "5-day forecast, one entry per day")
    ),
    components(
        schemas(
            ErrorResponse,
            CurrentWeatherResponse,
            ConditionBlock,
            MainBlock,
            WindBlock,
            ForecastResponse,
            DailyForecastEntry,
        )
    )
)]
pub struct ApiDoc;

/// Serve the generated OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
