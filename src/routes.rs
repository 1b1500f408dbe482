use std::{any::Any, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    BoxError, Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::error::ErrorResponse;
use crate::forecast::handlers as forecast_handlers;
use crate::openapi::openapi_json;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Build the weather API routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/current", get(weather_handlers::get_current_weather))
        .route("/forecast", get(forecast_handlers::get_forecast))
}

/// Build all routes, without middleware
///
/// Weather routes are served at the root and again under `/api/weather`,
/// which is where the dashboard frontend looks for them.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(weather_handlers::health))
        .route("/api/health", get(weather_handlers::health))
        .merge(weather_routes())
        .nest("/api/weather", weather_routes())
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(not_found)
}

/// Build the complete application with middleware and state applied
pub fn build_router(state: AppState) -> Router {
    with_middleware(api_routes(), state)
}

/// Wrap `routes` in the timeout, panic, CORS and trace layers
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let cors = cors_layer(&state.config);

    routes
        .layer(
            ServiceBuilder::new()
                // Handle timeout errors
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(timeout),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    match config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET]),
        Err(_) => {
            tracing::warn!(origin = %config.cors_origin, "Invalid CORS origin, cross-origin requests disabled");
            CorsLayer::new()
        }
    }
}

/// Handle request timeout errors
async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<ErrorResponse>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorResponse::new("Request timed out")),
        )
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Something went wrong!")),
        )
    }
}

/// Last-resort boundary: a panicking handler becomes a generic 500
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    tracing::error!(panic = %detail, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Something went wrong!")),
    )
        .into_response()
}

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}

