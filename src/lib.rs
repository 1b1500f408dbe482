//! Weather Dashboard backend: a thin proxy over OpenWeatherMap that reshapes
//! current weather and 5-day forecasts into a small JSON contract.

pub mod config;
pub mod error;
pub mod extractors;
pub mod forecast;
pub mod openapi;
pub mod openweather;
pub mod routes;
pub mod weather;

use std::sync::Arc;

use reqwest::Client;

use crate::config::AppConfig;
use crate::forecast::ForecastService;
use crate::openweather::OpenWeatherClient;
use crate::weather::WeatherService;

pub use crate::routes::build_router;

#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
    pub forecast_service: Arc<ForecastService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire up services around one shared HTTP client
    pub fn new(http_client: Client, config: AppConfig) -> Self {
        let upstream = OpenWeatherClient::new(
            http_client,
            &config.openweathermap_base_url,
            &config.openweathermap_api_key,
        );

        Self {
            weather_service: Arc::new(WeatherService::new(upstream.clone())),
            forecast_service: Arc::new(ForecastService::new(upstream, config.tz())),
            config: Arc::new(config),
        }
    }
}
