use axum::http::StatusCode;
use thiserror::Error;

use super::models::*;
use crate::error::HttpError;
use crate::extractors::{Location, LocationQuery};
use crate::impl_into_response;
use crate::openweather::{icon_url, round_temp, OpenWeatherClient, UpstreamError, CURRENT_WEATHER_PATH};

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("OpenWeatherMap rejected the configured API key")]
    InvalidApiKey,

    #[error("Failed to fetch current weather")]
    Upstream(#[source] UpstreamError),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl WeatherError {
    fn from_upstream(err: UpstreamError, location: &Location) -> Self {
        match err {
            UpstreamError::NotFound => Self::LocationNotFound(location.to_string()),
            UpstreamError::Unauthorized => Self::InvalidApiKey,
            other => Self::Upstream(other),
        }
    }
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::LocationNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidApiKey => StatusCode::UNAUTHORIZED,
            Self::Upstream(_) | Self::InvalidResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::LocationNotFound(_) => "Location not found",
            Self::InvalidApiKey => "Invalid API key",
            Self::Upstream(_) | Self::InvalidResponse(_) => "Failed to fetch current weather",
        }
        .to_string()
    }

    fn log_context(&self) -> &'static str {
        "Weather API error"
    }
}

impl_into_response!(WeatherError);

pub struct WeatherService {
    client: OpenWeatherClient,
}

impl WeatherService {
    pub fn new(client: OpenWeatherClient) -> Self {
        Self { client }
    }

    pub async fn get_current(
        &self,
        query: &LocationQuery,
    ) -> Result<CurrentWeatherResponse, WeatherError> {
        let data: OpenWeatherMapResponse = self
            .client
            .fetch(CURRENT_WEATHER_PATH, query)
            .await
            .map_err(|e| WeatherError::from_upstream(e, &query.location))?;

        let weather = transform_response(data, &query.location)?;

        tracing::info!(
            location = %weather.location,
            temp = weather.main.temp,
            "Current weather fetched successfully"
        );

        Ok(weather)
    }
}

/// Reshape the upstream payload into the frontend contract
fn transform_response(
    data: OpenWeatherMapResponse,
    location: &Location,
) -> Result<CurrentWeatherResponse, WeatherError> {
    let condition = data.weather.into_iter().next().ok_or_else(|| {
        WeatherError::InvalidResponse("No weather information available".to_string())
    })?;

    Ok(CurrentWeatherResponse {
        location: data
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| location.to_string()),
        country: data.sys.country,
        weather: ConditionBlock {
            main: condition.main,
            description: condition.description,
            icon: icon_url(&condition.icon),
        },
        main: MainBlock {
            temp: round_temp(data.main.temp),
            feels_like: round_temp(data.main.feels_like),
            temp_min: round_temp(data.main.temp_min),
            temp_max: round_temp(data.main.temp_max),
            pressure: data.main.pressure,
            humidity: data.main.humidity,
        },
        wind: WindBlock {
            speed: data.wind.speed,
            direction: data.wind.deg,
        },
        visibility: data.visibility,
        timestamp: data.dt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_response(name: Option<&str>) -> OpenWeatherMapResponse {
        OpenWeatherMapResponse {
            name: name.map(String::from),
            sys: SysInfo {
                country: Some("GB".to_string()),
            },
            weather: vec![WeatherCondition {
                main: "Clouds".to_string(),
                description: "broken clouds".to_string(),
                icon: "04d".to_string(),
            }],
            main: MainInfo {
                temp: 15.6,
                feels_like: 14.5,
                temp_min: 13.2,
                temp_max: 17.49,
                pressure: 1012,
                humidity: 72,
            },
            wind: WindInfo {
                speed: 4.12,
                deg: Some(250),
            },
            visibility: Some(10000),
            dt: 1_700_000_000,
        }
    }

    fn london() -> Location {
        Location::City("London".to_string())
    }

    #[test]
    fn test_transform_rounds_temperatures() {
        let result = transform_response(create_test_response(Some("London")), &london()).unwrap();

        assert_eq!(result.main.temp, 16);
        assert_eq!(result.main.feels_like, 15);
        assert_eq!(result.main.temp_min, 13);
        assert_eq!(result.main.temp_max, 17);
    }

    #[test]
    fn test_transform_passes_other_numbers_through() {
        let result = transform_response(create_test_response(Some("London")), &london()).unwrap();

        assert_eq!(result.main.pressure, 1012);
        assert_eq!(result.main.humidity, 72);
        assert_eq!(result.wind.speed, 4.12);
        assert_eq!(result.wind.direction, Some(250));
        assert_eq!(result.visibility, Some(10000));
        assert_eq!(result.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_transform_builds_icon_url() {
        let result = transform_response(create_test_response(Some("London")), &london()).unwrap();

        assert_eq!(
            result.weather.icon,
            "https://openweathermap.org/img/wn/04d@2x.png"
        );
        assert_eq!(result.weather.main, "Clouds");
        assert_eq!(result.weather.description, "broken clouds");
    }

    #[test]
    fn test_transform_falls_back_to_coordinates() {
        let coords = Location::coordinates("51.5", "-0.12").unwrap();

        let missing = transform_response(create_test_response(None), &coords).unwrap();
        assert_eq!(missing.location, "51.5, -0.12");

        let empty = transform_response(create_test_response(Some("")), &coords).unwrap();
        assert_eq!(empty.location, "51.5, -0.12");
    }

    #[test]
    fn test_transform_without_conditions_is_invalid() {
        let mut data = create_test_response(Some("London"));
        data.weather.clear();

        let err = transform_response(data, &london()).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Failed to fetch current weather");
    }

    #[test]
    fn test_upstream_error_mapping() {
        let not_found = WeatherError::from_upstream(UpstreamError::NotFound, &london());
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.public_message(), "Location not found");

        let auth = WeatherError::from_upstream(UpstreamError::Unauthorized, &london());
        assert_eq!(auth.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(auth.public_message(), "Invalid API key");

        let other = WeatherError::from_upstream(
            UpstreamError::Status {
                status: StatusCode::BAD_GATEWAY,
                body: "upstream detail".to_string(),
            },
            &london(),
        );
        assert_eq!(other.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!other.public_message().contains("upstream detail"));
    }
}
