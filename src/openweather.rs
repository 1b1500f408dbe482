use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::extractors::LocationQuery;

const ICON_URL_BASE: &str = "https://openweathermap.org/img/wn";

/// Current weather endpoint, relative to the configured base URL
pub const CURRENT_WEATHER_PATH: &str = "weather";
/// 5 day / 3 hour forecast endpoint, relative to the configured base URL
pub const FORECAST_PATH: &str = "forecast";

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("OpenWeatherMap returned 404")]
    NotFound,

    #[error("OpenWeatherMap rejected the API key")]
    Unauthorized,

    #[error("OpenWeatherMap returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Request to OpenWeatherMap failed")]
    Request(#[source] reqwest::Error),
}

// The request URL carries the API key, so it is stripped before the error
// can reach a log line.
impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.without_url())
    }
}

/// Thin client for the OpenWeatherMap 2.5 data API
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Perform exactly one GET against `path` and decode the JSON body
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &LocationQuery,
    ) -> Result<T, UpstreamError> {
        let url = format!("{}/{}", self.base_url, path);

        tracing::debug!(
            path = %path,
            location = %query.location,
            units = %query.units,
            "Calling OpenWeatherMap"
        );

        // Query builder handles URL encoding of city names
        let response = self
            .client
            .get(&url)
            .query(&[
                ("appid", self.api_key.as_str()),
                ("units", query.units.as_str()),
            ])
            .query(&query.location.query_pairs())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, "Received OpenWeatherMap response");

        match status {
            StatusCode::NOT_FOUND => Err(UpstreamError::NotFound),
            StatusCode::UNAUTHORIZED => Err(UpstreamError::Unauthorized),
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(UpstreamError::Status { status: s, body })
            }
            _ => Ok(response.json().await?),
        }
    }
}

/// Full image URL for an OpenWeatherMap icon code
pub fn icon_url(icon: &str) -> String {
    format!("{ICON_URL_BASE}/{icon}@2x.png")
}

/// Round to the nearest integer, halves toward positive infinity
pub fn round_temp(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_url() {
        assert_eq!(
            icon_url("04d"),
            "https://openweathermap.org/img/wn/04d@2x.png"
        );
    }

    #[test]
    fn test_round_temp_nearest() {
        assert_eq!(round_temp(15.6), 16);
        assert_eq!(round_temp(15.4), 15);
        assert_eq!(round_temp(-3.7), -4);
        assert_eq!(round_temp(0.0), 0);
    }

    #[test]
    fn test_round_temp_halves_go_up() {
        assert_eq!(round_temp(2.5), 3);
        assert_eq!(round_temp(-2.5), -2);
        assert_eq!(round_temp(-0.5), 0);
    }

    #[test]
    fn test_round_temp_just_below_half() {
        assert_eq!(round_temp(0.499_999_999_999_999_94), 0);
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = OpenWeatherClient::new(Client::new(), "http://localhost/data/2.5/", "k");
        assert_eq!(client.base_url, "http://localhost/data/2.5");
    }
}
