use std::fmt;

use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, StatusCode},
};
use thiserror::Error;

use crate::error::HttpError;
use crate::impl_into_response;

/// Units used when the caller does not ask for any
pub const DEFAULT_UNITS: &str = "metric";

/// Raw query parameters for current weather and forecast requests
#[derive(Debug, Default)]
pub struct LocationParams {
    /// City name, e.g. `London` or `London,GB`
    pub city: Option<String>,
    /// Latitude, only used together with `lon`
    pub lat: Option<String>,
    /// Longitude, only used together with `lat`
    pub lon: Option<String>,
    /// Units: metric or imperial
    pub units: Option<String>,
}

impl LocationParams {
    /// Collect known keys from decoded query pairs. The first value wins when
    /// a key repeats; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "city" => &mut params.city,
                "lat" => &mut params.lat,
                "lon" => &mut params.lon,
                "units" => &mut params.units,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// One validated coordinate, keeping the caller's text
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    raw: String,
    value: f64,
}

impl Coordinate {
    /// Accepts finite numbers only; surrounding whitespace is dropped
    pub fn parse(text: &str) -> Option<Self> {
        let raw = text.trim();
        let value = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
        Some(Self {
            raw: raw.to_string(),
            value,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Where to look up weather
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    City(String),
    Coordinates { lat: Coordinate, lon: Coordinate },
}

impl Location {
    /// Coordinate location from caller text, if both parts are numbers
    pub fn coordinates(lat: &str, lon: &str) -> Option<Self> {
        Some(Self::Coordinates {
            lat: Coordinate::parse(lat)?,
            lon: Coordinate::parse(lon)?,
        })
    }

    /// Upstream query parameters selecting this location
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::City(city) => vec![("q", city.clone())],
            Self::Coordinates { lat, lon } => vec![
                ("lat", lat.as_str().to_string()),
                ("lon", lon.as_str().to_string()),
            ],
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::City(city) => f.write_str(city),
            Self::Coordinates { lat, lon } => write!(f, "{lat}, {lon}"),
        }
    }
}

/// Caller supplied neither a city nor a full coordinate pair
#[derive(Debug, Error)]
#[error("City name or lat/lon coordinates required")]
pub struct ValidationError;

impl HttpError for ValidationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn public_message(&self) -> String {
        self.to_string()
    }

    fn log_context(&self) -> &'static str {
        "Invalid location query"
    }
}

impl_into_response!(ValidationError);

/// A validated location query
///
/// A city wins over coordinates when both are present. Blank values count as
/// missing, and coordinates must both parse as finite numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationQuery {
    pub location: Location,
    pub units: String,
}

impl LocationQuery {
    pub fn from_params(params: LocationParams) -> Result<Self, ValidationError> {
        let units = non_blank(params.units).unwrap_or_else(|| DEFAULT_UNITS.to_string());

        if let Some(city) = non_blank(params.city) {
            return Ok(Self {
                location: Location::City(city),
                units,
            });
        }

        match (non_blank(params.lat), non_blank(params.lon)) {
            (Some(lat), Some(lon)) => Location::coordinates(&lat, &lon)
                .map(|location| Self { location, units })
                .ok_or(ValidationError),
            _ => Err(ValidationError),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl<S> FromRequestParts<S> for LocationQuery
where
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pairs = match Query::<Vec<(String, String)>>::from_request_parts(parts, state).await {
            Ok(Query(pairs)) => pairs,
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable query string, treating as empty");
                Vec::new()
            }
        };

        Self::from_params(LocationParams::from_pairs(pairs))
    }
}
