use axum::http::StatusCode;
use chrono::DateTime;
use chrono_tz::Tz;
use indexmap::{map::Entry, IndexMap};
use thiserror::Error;

use super::models::*;
use crate::error::HttpError;
use crate::extractors::{Location, LocationQuery};
use crate::impl_into_response;
use crate::openweather::{icon_url, round_temp, OpenWeatherClient, UpstreamError, FORECAST_PATH};

/// 5 days of 3-hour samples
pub const MAX_SAMPLES: usize = 40;

const DAY_LABEL_FORMAT: &str = "%a, %b %-d";

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("OpenWeatherMap rejected the configured API key")]
    InvalidApiKey,

    #[error("Failed to fetch forecast")]
    Upstream(#[source] UpstreamError),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl ForecastError {
    fn from_upstream(err: UpstreamError, location: &Location) -> Self {
        match err {
            UpstreamError::NotFound => Self::LocationNotFound(location.to_string()),
            UpstreamError::Unauthorized => Self::InvalidApiKey,
            other => Self::Upstream(other),
        }
    }
}

impl HttpError for ForecastError {
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
            Self::Upstream(_) | Self::InvalidResponse(_) => "Failed to fetch forecast",
        }
        .to_string()
    }

    fn log_context(&self) -> &'static str {
        "Forecast API error"
    }
}

impl_into_response!(ForecastError);

pub struct ForecastService {
    client: OpenWeatherClient,
    timezone: Tz,
}

impl ForecastService {
    pub fn new(client: OpenWeatherClient, timezone: Tz) -> Self {
        Self { client, timezone }
    }

    /// Get the 5-day forecast reduced to one entry per day
    pub async fn get_forecast(&self, query: &LocationQuery) -> Result<ForecastResponse, ForecastError> {
        let data: OpenWeatherMapForecast = self
            .client
            .fetch(FORECAST_PATH, query)
            .await
            .map_err(|e| ForecastError::from_upstream(e, &query.location))?;

        let sample_count = data.list.len();
        let list = group_by_day(data.list, self.timezone)?;

        tracing::info!(
            city = %data.city.name,
            samples = sample_count,
            days = list.len(),
            "Forecast fetched successfully"
        );

        Ok(ForecastResponse {
            city: data.city.name,
            country: data.city.country,
            list,
        })
    }
}

/// Reduce 3-hour samples to one entry per calendar day
///
/// Only the first `MAX_SAMPLES` samples are considered. Each day is
/// represented by its earliest sample in upstream order; later samples for
/// the same day are dropped, not aggregated.
pub fn group_by_day(
    samples: Vec<ForecastSample>,
    timezone: Tz,
) -> Result<Vec<DailyForecastEntry>, ForecastError> {
    let days = samples.into_iter().take(MAX_SAMPLES).try_fold(
        IndexMap::new(),
        |mut days: IndexMap<String, DailyForecastEntry>,
         sample|
         -> Result<IndexMap<String, DailyForecastEntry>, ForecastError> {
            let label = day_label(sample.dt, timezone)?;
            if let Entry::Vacant(slot) = days.entry(label) {
                let entry = daily_entry(slot.key().clone(), sample)?;
                slot.insert(entry);
            }
            Ok(days)
        },
    )?;

    Ok(days.into_values().collect())
}

/// Format a unix timestamp as e.g. `Mon, Jan 5` in the given timezone
pub fn day_label(timestamp: i64, timezone: Tz) -> Result<String, ForecastError> {
    let utc = DateTime::from_timestamp(timestamp, 0).ok_or_else(|| {
        ForecastError::InvalidResponse(format!("Timestamp out of range: {timestamp}"))
    })?;

    Ok(utc.with_timezone(&timezone).format(DAY_LABEL_FORMAT).to_string())
}

fn daily_entry(date: String, sample: ForecastSample) -> Result<DailyForecastEntry, ForecastError> {
    let condition = sample.weather.into_iter().next().ok_or_else(|| {
        ForecastError::InvalidResponse(format!("No weather information for sample at {}", sample.dt))
    })?;

    Ok(DailyForecastEntry {
        date,
        temp: round_temp(sample.main.temp),
        feels_like: round_temp(sample.main.feels_like),
        description: condition.description,
        icon: icon_url(&condition.icon),
        humidity: sample.main.humidity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2024-01-01T00:00:00Z, a Monday
    const JAN_1_2024: i64 = 1_704_067_200;
    const THREE_HOURS: i64 = 3 * 60 * 60;

    fn sample(dt: i64, temp: f64, description: &str) -> ForecastSample {
        ForecastSample {
            dt,
            main: SampleMain {
                temp,
                feels_like: temp - 1.4,
                humidity: 80,
            },
            weather: vec![SampleCondition {
                description: description.to_string(),
                icon: "10d".to_string(),
            }],
        }
    }

    /// `count` consecutive 3-hour samples starting at midnight Jan 1
    fn samples(count: usize) -> Vec<ForecastSample> {
        (0..count)
            .map(|i| {
                let i = i as i64;
                sample(JAN_1_2024 + i * THREE_HOURS, i as f64 + 0.6, &format!("slot {i}"))
            })
            .collect()
    }

    #[test]
    fn test_day_label_format() {
        assert_eq!(day_label(JAN_1_2024, chrono_tz::UTC).unwrap(), "Mon, Jan 1");
        assert_eq!(
            day_label(JAN_1_2024 + 4 * 86_400, chrono_tz::UTC).unwrap(),
            "Fri, Jan 5"
        );
    }

    #[test]
    fn test_day_label_respects_timezone() {
        // Midnight UTC is still the previous evening in Chicago
        assert_eq!(
            day_label(JAN_1_2024, chrono_tz::America::Chicago).unwrap(),
            "Sun, Dec 31"
        );
    }

    #[test]
    fn test_forty_samples_make_five_days() {
        let days = group_by_day(samples(40), chrono_tz::UTC).unwrap();

        assert_eq!(days.len(), 5);
        let labels: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Mon, Jan 1", "Tue, Jan 2", "Wed, Jan 3", "Thu, Jan 4", "Fri, Jan 5"]
        );
    }

    #[test]
    fn test_first_sample_of_each_day_wins() {
        let days = group_by_day(samples(40), chrono_tz::UTC).unwrap();

        for (day, entry) in days.iter().enumerate() {
            let first_slot = day * 8;
            assert_eq!(entry.description, format!("slot {first_slot}"));
            assert_eq!(entry.temp, round_temp(first_slot as f64 + 0.6));
        }
    }

    #[test]
    fn test_samples_beyond_forty_are_ignored() {
        let days = group_by_day(samples(48), chrono_tz::UTC).unwrap();
        assert_eq!(days.len(), 5);
    }

    #[test]
    fn test_fewer_samples_give_fewer_days() {
        let days = group_by_day(samples(12), chrono_tz::UTC).unwrap();
        assert_eq!(days.len(), 2);
        assert!(group_by_day(Vec::new(), chrono_tz::UTC).unwrap().is_empty());
    }

    #[test]
    fn test_window_starting_midday_spans_six_days() {
        let offset: Vec<ForecastSample> = (0..40)
            .map(|i| sample(JAN_1_2024 + 12 * 3600 + i * THREE_HOURS, 1.0, "x"))
            .collect();
        let days = group_by_day(offset, chrono_tz::UTC).unwrap();
        assert_eq!(days.len(), 6);
    }

    #[test]
    fn test_order_follows_first_appearance() {
        let list = vec![
            sample(JAN_1_2024 + 86_400, 5.0, "tuesday"),
            sample(JAN_1_2024, 3.0, "monday"),
            sample(JAN_1_2024 + 86_400 + THREE_HOURS, 9.0, "later tuesday"),
        ];
        let days = group_by_day(list, chrono_tz::UTC).unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].description, "tuesday");
        assert_eq!(days[1].description, "monday");
    }

    #[test]
    fn test_entry_reshaping() {
        let days = group_by_day(vec![sample(JAN_1_2024, 15.6, "light rain")], chrono_tz::UTC)
            .unwrap();

        assert_eq!(
            days[0],
            DailyForecastEntry {
                date: "Mon, Jan 1".to_string(),
                temp: 16,
                feels_like: 14,
                description: "light rain".to_string(),
                icon: "https://openweathermap.org/img/wn/10d@2x.png".to_string(),
                humidity: 80,
            }
        );
    }

    #[test]
    fn test_dropped_samples_are_not_inspected() {
        let mut second = sample(JAN_1_2024 + THREE_HOURS, 1.0, "unused");
        second.weather.clear();
        let days = group_by_day(vec![sample(JAN_1_2024, 1.0, "kept"), second], chrono_tz::UTC)
            .unwrap();
        assert_eq!(days.len(), 1);
    }

    #[test]
    fn test_missing_condition_on_kept_sample_is_invalid() {
        let mut only = sample(JAN_1_2024, 1.0, "x");
        only.weather.clear();
        let err = group_by_day(vec![only], chrono_tz::UTC).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Failed to fetch forecast");
    }

    #[test]
    fn test_upstream_error_mapping() {
        let location = Location::City("Atlantis".to_string());

        let not_found = ForecastError::from_upstream(UpstreamError::NotFound, &location);
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.public_message(), "Location not found");

        let auth = ForecastError::from_upstream(UpstreamError::Unauthorized, &location);
        assert_eq!(auth.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(auth.public_message(), "Invalid API key");
        assert_eq!(auth.log_context(), "Forecast API error");
    }
}
