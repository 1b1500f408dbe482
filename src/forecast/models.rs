use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// OpenWeatherMap 5 day / 3 hour forecast response (Internal)
// Only the fields the daily summary needs are deserialized
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenWeatherMapForecast {
    pub list: Vec<ForecastSample>,
    pub city: CityInfo,
}

#[derive(Debug, Deserialize)]
pub struct CityInfo {
    pub name: String,
    pub country: Option<String>,
}

/// One 3-hour sample
#[derive(Debug, Deserialize)]
pub struct ForecastSample {
    pub dt: i64,
    pub main: SampleMain,
    pub weather: Vec<SampleCondition>,
}

#[derive(Debug, Deserialize)]
pub struct SampleMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u32,
}

#[derive(Debug, Deserialize)]
pub struct SampleCondition {
    pub description: String,
    pub icon: String,
}

// ============================================================================
// API Response Models (External - what we return to clients)
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ForecastResponse {
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// One entry per calendar day, in the order days first appear
    pub list: Vec<DailyForecastEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecastEntry {
    /// Short label such as `Mon, Jan 5`
    pub date: String,
    pub temp: i64,
    pub feels_like: i64,
    pub description: String,
    pub icon: String,
    pub humidity: u32,
}
