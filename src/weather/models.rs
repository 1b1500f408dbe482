use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// OpenWeatherMap current weather response (Internal)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenWeatherMapResponse {
    /// Empty or missing for some coordinate lookups
    pub name: Option<String>,
    pub sys: SysInfo,
    pub weather: Vec<WeatherCondition>,
    pub main: MainInfo,
    pub wind: WindInfo,
    pub visibility: Option<u32>,
    pub dt: i64,
}

#[derive(Debug, Deserialize)]
pub struct SysInfo {
    pub country: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherCondition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct MainInfo {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u32,
}

#[derive(Debug, Deserialize)]
pub struct WindInfo {
    pub speed: f64,
    pub deg: Option<u32>,
}

// ============================================================================
// API Response Models (External - what we return to clients)
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentWeatherResponse {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub weather: ConditionBlock,
    pub main: MainBlock,
    pub wind: WindBlock,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<u32>,
    /// Unix timestamp of the observation
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConditionBlock {
    pub main: String,
    pub description: String,
    /// Full icon image URL
    pub icon: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MainBlock {
    pub temp: i64,
    pub feels_like: i64,
    pub temp_min: i64,
    pub temp_max: i64,
    pub pressure: u32,
    pub humidity: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WindBlock {
    pub speed: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<u32>,
}
