use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// OpenWeatherMap API key
    pub openweathermap_api_key: String,

    /// Base URL of the OpenWeatherMap data API (no trailing slash needed)
    #[serde(default = "default_base_url")]
    pub openweathermap_base_url: String,

    /// Frontend origin allowed by CORS
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// IANA timezone used to label forecast days
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Whole-request timeout applied by the server
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for a single upstream call
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("openweathermap_base_url", default_base_url())?
            .set_default("cors_origin", default_cors_origin())?
            .set_default("timezone", default_timezone())?
            // Load from config file if present
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // Override with environment variables (prefixed with WEATHERDASH_)
            .add_source(
                Environment::with_prefix("WEATHERDASH")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Config for tests and embedding: defaults plus the two upstream settings.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            openweathermap_api_key: api_key.into(),
            openweathermap_base_url: base_url.into(),
            cors_origin: default_cors_origin(),
            timezone: default_timezone(),
            request_timeout_secs: default_request_timeout_secs(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.openweathermap_api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "openweathermap_api_key must not be empty".to_string(),
            ));
        }

        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ConfigError::Message(format!(
                "Invalid timezone: {}",
                self.timezone
            )));
        }

        if self.cors_origin.parse::<axum::http::HeaderValue>().is_err() {
            return Err(ConfigError::Message(format!(
                "Invalid CORS origin: {}",
                self.cors_origin
            )));
        }

        Ok(())
    }

    /// Parsed forecast timezone, falling back to UTC.
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or(chrono_tz::UTC)
    }
}
