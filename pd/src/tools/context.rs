//! ToolContext - shared dependencies for tool calls

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::ToolError;
use crate::config::Config;
use crate::envfile::Secrets;

/// Everything a tool needs to reach the outside world
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Shared HTTP client
    pub http: Client,

    /// Weather API key; without one the weather tool returns a canned report
    pub weather_api_key: Option<String>,

    /// Optional IP geolocation API key
    pub geo_api_key: Option<String>,

    /// Weather API base URL
    pub weather_base_url: String,

    /// IP geolocation API base URL
    pub geo_base_url: String,

    /// Unit system for weather readings
    pub units: String,
}

impl ToolContext {
    /// Context with default endpoints and no keys
    pub fn new(http: Client) -> Self {
        let config = Config::default();
        Self {
            http,
            weather_api_key: None,
            geo_api_key: None,
            weather_base_url: config.weather.base_url,
            geo_base_url: config.geo.base_url,
            units: config.weather.units,
        }
    }

    /// Build from configuration, resolving keys through `secrets`
    pub fn from_config(config: &Config, secrets: &Secrets) -> Result<Self, ToolError> {
        debug!(weather = %config.weather.base_url, geo = %config.geo.base_url, "ToolContext::from_config: called");
        let http = Client::builder()
            .timeout(Duration::from_millis(config.weather.timeout_ms))
            .user_agent(concat!("plannerday/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let weather_api_key = secrets.resolve(&config.weather.api_key_env);
        let geo_api_key = secrets.resolve(&config.geo.api_key_env);
        debug!(
            has_weather_key = weather_api_key.is_some(),
            has_geo_key = geo_api_key.is_some(),
            "ToolContext::from_config: resolved keys"
        );

        Ok(Self {
            http,
            weather_api_key,
            geo_api_key,
            weather_base_url: config.weather.base_url.trim_end_matches('/').to_string(),
            geo_base_url: config.geo.base_url.trim_end_matches('/').to_string(),
            units: config.weather.units.clone(),
        })
    }

    pub fn with_weather_api_key(mut self, key: impl Into<String>) -> Self {
        self.weather_api_key = Some(key.into());
        self
    }

    pub fn with_geo_api_key(mut self, key: impl Into<String>) -> Self {
        self.geo_api_key = Some(key.into());
        self
    }

    pub fn with_weather_base_url(mut self, url: impl Into<String>) -> Self {
        self.weather_base_url = url.into();
        self
    }

    pub fn with_geo_base_url(mut self, url: impl Into<String>) -> Self {
        self.geo_base_url = url.into();
        self
    }
}
