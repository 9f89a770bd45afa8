//! get_weather tool - current conditions at a coordinate

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::WeatherReport;
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Current weather for a latitude/longitude pair
pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &'static str {
        "get_weather"
    }

    fn description(&self) -> &'static str {
        "Get the weather at a location. Returns apparent temperature and a short description."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "lat": {
                    "type": "number",
                    "description": "Latitude of the location"
                },
                "lng": {
                    "type": "number",
                    "description": "Longitude of the location"
                }
            },
            "required": ["lat", "lng"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "WeatherTool::execute: called");
        let (lat, lng) = match (input["lat"].as_f64(), input["lng"].as_f64()) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => {
                debug!("WeatherTool::execute: missing or non-numeric coordinates");
                return ToolResult::error("lat and lng are required and must be numbers");
            }
        };

        match fetch_weather(ctx, lat, lng).await {
            Ok(report) => ToolResult::json(&report),
            Err(e) => ToolResult::error(format!("Failed to get weather: {}", e)),
        }
    }
}

/// Fetch current weather, or the canned report when no API key is configured
pub async fn fetch_weather(ctx: &ToolContext, lat: f64, lng: f64) -> Result<WeatherReport, ToolError> {
    let Some(api_key) = &ctx.weather_api_key else {
        debug!("fetch_weather: no API key, returning placeholder report");
        return Ok(WeatherReport::placeholder());
    };

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(ToolError::InvalidArgument(format!("coordinates out of range: {},{}", lat, lng)));
    }

    let url = format!("{}/v4/weather/realtime", ctx.weather_base_url);
    let location = format!("{},{}", lat, lng);
    debug!(%url, %location, "fetch_weather: calling weather API");

    let body: Value = ctx
        .http
        .get(&url)
        .query(&[
            ("apikey", api_key.as_str()),
            ("location", location.as_str()),
            ("units", ctx.units.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let values = &body["data"]["values"];
    let temperature = values["temperatureApparent"]
        .as_f64()
        .ok_or_else(|| ToolError::InvalidResponse("missing data.values.temperatureApparent".to_string()))?;
    let code = values["weatherCode"]
        .as_u64()
        .ok_or_else(|| ToolError::InvalidResponse("missing data.values.weatherCode".to_string()))?;

    let report = WeatherReport::from_reading(temperature, u32::try_from(code).unwrap_or(0));
    debug!(?report, "fetch_weather: parsed");
    Ok(report)
}
