//! get_user_location_by_ip tool - locate the user from their public IP

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::Location;
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Look up the caller's approximate location via IP geolocation
pub struct LocationTool;

#[async_trait]
impl Tool for LocationTool {
    fn name(&self) -> &'static str {
        "get_user_location_by_ip"
    }

    fn description(&self) -> &'static str {
        "Get user's location based on their IP address. Returns city, region, country, lat and lng."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value, ctx: &ToolContext) -> ToolResult {
        debug!("LocationTool::execute: called");
        ToolResult::json(&locate(ctx).await)
    }
}

/// Resolve the user's location, falling back to Kyiv on any failure
pub async fn locate(ctx: &ToolContext) -> Location {
    match fetch_location(ctx).await {
        Ok(location) => {
            debug!(city = %location.city, "locate: resolved");
            location
        }
        Err(e) => {
            warn!(error = %e, "Failed to get location by IP, using fallback");
            Location::fallback()
        }
    }
}

async fn fetch_location(ctx: &ToolContext) -> Result<Location, ToolError> {
    let url = format!("{}/json/", ctx.geo_base_url);
    debug!(%url, has_key = ctx.geo_api_key.is_some(), "fetch_location: called");

    let mut request = ctx.http.get(&url);
    if let Some(key) = &ctx.geo_api_key {
        request = request.query(&[("key", key.as_str())]);
    }

    let body: Value = request.send().await?.error_for_status()?.json().await?;

    if body["error"].as_bool() == Some(true) {
        let reason = body["reason"].as_str().unwrap_or("unknown error");
        return Err(ToolError::InvalidResponse(format!("geolocation service refused: {}", reason)));
    }

    Ok(Location::from_ipapi(&body))
}
