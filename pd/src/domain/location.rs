//! Where the user is

use serde::{Deserialize, Serialize};

/// A resolved user location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    /// Used whenever IP geolocation is unavailable: Kyiv
    pub fn fallback() -> Self {
        Self {
            city: "Київ".to_string(),
            region: "Київська область".to_string(),
            country: "Україна".to_string(),
            lat: 50.4501,
            lng: 30.5234,
        }
    }

    /// Build from an ipapi.co style JSON body; absent fields become "Unknown" / 0.0
    pub fn from_ipapi(body: &serde_json::Value) -> Self {
        let text = |key: &str| body[key].as_str().unwrap_or("Unknown").to_string();
        Self {
            city: text("city"),
            region: text("region"),
            country: text("country_name"),
            lat: body["latitude"].as_f64().unwrap_or(0.0),
            lng: body["longitude"].as_f64().unwrap_or(0.0),
        }
    }
}
