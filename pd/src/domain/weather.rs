//! Current weather conditions

use serde::{Deserialize, Serialize};

/// Weather summary handed to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature: String,
    pub description: String,
}

impl WeatherReport {
    /// Canned report used when no weather API key is configured
    pub fn placeholder() -> Self {
        Self {
            temperature: "21 °C".to_string(),
            description: "Sunny".to_string(),
        }
    }

    /// Build from the apparent temperature (°C) and a tomorrow.io weather code
    pub fn from_reading(temperature_apparent: f64, weather_code: u32) -> Self {
        Self {
            temperature: format!("{:.0}°C", temperature_apparent),
            description: describe_weather_code(weather_code).to_string(),
        }
    }
}

/// Human-readable description of a tomorrow.io weather code
pub fn describe_weather_code(code: u32) -> &'static str {
    match code {
        1000 => "Clear, Sunny",
        1100 => "Mostly Clear",
        1101 => "Partly Cloudy",
        1102 => "Mostly Cloudy",
        1001 => "Cloudy",
        2000 => "Fog",
        2100 => "Light Fog",
        4000 => "Drizzle",
        4001 => "Rain",
        4200 => "Light Rain",
        4201 => "Heavy Rain",
        5000 => "Snow",
        5001 => "Flurries",
        5100 => "Light Snow",
        5101 => "Heavy Snow",
        6000 => "Freezing Drizzle",
        6001 => "Freezing Rain",
        6200 => "Light Freezing Rain",
        6201 => "Heavy Freezing Rain",
        7000 => "Ice Pellets",
        7101 => "Heavy Ice Pellets",
        7102 => "Light Ice Pellets",
        8000 => "Thunderstorm",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(describe_weather_code(1000), "Clear, Sunny");
        assert_eq!(describe_weather_code(4201), "Heavy Rain");
        assert_eq!(describe_weather_code(7102), "Light Ice Pellets");
        assert_eq!(describe_weather_code(8000), "Thunderstorm");
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(describe_weather_code(0), "Unknown");
        assert_eq!(describe_weather_code(3000), "Unknown");
    }

    #[test]
    fn test_temperature_rounding() {
        assert_eq!(WeatherReport::from_reading(12.4, 1001).temperature, "12°C");
        assert_eq!(WeatherReport::from_reading(-3.6, 5100).temperature, "-4°C");
        assert_eq!(WeatherReport::from_reading(-3.6, 5100).description, "Light Snow");
    }

    #[test]
    fn test_placeholder() {
        let report = WeatherReport::placeholder();
        assert_eq!(report.temperature, "21 °C");
        assert_eq!(report.description, "Sunny");
    }
}
