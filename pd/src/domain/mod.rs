//! Domain types for day planning

mod location;
mod weather;

pub use location::Location;
pub use weather::{WeatherReport, describe_weather_code};
