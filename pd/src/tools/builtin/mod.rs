//! Built-in tools for the planner agent

mod location;
mod weather;

pub use location::{LocationTool, locate};
pub use weather::{WeatherTool, fetch_weather};
