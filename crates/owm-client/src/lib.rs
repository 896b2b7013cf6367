//! HTTP executor for OpenWeatherMap query paths.

pub mod client;
pub mod error;

pub use client::WeatherClient;
pub use error::ClientError;
