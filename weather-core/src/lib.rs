//! Core library for the zip code weather service.
//!
//! This crate defines:
//! - Timestamp parsing and the forecast derivations (sunset comparison,
//!   3 AM evening forecast, location formatting, daily slicing)
//! - Zip code geocoding and the Open-Meteo weather provider
//! - The service that assembles a [`WeatherReport`] for one zip code
//! - Configuration handling
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod derive;
pub mod error;
pub mod geocode;
pub mod model;
pub mod provider;
pub mod service;
pub mod time;

pub use config::{Config, ServerConfig, WeatherApiConfig};
pub use error::WeatherError;
pub use geocode::{ZipGeocoder, ZipTable};
pub use model::{
    DailyHighLow, ForecastSample, GeoLocation, TemperatureUnit, WeatherReport, WeatherRequest,
    WeatherSnapshot, ZipCode,
};
pub use provider::{OpenMeteoProvider, WeatherProvider};
pub use service::WeatherService;
pub use time::Timestamp;
