use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{WeatherRequest, WeatherSnapshot},
};

pub mod openmeteo;

pub use openmeteo::OpenMeteoProvider;

/// Source of current conditions plus hourly and daily forecasts.
///
/// Implementations validate the upstream payload before returning it: a
/// snapshot handed out by a provider always satisfies the invariants
/// documented on [`WeatherSnapshot`] and its series.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherSnapshot, WeatherError>;
}
