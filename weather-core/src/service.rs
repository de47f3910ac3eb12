use std::sync::Arc;

use crate::{
    config::WeatherApiConfig,
    derive::{find_evening_forecast, format_location, is_before_sunset, upcoming_days},
    error::WeatherError,
    geocode::{ZipGeocoder, ZipTable},
    model::{TemperatureUnit, WeatherReport, WeatherRequest, ZipCode},
    provider::{OpenMeteoProvider, WeatherProvider},
};

/// Builds [`WeatherReport`]s from a zip code.
///
/// Holds no per-request state; clones share the same collaborators.
#[derive(Debug, Clone)]
pub struct WeatherService {
    geocoder: Arc<dyn ZipGeocoder>,
    provider: Arc<dyn WeatherProvider>,
    unit: TemperatureUnit,
}

impl WeatherService {
    pub fn new(
        geocoder: Arc<dyn ZipGeocoder>,
        provider: Arc<dyn WeatherProvider>,
        unit: TemperatureUnit,
    ) -> Self {
        Self { geocoder, provider, unit }
    }

    /// The bundled zip code table plus Open-Meteo, configured from `config`.
    pub fn from_config(config: &WeatherApiConfig) -> Result<Self, WeatherError> {
        let provider = OpenMeteoProvider::new(config)?;
        Ok(Self::new(Arc::new(ZipTable), Arc::new(provider), config.unit))
    }

    pub async fn report(&self, zipcode: &str) -> Result<WeatherReport, WeatherError> {
        let zip = ZipCode::parse(zipcode)?;

        let location = self
            .geocoder
            .lookup(&zip)
            .ok_or_else(|| WeatherError::UnknownZipCode(zip.to_string()))?;

        let snapshot = self.provider.get_weather(&WeatherRequest::from(&location)).await?;
        let today = snapshot
            .today()
            .ok_or_else(|| WeatherError::Schema("daily series is empty".to_string()))?;

        let current = &snapshot.current;
        let before_sunset = is_before_sunset(&current.time, &today.sunset);
        let evening_forecast = if before_sunset {
            find_evening_forecast(
                &snapshot.hourly.times,
                &snapshot.hourly.temperatures,
                &current.time,
            )
        } else {
            None
        };

        tracing::info!(
            "Weather for {zip} ({}, {}): {} {}, before sunset: {before_sunset}, evening forecast: {}",
            location.city,
            location.region,
            current.temperature,
            self.unit.as_str(),
            evening_forecast.is_some(),
        );

        Ok(WeatherReport {
            temperature: current.temperature,
            humidity: current.humidity,
            location: format_location(&location.city, &location.region),
            unit: self.unit,
            sunset: today.sunset.clone(),
            is_before_sunset: before_sunset,
            evening_forecast,
            daily_forecast: upcoming_days(&snapshot.daily),
            zipcode: zip,
        })
    }
}
