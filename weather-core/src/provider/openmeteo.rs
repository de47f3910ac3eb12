use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::WeatherApiConfig,
    error::WeatherError,
    model::{
        CurrentConditions, DailyEntry, HourlySeries, TemperatureUnit, WeatherRequest,
        WeatherSnapshot,
    },
    time::Timestamp,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";
const FORECAST_PATH: &str = "/v1/forecast";

/// Client for the Open-Meteo forecast API (no API key required).
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
    unit: TemperatureUnit,
    forecast_days: u8,
}

impl OpenMeteoProvider {
    pub fn new(config: &WeatherApiConfig) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::Upstream(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            http,
            unit: config.unit,
            forecast_days: config.forecast_days,
        })
    }

    async fn fetch_forecast(&self, request: &WeatherRequest) -> Result<String, WeatherError> {
        let url = format!("{}{FORECAST_PATH}", self.base_url);

        tracing::debug!(
            "Requesting Open-Meteo forecast for {},{}",
            request.latitude,
            request.longitude
        );

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", request.latitude.to_string()),
                ("longitude", request.longitude.to_string()),
                ("current", "temperature_2m,relative_humidity_2m".to_string()),
                ("hourly", "temperature_2m".to_string()),
                ("daily", "sunset,temperature_2m_max,temperature_2m_min".to_string()),
                ("temperature_unit", self.unit.as_str().to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", self.forecast_days.to_string()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Upstream(format!("Failed to send request to Open-Meteo: {e}")))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::Upstream(format!("Failed to read Open-Meteo response body: {e}"))
        })?;

        if !status.is_success() {
            return Err(WeatherError::Upstream(format!(
                "Open-Meteo request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn get_weather(&self, request: &WeatherRequest) -> Result<WeatherSnapshot, WeatherError> {
        let body = self.fetch_forecast(request).await?;

        let parsed: OmForecastResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Schema(format!("Failed to parse Open-Meteo JSON: {e}")))?;

        parsed.validate()
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: String,
    temperature_2m: f64,
    relative_humidity_2m: f64,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    sunset: Vec<String>,
    temperature_2m_max: Option<Vec<Option<f64>>>,
    temperature_2m_min: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    utc_offset_seconds: i32,
    current: OmCurrent,
    hourly: OmHourly,
    daily: OmDaily,
}

impl OmForecastResponse {
    /// Check every field we read and convert into domain types.
    fn validate(self) -> Result<WeatherSnapshot, WeatherError> {
        let offset = FixedOffset::east_opt(self.utc_offset_seconds).ok_or_else(|| {
            schema(format!("utc_offset_seconds out of range: {}", self.utc_offset_seconds))
        })?;
        let timestamp = |field: &str, raw: &str| {
            Timestamp::parse_with_offset(raw, offset).map_err(|e| schema(format!("{field}: {e}")))
        };

        if !(0.0..=100.0).contains(&self.current.relative_humidity_2m) {
            return Err(schema(format!(
                "current.relative_humidity_2m out of range: {}",
                self.current.relative_humidity_2m
            )));
        }
        let current = CurrentConditions {
            time: timestamp("current.time", self.current.time.as_str())?,
            temperature: finite("current.temperature_2m", self.current.temperature_2m)?,
            humidity: self.current.relative_humidity_2m,
        };

        let OmHourly { time, temperature_2m } = self.hourly;
        if time.len() != temperature_2m.len() {
            return Err(schema(format!(
                "hourly.time has {} entries but hourly.temperature_2m has {}",
                time.len(),
                temperature_2m.len()
            )));
        }
        let times = time
            .iter()
            .enumerate()
            .map(|(i, t)| timestamp(&format!("hourly.time[{i}]"), t.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let temperatures = temperature_2m
            .into_iter()
            .enumerate()
            .map(|(i, t)| finite(&format!("hourly.temperature_2m[{i}]"), t))
            .collect::<Result<Vec<_>, _>>()?;

        let OmDaily { time, sunset, temperature_2m_max, temperature_2m_min } = self.daily;
        if time.is_empty() {
            return Err(schema("daily series is empty".to_string()));
        }
        let highs = daily_column("daily.temperature_2m_max", temperature_2m_max, time.len())?;
        let lows = daily_column("daily.temperature_2m_min", temperature_2m_min, time.len())?;
        if sunset.len() != time.len() {
            return Err(schema(format!(
                "daily.time has {} entries but daily.sunset has {}",
                time.len(),
                sunset.len()
            )));
        }

        let mut daily = Vec::with_capacity(time.len());
        for (i, (date, sunset)) in time.iter().zip(&sunset).enumerate() {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| schema(format!("daily.time[{i}]: '{date}': {e}")))?;
            daily.push(DailyEntry {
                date,
                sunset: timestamp(&format!("daily.sunset[{i}]"), sunset.as_str())?,
                high: highs[i],
                low: lows[i],
            });
        }

        Ok(WeatherSnapshot {
            current,
            hourly: HourlySeries { times, temperatures },
            daily,
        })
    }
}

/// An optional daily column: absent means "no values", present must match `len`.
fn daily_column(
    field: &str,
    column: Option<Vec<Option<f64>>>,
    len: usize,
) -> Result<Vec<Option<f64>>, WeatherError> {
    let Some(values) = column else {
        return Ok(vec![None; len]);
    };
    if values.len() != len {
        return Err(schema(format!("{field} has {} entries, expected {len}", values.len())));
    }
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.map(|v| finite(&format!("{field}[{i}]"), v)).transpose())
        .collect()
}

fn finite(field: &str, value: f64) -> Result<f64, WeatherError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(schema(format!("{field} is not a finite number")))
    }
}

fn schema(detail: String) -> WeatherError {
    WeatherError::Schema(detail)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
