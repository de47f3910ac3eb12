use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{error::WeatherError, time::Timestamp};

/// A 5-digit US zip code (`^\d{5}$`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ZipCode(String);

impl ZipCode {
    pub fn parse(raw: &str) -> Result<Self, WeatherError> {
        if raw.len() == 5 && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(WeatherError::InvalidZipCode(raw.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Temperature unit requested from the weather API and echoed in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "fahrenheit",
            TemperatureUnit::Celsius => "celsius",
        }
    }
}

/// Where a zip code is, as resolved by a [`crate::geocode::ZipGeocoder`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub city: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherRequest {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&GeoLocation> for WeatherRequest {
    fn from(loc: &GeoLocation) -> Self {
        Self { latitude: loc.latitude, longitude: loc.longitude }
    }
}

/// Current conditions at the requested coordinates.
#[derive(Debug, Clone)]
pub struct CurrentConditions {
    pub time: Timestamp,
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
}

/// Hourly temperatures; `times` and `temperatures` always have equal length.
#[derive(Debug, Clone, Default)]
pub struct HourlySeries {
    pub times: Vec<Timestamp>,
    pub temperatures: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub sunset: Timestamp,
    pub high: Option<f64>,
    pub low: Option<f64>,
}

/// A validated weather API response. `daily[0]` is today.
#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub hourly: HourlySeries,
    pub daily: Vec<DailyEntry>,
}

impl WeatherSnapshot {
    pub fn today(&self) -> Option<&DailyEntry> {
        self.daily.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSample {
    pub temperature: f64,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyHighLow {
    pub date: NaiveDate,
    pub high_temp: Option<f64>,
    pub low_temp: Option<f64>,
}

impl From<&DailyEntry> for DailyHighLow {
    fn from(day: &DailyEntry) -> Self {
        Self { date: day.date, high_temp: day.high, low_temp: day.low }
    }
}

/// The payload returned to clients for one zip code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub temperature: f64,
    pub humidity: f64,
    pub location: String,
    pub zipcode: ZipCode,
    pub unit: TemperatureUnit,
    pub sunset: Timestamp,
    pub is_before_sunset: bool,
    pub evening_forecast: Option<ForecastSample>,
    pub daily_forecast: Vec<DailyHighLow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_code_accepts_five_digits() {
        let zip = ZipCode::parse("78130").expect("valid zip");
        assert_eq!(zip.as_str(), "78130");
        assert_eq!(zip.to_string(), "78130");
    }

    #[test]
    fn zip_code_rejects_everything_else() {
        for bad in ["", "7813", "781300", "abcde", "7813a", " 7813", "78130-1234", "７８１３０"] {
            let err = ZipCode::parse(bad).unwrap_err();
            assert!(matches!(err, WeatherError::InvalidZipCode(ref z) if z == bad));
        }
    }

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let report = WeatherReport {
            temperature: 72.5,
            humidity: 40.0,
            location: "Austin, TX".into(),
            zipcode: ZipCode::parse("78701").unwrap(),
            unit: TemperatureUnit::Fahrenheit,
            sunset: Timestamp::parse("2025-11-18T17:31").unwrap(),
            is_before_sunset: false,
            evening_forecast: None,
            daily_forecast: vec![DailyHighLow {
                date: NaiveDate::from_ymd_opt(2025, 11, 19).unwrap(),
                high_temp: Some(80.0),
                low_temp: None,
            }],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "temperature": 72.5,
                "humidity": 40.0,
                "location": "Austin, TX",
                "zipcode": "78701",
                "unit": "fahrenheit",
                "sunset": "2025-11-18T17:31",
                "isBeforeSunset": false,
                "eveningForecast": null,
                "dailyForecast": [
                    { "date": "2025-11-19", "highTemp": 80.0, "lowTemp": null }
                ]
            })
        );
    }
}
