//! Presentation fields derived from a validated weather snapshot.

use crate::{
    model::{DailyEntry, DailyHighLow, ForecastSample},
    time::Timestamp,
};

/// Local hour of the overnight sample shown as the "evening forecast".
pub const EVENING_FORECAST_HOUR: u32 = 3;

/// Days reported after today in the daily forecast.
pub const UPCOMING_DAYS: usize = 3;

/// `true` iff `current` is strictly earlier than `sunset` in absolute time.
pub fn is_before_sunset(current: &Timestamp, sunset: &Timestamp) -> bool {
    current < sunset
}

/// Find the sample at 3 AM on the calendar day after `reference`.
///
/// Dates and hours are read in each timestamp's own offset. Returns the first
/// match in series order, or `None` when the series has no such sample.
/// `times` and `temperatures` are expected to be the same length; extra
/// entries on either side are ignored.
pub fn find_evening_forecast(
    times: &[Timestamp],
    temperatures: &[f64],
    reference: &Timestamp,
) -> Option<ForecastSample> {
    let target = reference.local_date().succ_opt()?;

    times
        .iter()
        .zip(temperatures)
        .find(|(time, _)| time.local_date() == target && time.local_hour() == EVENING_FORECAST_HOUR)
        .map(|(time, &temperature)| ForecastSample {
            temperature,
            time: time.as_str().to_owned(),
        })
}

pub fn format_location(city: &str, region: &str) -> String {
    format!("{city}, {region}")
}

/// High/low records for the days after today, at most [`UPCOMING_DAYS`].
pub fn upcoming_days(daily: &[DailyEntry]) -> Vec<DailyHighLow> {
    daily.iter().skip(1).take(UPCOMING_DAYS).map(DailyHighLow::from).collect()
}
