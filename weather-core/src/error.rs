/// Everything that can go wrong while building a weather report.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Invalid zip code format. Must be 5 digits.")]
    InvalidZipCode(String),
    #[error("Zip code {0} not found")]
    UnknownZipCode(String),
    /// Weather API unreachable, timed out, or answered with a non-success status.
    #[error("Weather API request failed: {0}")]
    Upstream(String),
    /// Weather API answered, but not with the shape we expect.
    #[error("Weather API response failed validation: {0}")]
    Schema(String),
}

impl WeatherError {
    /// Errors caused by the caller's input rather than by us or the weather API.
    pub fn is_client_error(&self) -> bool {
        matches!(self, WeatherError::InvalidZipCode(_) | WeatherError::UnknownZipCode(_))
    }

    /// Message safe to hand back to API clients. Upstream detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            WeatherError::Upstream(_) => "Failed to fetch weather data".to_string(),
            WeatherError::Schema(_) => "Weather service returned unexpected data".to_string(),
            other => other.to_string(),
        }
    }
}
