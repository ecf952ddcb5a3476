//! OpenWeather current-weather client

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{ProviderError, WeatherProvider};
use crate::config::ServiceConfig;
use crate::model::Observation;

/// Client for `api.openweathermap.org/data/2.5/weather`.
///
/// Temperatures come back in Kelvin (the API default), which is also the
/// canonical storage unit, so no conversion happens here. Every request
/// carries a bounded timeout so a stalled call cannot stall later ticks.
pub struct OpenWeatherProvider {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    weather: Vec<ApiCondition>,
    main: ApiMain,
    /// Observation time, unix seconds UTC.
    dt: i64,
}

#[derive(Deserialize)]
struct ApiCondition {
    main: String,
}

#[derive(Deserialize)]
struct ApiMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
}

impl OpenWeatherProvider {
    pub fn new(config: &ServiceConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, city: &str) -> Result<Observation, ProviderError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("q", city), ("appid", &self.api_key)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiError>()
                .await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| "no error message provided".to_string());
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let condition = body
            .weather
            .first()
            .map(|w| w.main.clone())
            .ok_or_else(|| ProviderError::Parse("empty weather array".to_string()))?;

        let timestamp: DateTime<Utc> = DateTime::from_timestamp(body.dt, 0)
            .ok_or_else(|| ProviderError::Parse(format!("invalid observation time {}", body.dt)))?;

        Ok(Observation::new(
            city,
            timestamp,
            condition,
            body.main.temp,
            body.main.feels_like,
        ))
    }
}
