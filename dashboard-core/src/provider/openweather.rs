use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    config::API_KEY_ENV,
    error::DashboardError,
    model::{CurrentConditions, DashboardContext, ForecastEntry},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>, base_url: String, timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// GET `{base_url}/{endpoint}` for the context's city and units and decode the JSON body.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        context: &DashboardContext,
    ) -> Result<T, DashboardError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(DashboardError::Configuration { env_var: API_KEY_ENV })?;

        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, city = %context.city, units = %context.units, "Requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", context.city.as_str()),
                ("appid", api_key),
                ("units", context.units.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DashboardError::network(endpoint, e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| DashboardError::network(endpoint, format!("reading body: {e}")))?;

        if !status.is_success() {
            return Err(DashboardError::network(
                endpoint,
                format!("status {}: {}", status, truncate_body(&body)),
            ));
        }

        serde_json::from_str(&body)
            .map_err(|e| DashboardError::unexpected_shape(endpoint, e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwCurrentMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl TryFrom<OwCurrentResponse> for CurrentConditions {
    type Error = DashboardError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| DashboardError::unexpected_shape("weather", "empty `weather` array"))?;

        Ok(CurrentConditions {
            city_name: parsed.name,
            observed_at: parsed.dt,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            description,
        })
    }
}

impl From<OwForecastEntry> for ForecastEntry {
    fn from(entry: OwForecastEntry) -> Self {
        ForecastEntry {
            timestamp: entry.dt,
            timestamp_text: entry.dt_txt,
            temperature: entry.main.temp,
            feels_like: entry.main.feels_like,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, context), fields(city = %context.city, units = %context.units))]
    async fn current_conditions(
        &self,
        context: &DashboardContext,
    ) -> Result<CurrentConditions, DashboardError> {
        let parsed: OwCurrentResponse = self.fetch_json("weather", context).await?;
        let current = CurrentConditions::try_from(parsed)?;
        debug!(temperature = current.temperature, "Retrieved current weather");
        Ok(current)
    }

    #[instrument(skip(self, context), fields(city = %context.city, units = %context.units))]
    async fn forecast(
        &self,
        context: &DashboardContext,
    ) -> Result<Vec<ForecastEntry>, DashboardError> {
        let parsed: OwForecastResponse = self.fetch_json("forecast", context).await?;
        debug!(entries = parsed.list.len(), "Retrieved forecast");
        Ok(parsed.list.into_iter().map(ForecastEntry::from).collect())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_payload_maps_to_entries() {
        let body = r#"{
            "cod": "200",
            "list": [
                {"dt": 1705320000, "dt_txt": "2024-01-15 12:00:00",
                 "main": {"temp": 7.5, "feels_like": 4.0, "humidity": 80}}
            ]
        }"#;
        let parsed: OwForecastResponse = serde_json::from_str(body).expect("valid payload");
        let entries: Vec<ForecastEntry> = parsed.list.into_iter().map(ForecastEntry::from).collect();

        assert_eq!(
            entries,
            vec![ForecastEntry {
                timestamp: 1_705_320_000,
                timestamp_text: "2024-01-15 12:00:00".into(),
                temperature: 7.5,
                feels_like: 4.0,
            }]
        );
    }

    #[test]
    fn current_payload_without_weather_is_unexpected_shape() {
        let parsed = OwCurrentResponse {
            name: "Atlanta".into(),
            dt: 0,
            main: OwCurrentMain { temp: 1.0, feels_like: 1.0, humidity: 50 },
            weather: vec![],
            wind: OwWind { speed: 1.0 },
        };
        let err = CurrentConditions::try_from(parsed).unwrap_err();
        assert!(matches!(err, DashboardError::UnexpectedShape { .. }));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider =
            OpenWeatherProvider::new(None, "http://localhost:1234/".into(), 5).expect("client");
        assert_eq!(provider.base_url, "http://localhost:1234");
    }
}
