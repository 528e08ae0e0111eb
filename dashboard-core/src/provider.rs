use crate::{
    Config, CurrentConditions, DashboardContext, DashboardError, ForecastEntry,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Source of the two payloads the dashboard shows.
///
/// The two calls are independent; the dashboard issues them concurrently and
/// neither depends on the other succeeding.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_conditions(
        &self,
        context: &DashboardContext,
    ) -> Result<CurrentConditions, DashboardError>;

    /// Raw 3-hourly forecast entries in chronological order.
    async fn forecast(&self, context: &DashboardContext)
    -> Result<Vec<ForecastEntry>, DashboardError>;
}

/// Construct the OpenWeatherMap provider from config.
///
/// A missing API key is not an error here; each fetch reports it instead.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::new(
        config.resolve_api_key(),
        config.base_url.clone(),
        config.timeout_secs,
    )?;

    Ok(Arc::new(provider))
}
