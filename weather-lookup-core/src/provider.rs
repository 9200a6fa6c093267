use crate::{
    Config, LookupError,
    model::{CurrentConditions, Forecast, LocationQuery, Suggestion},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Current conditions and multi-day forecast for a location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &LocationQuery) -> Result<CurrentConditions, LookupError>;

    async fn forecast(&self, query: &LocationQuery) -> Result<Forecast, LookupError>;
}

/// Resolves a partial place name into candidate locations.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn suggest(&self, partial: &str, limit: u8) -> Result<Vec<Suggestion>, LookupError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<OpenWeatherProvider>> {
    let api_key = config.resolve_api_key()?;
    let provider = OpenWeatherProvider::new(
        api_key,
        config.units,
        config.endpoints.clone(),
        std::time::Duration::from_secs(config.timeout_secs),
    )?;

    Ok(Arc::new(provider))
}
