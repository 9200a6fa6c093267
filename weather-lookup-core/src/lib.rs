//! Core library for the weather lookup widgets.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstractions over the weather and geocoding services, with an OpenWeather implementation
//! - The suggestion debouncer and the weather fetcher, both writing to a shared view state
//! - Condition-code icon classification
//!
//! It is used by `weather-lookup-cli`, but can also back other front ends.

pub mod config;
pub mod debounce;
pub mod error;
pub mod fetcher;
pub mod icon;
pub mod model;
pub mod provider;
pub mod view;

#[cfg(test)]
mod testing;

pub use config::{Config, Endpoints, SuggestConfig};
pub use debounce::SuggestionDebouncer;
pub use error::{FETCH_ERROR_MESSAGE, FetchError, LookupError};
pub use fetcher::WeatherFetcher;
pub use icon::WeatherIcon;
pub use model::{
    Coordinates, CurrentConditions, Forecast, ForecastEntry, LocationQuery, MapView, Suggestion,
    Units,
};
pub use provider::{Geocoder, WeatherProvider, openweather::OpenWeatherProvider};
pub use view::{SharedView, ViewState};
