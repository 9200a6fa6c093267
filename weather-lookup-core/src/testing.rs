use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::{collections::HashMap, time::Duration};

use crate::{
    LookupError,
    model::{Coordinates, CurrentConditions, Forecast, ForecastEntry, LocationQuery, Suggestion},
    provider::{Geocoder, WeatherProvider},
    view::SharedView,
};

pub(crate) const NAMED_COORDINATES: Coordinates = Coordinates::new(51.5085, -0.1257);

#[derive(Debug, Default)]
pub(crate) struct StubProvider {
    pub(crate) suggest_calls: Mutex<Vec<String>>,
    pub(crate) suggest_delays: HashMap<String, Duration>,
    pub(crate) failing_suggestions: Vec<String>,
    pub(crate) weather_calls: Mutex<Vec<LocationQuery>>,
    pub(crate) fail_current: bool,
    pub(crate) fail_forecast: bool,
    /// When set, every weather request records the view's loading flag.
    pub(crate) observed_view: Option<SharedView>,
    pub(crate) loading_seen: Mutex<Vec<bool>>,
}

impl StubProvider {
    pub(crate) fn suggest_calls(&self) -> Vec<String> {
        self.suggest_calls.lock().clone()
    }

    pub(crate) fn loading_seen(&self) -> Vec<bool> {
        self.loading_seen.lock().clone()
    }

    fn record_loading(&self) {
        if let Some(view) = &self.observed_view {
            let loading = view.lock().is_loading();
            self.loading_seen.lock().push(loading);
        }
    }

    fn not_found(endpoint: &'static str) -> LookupError {
        LookupError::Status {
            endpoint,
            status: StatusCode::NOT_FOUND,
            body: r#"{"cod":"404","message":"city not found"}"#.into(),
        }
    }

    fn resolve(query: &LocationQuery) -> (String, Coordinates) {
        match query {
            LocationQuery::Name(name) => (name.clone(), NAMED_COORDINATES),
            LocationQuery::Coordinates(c) => ("Pinned".to_string(), *c),
        }
    }
}

pub(crate) fn suggestion(name: &str) -> Suggestion {
    Suggestion {
        name: name.to_string(),
        country: "GB".to_string(),
        state: None,
        coordinates: Coordinates::new(52.0, -1.0),
    }
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

#[async_trait]
impl Geocoder for StubProvider {
    async fn suggest(&self, partial: &str, _limit: u8) -> Result<Vec<Suggestion>, LookupError> {
        self.suggest_calls.lock().push(partial.to_string());

        if let Some(delay) = self.suggest_delays.get(partial) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing_suggestions.iter().any(|f| f == partial) {
            return Err(Self::not_found("geocoding"));
        }

        Ok(vec![suggestion(partial)])
    }
}

#[async_trait]
impl WeatherProvider for StubProvider {
    async fn current(&self, query: &LocationQuery) -> Result<CurrentConditions, LookupError> {
        self.weather_calls.lock().push(query.clone());
        self.record_loading();
        if self.fail_current {
            return Err(Self::not_found("current weather"));
        }

        let (location_name, coordinates) = Self::resolve(query);
        Ok(CurrentConditions {
            location_name,
            coordinates,
            temperature: 11.3,
            feels_like: 10.6,
            humidity_pct: 81,
            wind_speed: 4.6,
            condition_code: "10d".into(),
            description: "light rain".into(),
            observation_time: timestamp(1_700_000_000),
        })
    }

    async fn forecast(&self, query: &LocationQuery) -> Result<Forecast, LookupError> {
        self.record_loading();
        if self.fail_forecast {
            return Err(Self::not_found("5-day forecast"));
        }

        let (location_name, _) = Self::resolve(query);
        let entries = (0..40)
            .map(|i| ForecastEntry {
                time: timestamp(1_700_000_000 + i * 3 * 3600),
                temperature: i as f64,
                condition_code: "02d".into(),
                summary: "Clouds".into(),
            })
            .collect();

        Ok(Forecast {
            location_name,
            entries,
        })
    }
}
