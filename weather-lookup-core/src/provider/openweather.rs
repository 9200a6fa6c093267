use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    config::Endpoints,
    error::LookupError,
    model::{
        Coordinates, CurrentConditions, Forecast, ForecastEntry, LocationQuery, Suggestion,
        Units,
    },
};

use super::{Geocoder, WeatherProvider};

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    units: Units,
    endpoints: Endpoints,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(
        api_key: String,
        units: Units,
        endpoints: Endpoints,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LookupError::ClientInit)?;

        Ok(Self {
            api_key,
            units,
            endpoints,
            http,
        })
    }

    /// GET `url` with `params` plus the credential, and decode a successful JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: String,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T, LookupError> {
        params.push(("appid", self.api_key.clone()));

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|source| LookupError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| LookupError::Transport { endpoint, source })?;

        debug!(endpoint, %status, bytes = body.len(), "OpenWeather response");

        if !status.is_success() {
            return Err(LookupError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|source| LookupError::Parse { endpoint, source })
    }

    fn weather_params(&self, query: &LocationQuery) -> Vec<(&'static str, String)> {
        let mut params = query.query_pairs();
        params.push(("units", self.units.as_str().to_string()));
        params
    }

    fn weather_url(&self, path: &str) -> String {
        let base = self.endpoints.weather_url.trim_end_matches('/');
        format!("{base}/{path}")
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, query), fields(query = %query))]
    async fn current(&self, query: &LocationQuery) -> Result<CurrentConditions, LookupError> {
        let url = self.weather_url("weather");
        let parsed: OwCurrentResponse = self
            .get_json("current weather", url, self.weather_params(query))
            .await?;

        let (condition_code, description) = parsed
            .weather
            .first()
            .map(|w| (w.icon.clone(), w.description.clone()))
            .unwrap_or_else(|| (String::new(), "Unknown".to_string()));

        Ok(CurrentConditions {
            location_name: parsed.name,
            coordinates: parsed.coord.into(),
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            condition_code,
            description,
            observation_time: unix_to_utc(parsed.dt).unwrap_or_else(Utc::now),
        })
    }

    #[instrument(skip(self, query), fields(query = %query))]
    async fn forecast(&self, query: &LocationQuery) -> Result<Forecast, LookupError> {
        let url = self.weather_url("forecast");
        let parsed: OwForecastResponse = self
            .get_json("5-day forecast", url, self.weather_params(query))
            .await?;

        let entries = parsed
            .list
            .into_iter()
            .map(|entry| {
                let (condition_code, summary) = entry
                    .weather
                    .into_iter()
                    .next()
                    .map(|w| (w.icon, w.main))
                    .unwrap_or_else(|| (String::new(), "Unknown".to_string()));

                ForecastEntry {
                    time: unix_to_utc(entry.dt).unwrap_or_else(Utc::now),
                    temperature: entry.main.temp,
                    condition_code,
                    summary,
                }
            })
            .collect();

        Ok(Forecast {
            location_name: parsed.city.name,
            entries,
        })
    }
}

#[async_trait]
impl Geocoder for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn suggest(&self, partial: &str, limit: u8) -> Result<Vec<Suggestion>, LookupError> {
        let url = format!("{}/direct", self.endpoints.geo_url.trim_end_matches('/'));
        let params = vec![("q", partial.to_string()), ("limit", limit.to_string())];

        let parsed: Vec<OwGeocodingResult> = self.get_json("geocoding", url, params).await?;

        Ok(parsed
            .into_iter()
            .map(|r| Suggestion {
                name: r.name,
                country: r.country,
                state: r.state,
                coordinates: Coordinates::new(r.lat, r.lon),
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

impl From<OwCoord> for Coordinates {
    fn from(c: OwCoord) -> Self {
        Coordinates::new(c.lat, c.lon)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeocodingResult {
    name: String,
    lat: f64,
    lon: f64,
    country: String,
    state: Option<String>,
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
