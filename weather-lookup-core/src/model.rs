use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of 3-hour forecast steps per day.
pub const FORECAST_STRIDE: usize = 8;

/// Number of days rendered from a forecast.
pub const FORECAST_DAYS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Where to look the weather up: a typed place name or a resolved coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Name(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub const fn coordinates(lat: f64, lon: f64) -> Self {
        Self::Coordinates(Coordinates::new(lat, lon))
    }

    /// Request parameters addressing this location.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Name(name) => vec![("q", name.clone())],
            Self::Coordinates(c) => vec![
                ("lat", c.lat.to_string()),
                ("lon", c.lon.to_string()),
            ],
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Coordinates(c) => write!(f, "{}, {}", c.lat, c.lon),
        }
    }
}

/// Unit system sent with every weather request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }

    pub fn temperature_label(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    pub fn wind_label(&self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric | Units::Standard => "m/s",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geocoding match offered to the user while typing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub coordinates: Coordinates,
}

impl Suggestion {
    /// `"Name, State, Country"`, or `"Name, Country"` without a state.
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}, {}", self.name, state, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub coordinates: Coordinates,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    /// Short condition code, e.g. `"10n"`.
    pub condition_code: String,
    pub description: String,
    pub observation_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: DateTime<Utc>,
    pub temperature: f64,
    pub condition_code: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub location_name: String,
    /// Entries in 3-hour steps, oldest first.
    pub entries: Vec<ForecastEntry>,
}

impl Forecast {
    /// One entry per day: every [`FORECAST_STRIDE`]th entry, at most [`FORECAST_DAYS`].
    pub fn daily(&self) -> Vec<&ForecastEntry> {
        self.entries
            .iter()
            .step_by(FORECAST_STRIDE)
            .take(FORECAST_DAYS)
            .collect()
    }
}

/// Map marker position and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
}

impl MapView {
    pub const DEFAULT_ZOOM: u8 = 10;

    pub fn marker_url(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map={zoom}/{lat}/{lon}",
            lat = self.center.lat,
            lon = self.center.lon,
            zoom = self.zoom,
        )
    }
}

impl Default for MapView {
    fn default() -> Self {
        // London
        Self {
            center: Coordinates::new(51.5074, -0.1278),
            zoom: Self::DEFAULT_ZOOM,
        }
    }
}
