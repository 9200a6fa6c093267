use parking_lot::Mutex;
use std::sync::Arc;

use crate::model::{Coordinates, CurrentConditions, Forecast, MapView, Suggestion};

/// View state shared between the widget components.
pub type SharedView = Arc<Mutex<ViewState>>;

/// Transient state the widgets render from. The debouncer and the fetcher
/// write through the setters; front ends read a snapshot.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    query: String,
    suggestions: Vec<Suggestion>,
    show_suggestions: bool,
    weather: Option<CurrentConditions>,
    forecast: Option<Forecast>,
    loading: bool,
    error: Option<String>,
    map: MapView,
}

impl ViewState {
    pub fn shared() -> SharedView {
        Arc::new(Mutex::new(Self::default()))
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Suggestions to render: empty while the list is hidden.
    pub fn visible_suggestions(&self) -> &[Suggestion] {
        if self.show_suggestions {
            &self.suggestions
        } else {
            &[]
        }
    }

    pub fn weather(&self) -> Option<&CurrentConditions> {
        self.weather.as_ref()
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        self.forecast.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn map(&self) -> MapView {
        self.map
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions = suggestions;
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }

    pub fn set_show_suggestions(&mut self, show: bool) {
        self.show_suggestions = show;
    }

    pub fn set_weather(&mut self, weather: CurrentConditions) {
        self.weather = Some(weather);
    }

    pub fn set_forecast(&mut self, forecast: Forecast) {
        self.forecast = Some(forecast);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn set_map_center(&mut self, center: Coordinates) {
        self.map.center = center;
    }
}
