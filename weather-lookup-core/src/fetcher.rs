use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    error::{FETCH_ERROR_MESSAGE, FetchError, LookupError},
    model::{CurrentConditions, Forecast, LocationQuery, Suggestion},
    provider::WeatherProvider,
    view::SharedView,
};

/// Fetches current conditions and forecast for a location and publishes
/// them to the view. On failure previously shown data stays in place.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    provider: Arc<dyn WeatherProvider>,
    view: SharedView,
}

impl WeatherFetcher {
    pub fn new(provider: Arc<dyn WeatherProvider>, view: SharedView) -> Self {
        Self { provider, view }
    }

    pub fn view(&self) -> &SharedView {
        &self.view
    }

    /// Current conditions and forecast, requested concurrently. Either failing fails both.
    pub async fn fetch(&self, query: &LocationQuery) -> Result<(), FetchError> {
        self.begin();

        let result: Result<(CurrentConditions, Forecast), LookupError> =
            tokio::try_join!(self.provider.current(query), self.provider.forecast(query));
        let result = result.map(|(current, forecast)| (current, Some(forecast)));

        self.finish(query, result)
    }

    /// Current conditions only; the forecast view is left as is.
    pub async fn fetch_conditions(&self, query: &LocationQuery) -> Result<(), FetchError> {
        self.begin();

        let result = self.provider.current(query).await;

        self.finish(query, result.map(|current| (current, None)))
    }

    /// Fetch by the text currently in the search field. Blank text is ignored.
    pub async fn submit(&self) -> Result<(), FetchError> {
        let query = {
            let mut view = self.view.lock();
            view.set_show_suggestions(false);
            view.query().trim().to_string()
        };

        if query.is_empty() {
            return Ok(());
        }

        self.fetch(&LocationQuery::Name(query)).await
    }

    /// Adopt a suggestion as the search text and fetch by its coordinates.
    pub async fn choose(&self, suggestion: &Suggestion) -> Result<(), FetchError> {
        {
            let mut view = self.view.lock();
            view.set_query(suggestion.label());
            view.set_show_suggestions(false);
        }

        let query = LocationQuery::Coordinates(suggestion.coordinates);
        self.fetch(&query).await
    }

    fn begin(&self) {
        let mut view = self.view.lock();
        view.set_loading(true);
        view.set_error(None);
    }

    fn finish(
        &self,
        query: &LocationQuery,
        result: Result<(CurrentConditions, Option<Forecast>), LookupError>,
    ) -> Result<(), FetchError> {
        let mut view = self.view.lock();
        view.set_loading(false);

        match result {
            Ok((current, forecast)) => {
                info!(
                    query = %query,
                    location = %current.location_name,
                    lat = current.coordinates.lat,
                    lon = current.coordinates.lon,
                    "Weather updated"
                );
                view.set_map_center(current.coordinates);
                view.set_weather(current);
                if let Some(forecast) = forecast {
                    view.set_forecast(forecast);
                }
                Ok(())
            }
            Err(err) => {
                warn!(
                    query = %query,
                    error = %err,
                    not_found = err.is_not_found(),
                    "Weather fetch failed"
                );
                view.set_error(Some(FETCH_ERROR_MESSAGE.to_string()));
                Err(err.into())
            }
        }
    }
}
