use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use weather_lookup_core::{
    Config, LocationQuery, SuggestionDebouncer, Units, ViewState, WeatherFetcher,
    provider::provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-lookup",
    version,
    about = "Weather lookup with city suggestions and a 5-day forecast"
)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key, units and default city.
    Configure,

    /// Show weather for a city or a coordinate pair.
    Show {
        /// City name; defaults to the configured default city.
        #[arg(conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        /// Latitude, used together with --lon.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude, used together with --lat.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Current conditions only, no forecast.
        #[arg(long)]
        brief: bool,
    },

    /// Look up city suggestions for partial input and pick one.
    Suggest {
        /// Partial city name.
        text: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                lat,
                lon,
                brief,
            } => {
                let config = Config::load()?;
                let query = match (city, lat, lon) {
                    (_, Some(lat), Some(lon)) => LocationQuery::coordinates(lat, lon),
                    (Some(city), _, _) => LocationQuery::Name(city),
                    _ => LocationQuery::Name(config.default_city.clone()),
                };
                show(&config, query, brief).await
            }
            Command::Suggest { text } => suggest(&text).await,
        }
    }
}

fn configure() -> anyhow::Result<ExitCode> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let units = inquire::Select::new("Units:", Units::all().to_vec())
        .prompt()
        .context("Failed to read units")?;

    let default_city = inquire::Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()
        .context("Failed to read default city")?;

    config.set_api_key(api_key.trim().to_string());
    config.units = units;
    config.default_city = default_city;
    config.save()?;

    let path = Config::config_file_path()?;
    println!("Saved configuration to {}", path.display());
    Ok(ExitCode::SUCCESS)
}

async fn show(config: &Config, query: LocationQuery, brief: bool) -> anyhow::Result<ExitCode> {
    debug!(query = %query, brief, units = %config.units, "Fetching weather");
    let provider = provider_from_config(config)?;
    let view = ViewState::shared();
    view.lock().set_query(query.to_string());

    let fetcher = WeatherFetcher::new(provider, Arc::clone(&view));
    let result = if brief {
        fetcher.fetch_conditions(&query).await
    } else {
        fetcher.fetch(&query).await
    };

    let snapshot = view.lock().clone();
    print!("{}", render::render_view(&snapshot, config.units, brief));

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn suggest(text: &str) -> anyhow::Result<ExitCode> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let view = ViewState::shared();

    let debouncer = SuggestionDebouncer::new(
        provider.clone(),
        Arc::clone(&view),
        config.suggest.clone(),
    );
    debouncer.on_input(text);
    debouncer.settle().await;

    let suggestions = view.lock().visible_suggestions().to_vec();
    debug!(text, count = suggestions.len(), "Suggestion lookup settled");
    if suggestions.is_empty() {
        println!("No suggestions for '{text}'.");
        return Ok(ExitCode::SUCCESS);
    }

    let picked = inquire::Select::new("Pick a location:", suggestions)
        .prompt()
        .context("Failed to read selection")?;

    let fetcher = WeatherFetcher::new(provider, Arc::clone(&view));
    let result = fetcher.choose(&picked).await;

    let snapshot = view.lock().clone();
    print!("{}", render::render_view(&snapshot, config.units, false));

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
