use std::fmt::Write as _;

use weather_lookup_core::{
    CurrentConditions, Forecast, MapView, Units, ViewState, WeatherIcon, icon::icon_url,
};

pub fn render_view(view: &ViewState, units: Units, brief: bool) -> String {
    let mut out = String::new();

    if let Some(error) = view.error() {
        let _ = writeln!(out, "! {error}");
    }

    if let Some(weather) = view.weather() {
        render_current(&mut out, weather, units);

        if !brief {
            if let Some(forecast) = view.forecast() {
                render_forecast(&mut out, forecast, units);
            }
            render_map(&mut out, &view.map());
        }
    }

    out
}

fn render_current(out: &mut String, weather: &CurrentConditions, units: Units) {
    let icon = WeatherIcon::classify(&weather.condition_code);
    let temp = units.temperature_label();

    let _ = writeln!(out, "{}  {} {}", weather.location_name, icon.glyph(), icon);
    let _ = writeln!(
        out,
        "  {}{temp}  {}",
        weather.temperature.round(),
        weather.description
    );
    let _ = writeln!(out, "  Feels like: {}{temp}", weather.feels_like.round());
    let _ = writeln!(out, "  Wind: {} {}", weather.wind_speed, units.wind_label());
    let _ = writeln!(out, "  Humidity: {}%", weather.humidity_pct);
    if !weather.condition_code.is_empty() {
        let _ = writeln!(out, "  Icon: {}", icon_url(&weather.condition_code));
    }
}

fn render_forecast(out: &mut String, forecast: &Forecast, units: Units) {
    let _ = writeln!(out);
    let _ = writeln!(out, "5-Day Forecast");
    for entry in forecast.daily() {
        let icon = WeatherIcon::classify(&entry.condition_code);
        let _ = writeln!(
            out,
            "  {}  {}  {}{}  {}",
            entry.time.format("%a"),
            icon.glyph(),
            entry.temperature.round(),
            units.temperature_label(),
            entry.summary,
        );
    }
}

fn render_map(out: &mut String, map: &MapView) {
    let _ = writeln!(out);
    let _ = writeln!(out, "Map: {}", map.marker_url());
}
