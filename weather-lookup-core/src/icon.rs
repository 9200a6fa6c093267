use serde::{Deserialize, Serialize};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherIcon {
    Clear,
    Cloud,
    Drizzle,
    Rain,
    Snow,
}

impl WeatherIcon {
    /// Picks an icon from a condition code such as `"04n"`.
    /// Unknown codes fall back to [`WeatherIcon::Clear`].
    pub fn classify(code: &str) -> Self {
        const PREFIXES: &[(&str, WeatherIcon)] = &[
            ("01", WeatherIcon::Clear),
            ("02", WeatherIcon::Cloud),
            ("03", WeatherIcon::Drizzle),
            ("04", WeatherIcon::Drizzle),
            ("09", WeatherIcon::Rain),
            ("10", WeatherIcon::Rain),
            ("13", WeatherIcon::Snow),
        ];

        PREFIXES
            .iter()
            .find(|(prefix, _)| code.starts_with(prefix))
            .map(|(_, icon)| *icon)
            .unwrap_or(WeatherIcon::Clear)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherIcon::Clear => "clear",
            WeatherIcon::Cloud => "cloud",
            WeatherIcon::Drizzle => "drizzle",
            WeatherIcon::Rain => "rain",
            WeatherIcon::Snow => "snow",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            WeatherIcon::Clear => "☀",
            WeatherIcon::Cloud => "⛅",
            WeatherIcon::Drizzle => "☁",
            WeatherIcon::Rain => "☂",
            WeatherIcon::Snow => "❄",
        }
    }
}

impl std::fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hosted image for a condition code.
pub fn icon_url(code: &str) -> String {
    format!("{ICON_BASE_URL}/{code}@2x.png")
}
