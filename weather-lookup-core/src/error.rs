use reqwest::StatusCode;
use thiserror::Error;

/// Message shown to the user whenever a weather fetch fails, whatever the cause.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch weather data. Please try again.";

/// Failure of a single request to the weather or geocoding service.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Failed to build HTTP client: {0}")]
    ClientInit(#[source] reqwest::Error),

    #[error("Failed to send request to OpenWeather ({endpoint}): {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error(
        "OpenWeather {endpoint} request failed with status {status}: {body}"
    )]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse OpenWeather {endpoint} JSON: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        match self {
            LookupError::Status { status, .. } => *status == StatusCode::NOT_FOUND,
            _ => false,
        }
    }
}

/// A failed weather fetch. Displays only [`FETCH_ERROR_MESSAGE`]; the
/// underlying [`LookupError`] stays reachable through `source()` for logs.
#[derive(Debug, Error)]
#[error("{}", FETCH_ERROR_MESSAGE)]
pub struct FetchError {
    #[source]
    cause: LookupError,
}

impl From<LookupError> for FetchError {
    fn from(cause: LookupError) -> Self {
        Self { cause }
    }
}
