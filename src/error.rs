// ==================== error.rs ====================
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Too many redirects: {0}")]
    TooManyRedirects(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Bad response, status code: {status}")]
    HttpStatus { status: u16 },

    #[error("Failed to parse forecast: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No forecast fetched yet")]
    NotFetched,

    #[error("Forecast is missing field: {0}")]
    MissingField(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else if err.is_redirect() {
            AppError::TooManyRedirects(err.to_string())
        } else {
            AppError::Request(err.to_string())
        }
    }
}
