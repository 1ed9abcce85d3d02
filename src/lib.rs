//! Dark Sky forecast client.
//!
//! Fetches a forecast for one location and reads it back as a short
//! paragraph for today, tomorrow, or up to seven days out.

pub mod config;
pub mod error;
pub mod models;
pub mod summary;
pub mod weather;

pub use config::ClientConfig;
pub use error::AppError;
pub use models::{Block, Forecast, ForecastResponse, Period, ResponseMetadata, Units};
pub use summary::SummaryStyle;
pub use weather::ForecastClient;
