use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

// ==================== Request options ====================

/// Measurement system the API reports values in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Si,
    Us,
    Uk2,
    Ca,
    Auto,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Si => "si",
            Units::Us => "us",
            Units::Uk2 => "uk2",
            Units::Ca => "ca",
            Units::Auto => "auto",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "si" => Ok(Units::Si),
            "us" => Ok(Units::Us),
            "uk2" => Ok(Units::Uk2),
            "ca" => Ok(Units::Ca),
            "auto" => Ok(Units::Auto),
            other => Err(AppError::Config(format!("Unknown units: {}", other))),
        }
    }
}

/// A section of the forecast document that can be left out of the response.
///
/// Variants are ordered the way the API documents them, which is also the
/// order they are written into the `exclude` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Block {
    Currently,
    Minutely,
    Hourly,
    Daily,
    Alerts,
    Flags,
}

impl Block {
    pub fn as_str(&self) -> &'static str {
        match self {
            Block::Currently => "currently",
            Block::Minutely => "minutely",
            Block::Hourly => "hourly",
            Block::Daily => "daily",
            Block::Alerts => "alerts",
            Block::Flags => "flags",
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Block {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "currently" => Ok(Block::Currently),
            "minutely" => Ok(Block::Minutely),
            "hourly" => Ok(Block::Hourly),
            "daily" => Ok(Block::Daily),
            "alerts" => Ok(Block::Alerts),
            "flags" => Ok(Block::Flags),
            other => Err(AppError::Config(format!("Unknown block: {}", other))),
        }
    }
}

/// Day a summary is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Today,
    /// Offset into the daily data, 1 (tomorrow) through 7.
    Day(u8),
}

impl Period {
    pub const MAX_DAY: u8 = 7;

    /// Never fails: anything unrecognised means today.
    pub fn parse(when: &str) -> Self {
        let when = when.trim().to_ascii_lowercase();
        match when.as_str() {
            "today" => Period::Today,
            "tomorrow" => Period::Day(1),
            other => other.parse::<u8>().map(Period::from).unwrap_or_default(),
        }
    }

    /// Folds a day offset outside 1..=7 back to today.
    pub fn normalized(self) -> Self {
        match self {
            Period::Today => Period::Today,
            Period::Day(offset) => Period::from(offset),
        }
    }
}

impl From<u8> for Period {
    fn from(offset: u8) -> Self {
        if (1..=Self::MAX_DAY).contains(&offset) {
            Period::Day(offset)
        } else {
            Period::Today
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Period::Today => f.write_str("today"),
            Period::Day(1) => f.write_str("tomorrow"),
            Period::Day(n) => write!(f, "day +{}", n),
        }
    }
}

// ==================== Response ====================

/// Optional headers the API attaches to every forecast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub cache_control: Option<String>,
    pub expires: Option<String>,
    pub api_calls: Option<String>,
    pub response_time: Option<String>,
}

/// Last successful fetch: the body as received plus its parsed form.
#[derive(Debug, Clone)]
pub struct ForecastResponse {
    pub raw: String,
    pub forecast: Forecast,
    pub metadata: ResponseMetadata,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Forecast {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub currently: Option<DataPoint>,
    pub hourly: Option<DataBlock>,
    pub daily: Option<DataBlock>,
    pub alerts: Option<Vec<Alert>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    pub summary: Option<String>,
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub temperature_min: Option<f64>,
    pub temperature_max: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataBlock {
    pub summary: Option<String>,
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alert {
    pub title: String,
    pub severity: Option<String>,
    pub description: Option<String>,
    pub uri: Option<String>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub time: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub expires: Option<DateTime<Utc>>,
}
