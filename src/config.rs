// ==================== config.rs ====================
use crate::error::AppError;
use crate::models::{Block, Units};
use crate::summary::SummaryStyle;
use std::collections::BTreeSet;
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.darksky.net/forecast";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_key: String,
    latitude: String,
    longitude: String,
    units: Units,
    exclude: Option<BTreeSet<Block>>,
    style: SummaryStyle,
    base_url: String,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(
        api_key: impl Into<String>,
        latitude: impl Into<String>,
        longitude: impl Into<String>,
    ) -> Result<Self, AppError> {
        let api_key = required("api key", api_key.into())?;
        let latitude = required("latitude", latitude.into())?;
        let longitude = required("longitude", longitude.into())?;
        validate_coordinate("latitude", &latitude, 90.0)?;
        validate_coordinate("longitude", &longitude, 180.0)?;

        Ok(Self {
            api_key,
            latitude,
            longitude,
            units: Units::default(),
            exclude: None,
            style: SummaryStyle::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds a config from any variable source; `from_env` passes the process environment.
    pub fn from_vars<F>(var: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(
            var("DARKSKY_API_KEY")
                .ok_or_else(|| AppError::Config("DARKSKY_API_KEY not set".to_string()))?,
            var("DARKSKY_LATITUDE")
                .ok_or_else(|| AppError::Config("DARKSKY_LATITUDE not set".to_string()))?,
            var("DARKSKY_LONGITUDE")
                .ok_or_else(|| AppError::Config("DARKSKY_LONGITUDE not set".to_string()))?,
        )?;

        if let Some(units) = var("DARKSKY_UNITS") {
            config.units = units.parse()?;
        }
        if let Some(exclude) = var("DARKSKY_EXCLUDE") {
            config.exclude = Some(parse_blocks(&exclude)?);
        }
        if let Some(style) = var("DARKSKY_SUMMARY_STYLE") {
            config.style = style.parse()?;
        }
        if let Some(base_url) = var("DARKSKY_BASE_URL") {
            config.base_url = base_url;
        }
        config.timeout = Duration::from_secs(
            var("DARKSKY_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        );

        Ok(config)
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_exclude<I>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        self.exclude = Some(blocks.into_iter().collect());
        self
    }

    pub fn with_style(mut self, style: SummaryStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn style(&self) -> SummaryStyle {
        self.style
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Blocks left out of the request. Falls back to the style's default set
    /// when none were given explicitly.
    pub fn exclude(&self) -> BTreeSet<Block> {
        self.exclude
            .clone()
            .unwrap_or_else(|| self.style.default_exclude())
    }

    pub fn endpoint(&self) -> String {
        let mut url = format!(
            "{}/{}/{},{}?units={}",
            self.base_url.trim_end_matches('/'),
            self.api_key,
            self.latitude,
            self.longitude,
            self.units
        );

        let exclude = self.exclude();
        if !exclude.is_empty() {
            let blocks: Vec<&str> = exclude.iter().map(Block::as_str).collect();
            url.push_str("&exclude=");
            url.push_str(&blocks.join(","));
        }

        url
    }
}

/// Parses a comma separated block list; blank input is the empty set.
pub fn parse_blocks(list: &str) -> Result<BTreeSet<Block>, AppError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<Block>)
        .collect()
}

fn required(name: &str, value: String) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Config(format!("Required parameter missing: {}", name)));
    }
    Ok(value.to_string())
}

fn validate_coordinate(name: &str, value: &str, limit: f64) -> Result<(), AppError> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| AppError::Config(format!("Invalid {}: {}", name, value)))?;
    if !(-limit..=limit).contains(&parsed) {
        return Err(AppError::Config(format!(
            "Invalid {}: {} is outside -{} to {}",
            name, value, limit, limit
        )));
    }
    Ok(())
}
