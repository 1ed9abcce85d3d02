use crate::config::ClientConfig;
use crate::error::AppError;
use crate::models::{Forecast, ForecastResponse, Period, ResponseMetadata};
use crate::summary;
use chrono::Utc;
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, ACCEPT, CACHE_CONTROL, CONTENT_TYPE, EXPIRES};
use reqwest::StatusCode;

const API_CALLS_HEADER: &str = "X-Forecast-API-Calls";
const RESPONSE_TIME_HEADER: &str = "X-Response-Time";

pub struct ForecastClient {
    config: ClientConfig,
    client: reqwest::Client,
    last: Option<ForecastResponse>,
    /// Body of the last fetch when it could not be parsed.
    unparsed: Option<String>,
}

impl ForecastClient {
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Config(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            config,
            client,
            last: None,
            unparsed: None,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> String {
        self.config.endpoint()
    }

    /// Fetches a fresh forecast, replacing whatever was stored before.
    ///
    /// The previous response is dropped up front, so a failed fetch leaves
    /// nothing to summarize. A body that fails to parse stays available
    /// through [`raw`](Self::raw).
    pub async fn fetch(&mut self) -> Result<&ForecastResponse, AppError> {
        self.last = None;
        self.unparsed = None;

        let url = self.endpoint();
        info!(
            "🌐 Fetching forecast from API: units={}, style={}",
            self.config.units(),
            self.config.style()
        );

        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let metadata = read_metadata(response.headers());

        let status = response.status();
        if status != StatusCode::OK {
            warn!("❌ Forecast API returned status {}", status);
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let raw = response.text().await?;
        let forecast: Forecast = match serde_json::from_str(&raw) {
            Ok(forecast) => forecast,
            Err(e) => {
                warn!("❌ Forecast body is not valid JSON: {}", e);
                self.unparsed = Some(raw);
                return Err(e.into());
            }
        };

        debug!("Forecast body: {} bytes", raw.len());
        if let Some(calls) = &metadata.api_calls {
            info!("✅ Forecast fetched ({} API calls today)", calls);
        } else {
            info!("✅ Forecast fetched");
        }

        let stored = self.last.insert(ForecastResponse {
            raw,
            forecast,
            metadata,
            fetched_at: Utc::now(),
        });
        Ok(&*stored)
    }

    /// Summary for `period` using the configured style. Requires a prior fetch.
    pub fn summarize(&self, period: Period) -> Result<String, AppError> {
        let response = self.last.as_ref().ok_or(AppError::NotFetched)?;
        summary::compose(&response.forecast, period, self.config.style())
    }

    /// Body of the last fetch that returned 200, parsed or not.
    pub fn raw(&self) -> Option<&str> {
        self.last
            .as_ref()
            .map(|response| response.raw.as_str())
            .or(self.unparsed.as_deref())
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        self.last.as_ref().map(|response| &response.forecast)
    }

    pub fn metadata(&self) -> Option<&ResponseMetadata> {
        self.last.as_ref().map(|response| &response.metadata)
    }

    pub fn last_response(&self) -> Option<&ForecastResponse> {
        self.last.as_ref()
    }
}

fn read_metadata(headers: &HeaderMap) -> ResponseMetadata {
    ResponseMetadata {
        cache_control: header(headers, CACHE_CONTROL.as_str()),
        expires: header(headers, EXPIRES.as_str()),
        api_calls: header(headers, API_CALLS_HEADER),
        response_time: header(headers, RESPONSE_TIME_HEADER),
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    if value.is_none() {
        warn!("⚠️ Could not get header {}", name);
    }
    value
}
