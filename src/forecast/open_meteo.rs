//! Open-Meteo forecast API client
//!
//! The service only ever asks for a fixed set of daily/hourly variables, so
//! requests are described by a static [`SeriesSelection`] and the response
//! keeps the upstream shape: parallel arrays keyed by variable name.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::UpstreamConfig;

/// Geographic location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Daily and hourly variables requested from the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesSelection {
    pub daily: &'static [&'static str],
    pub hourly: &'static [&'static str],
}

impl SeriesSelection {
    /// Variables needed for the per-day forecast.
    pub const DAILY_FORECAST: Self = Self {
        daily: &[
            "weather_code",
            "temperature_2m_max",
            "temperature_2m_min",
            "sunshine_duration",
        ],
        hourly: &[],
    };

    /// Variables needed for the weekly summary.
    pub const WEEKLY_SUMMARY: Self = Self {
        daily: &[
            "sunshine_duration",
            "temperature_2m_max",
            "temperature_2m_min",
            "weather_code",
        ],
        hourly: &["surface_pressure"],
    };

    fn query_pairs(&self, location: GeoLocation) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
        ];
        if !self.daily.is_empty() {
            pairs.push(("daily", self.daily.join(",")));
        }
        if !self.hourly.is_empty() {
            pairs.push(("hourly", self.hourly.join(",")));
        }
        pairs
    }
}

/// Forecast API response; only the series this service reads are kept.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub daily: Option<DailySeries>,
    #[serde(default)]
    pub hourly: Option<HourlySeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<NaiveDate>,
    #[serde(default)]
    pub weather_code: Vec<Option<i32>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    /// Seconds of sunshine per day.
    #[serde(default)]
    pub sunshine_duration: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HourlySeries {
    #[serde(default)]
    pub surface_pressure: Vec<Option<f64>>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(
        &self,
        location: GeoLocation,
        selection: SeriesSelection,
    ) -> Result<ForecastResponse>;
}

/// reqwest-backed client for the Open-Meteo `/v1/forecast` endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(cfg: &UpstreamConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("weather-energy-api/", env!("CARGO_PKG_VERSION"))),
        );
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_seconds))
            .default_headers(headers)
            .build()
            .context("failed to build forecast HTTP client")?;
        Ok(Self {
            client,
            base_url: cfg.base_url.clone(),
        })
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn fetch(
        &self,
        location: GeoLocation,
        selection: SeriesSelection,
    ) -> Result<ForecastResponse> {
        debug!(
            latitude = location.latitude,
            longitude = location.longitude,
            daily = ?selection.daily,
            hourly = ?selection.hourly,
            "requesting forecast"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&selection.query_pairs(location))
            .send()
            .await
            .context("forecast GET failed")?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "forecast API returned error status");
            anyhow::bail!("forecast API error: HTTP {status}");
        }

        let forecast: ForecastResponse = response
            .json()
            .await
            .context("forecast JSON parse failed")?;

        info!(
            latitude = location.latitude,
            longitude = location.longitude,
            days = forecast.daily.as_ref().map_or(0, |d| d.time.len()),
            "fetched forecast"
        );
        Ok(forecast)
    }
}
