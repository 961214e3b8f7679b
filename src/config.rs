use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::forecast::SolarInstallation;

pub const OPEN_METEO_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub solar: SolarInstallation,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            enable_cors: false,
        }
    }
}

/// Forecast API the service proxies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub http_timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: OPEN_METEO_FORECAST_URL.to_string(),
            http_timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Days with a precipitation weather code needed for the "with precipitation" label.
    pub precipitation_days_threshold: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            precipitation_days_threshold: 4,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Figment::new().merge(Toml::file("config/default.toml")))
    }

    fn load_from(files: Figment) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(files)
            .merge(Env::prefixed("WEA__").split("__"));
        Ok(figment.extract()?)
    }
}
