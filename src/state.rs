use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::forecast::{OpenMeteoClient, WeatherSource};

/// Immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub weather: Arc<dyn WeatherSource>,
}

impl AppState {
    pub fn new(cfg: Config) -> Result<Self> {
        let weather = Arc::new(OpenMeteoClient::new(&cfg.upstream)?);
        Ok(Self::with_source(cfg, weather))
    }

    pub fn with_source(cfg: Config, weather: Arc<dyn WeatherSource>) -> Self {
        Self {
            cfg: Arc::new(cfg),
            weather,
        }
    }
}
