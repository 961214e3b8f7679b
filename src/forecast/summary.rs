//! Weekly aggregate statistics over daily and hourly forecast series.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use strum::Display;
use thiserror::Error;

use super::energy::round2;
use super::open_meteo::{DailySeries, HourlySeries};

/// WMO weather codes for drizzle, rain, snow, showers and thunderstorms.
pub const PRECIPITATION_CODES: Range<i32> = 50..100;

/// Problems with the shape of an upstream series.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("series `{field}` has {actual} samples, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("series `{0}` is missing")]
    Missing(&'static str),
    #[error("series `{0}` has no samples")]
    Empty(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum PrecipitationLabel {
    #[strum(serialize = "with precipitation")]
    #[serde(rename = "with precipitation")]
    WithPrecipitation,
    #[strum(serialize = "without precipitation")]
    #[serde(rename = "without precipitation")]
    WithoutPrecipitation,
}

impl PrecipitationLabel {
    pub fn from_rainy_days(rainy_days: usize, threshold: usize) -> Self {
        if rainy_days >= threshold {
            Self::WithPrecipitation
        } else {
            Self::WithoutPrecipitation
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
pub struct WeeklySummary {
    pub avg_pressure: f64,
    pub avg_sunshine: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    #[cfg_attr(feature = "swagger", schema(value_type = String))]
    pub weekly_summary: PrecipitationLabel,
}

impl WeeklySummary {
    /// Reduce a week of samples. Null samples are skipped.
    pub fn from_series(
        daily: &DailySeries,
        hourly: &HourlySeries,
        precipitation_days_threshold: usize,
    ) -> Result<Self, SeriesError> {
        let avg_pressure = mean(&hourly.surface_pressure, "surface_pressure")?;
        let avg_sunshine = mean(&daily.sunshine_duration, "sunshine_duration")?;
        let min_temp = present(&daily.temperature_2m_min)
            .reduce(f64::min)
            .ok_or(SeriesError::Empty("temperature_2m_min"))?;
        let max_temp = present(&daily.temperature_2m_max)
            .reduce(f64::max)
            .ok_or(SeriesError::Empty("temperature_2m_max"))?;

        let rainy_days = count_precipitation_days(&daily.weather_code);

        Ok(Self {
            avg_pressure: round2(avg_pressure),
            avg_sunshine: round2(avg_sunshine),
            min_temp,
            max_temp,
            weekly_summary: PrecipitationLabel::from_rainy_days(
                rainy_days,
                precipitation_days_threshold,
            ),
        })
    }
}

pub fn count_precipitation_days(codes: &[Option<i32>]) -> usize {
    codes
        .iter()
        .flatten()
        .filter(|code| PRECIPITATION_CODES.contains(*code))
        .count()
}

fn present(samples: &[Option<f64>]) -> impl Iterator<Item = f64> + '_ {
    samples.iter().flatten().copied()
}

fn mean(samples: &[Option<f64>], field: &'static str) -> Result<f64, SeriesError> {
    let (sum, count) = present(samples).fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        return Err(SeriesError::Empty(field));
    }
    Ok(sum / count as f64)
}
