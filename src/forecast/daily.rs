use itertools::izip;
use serde::{Deserialize, Serialize};

use super::energy::SolarInstallation;
use super::open_meteo::DailySeries;
use super::summary::SeriesError;

/// One day of the forecast endpoint's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "swagger", derive(utoipa::ToSchema))]
pub struct ForecastDay {
    pub date: chrono::NaiveDate,
    pub weather_code: Option<i32>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub estimated_energy_kwh: f64,
}

/// Zip the parallel daily arrays into per-day records, keeping upstream order.
///
/// Every array must have one sample per entry of `time`. A null sunshine
/// sample counts as no sunshine.
pub fn forecast_days(
    daily: &DailySeries,
    solar: &SolarInstallation,
) -> Result<Vec<ForecastDay>, SeriesError> {
    let expected = daily.time.len();
    check_len("weather_code", expected, daily.weather_code.len())?;
    check_len("temperature_2m_max", expected, daily.temperature_2m_max.len())?;
    check_len("temperature_2m_min", expected, daily.temperature_2m_min.len())?;
    check_len("sunshine_duration", expected, daily.sunshine_duration.len())?;

    let days = izip!(
        &daily.time,
        &daily.weather_code,
        &daily.temperature_2m_min,
        &daily.temperature_2m_max,
        &daily.sunshine_duration,
    )
    .map(|(date, code, temp_min, temp_max, sunshine)| ForecastDay {
        date: *date,
        weather_code: *code,
        temp_min: *temp_min,
        temp_max: *temp_max,
        estimated_energy_kwh: solar.estimate_energy_kwh(sunshine.unwrap_or(0.0)),
    })
    .collect();

    Ok(days)
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<(), SeriesError> {
    if actual == expected {
        Ok(())
    } else {
        Err(SeriesError::LengthMismatch {
            field,
            expected,
            actual,
        })
    }
}
