//! Solar production estimate derived from forecast sunshine duration.

use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Photovoltaic installation used for daily energy estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarInstallation {
    pub installation_power_kw: f64,
    pub panel_efficiency: f64,
}

impl Default for SolarInstallation {
    fn default() -> Self {
        Self {
            installation_power_kw: 2.5,
            panel_efficiency: 0.2,
        }
    }
}

impl SolarInstallation {
    /// Estimated daily production in kWh, rounded to two decimals.
    pub fn estimate_energy_kwh(&self, sunshine_duration_s: f64) -> f64 {
        let sunshine_hours = sunshine_duration_s / SECONDS_PER_HOUR;
        round2(self.installation_power_kw * sunshine_hours * self.panel_efficiency)
    }
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
