pub mod api;
pub mod config;
pub mod forecast;
pub mod state;
pub mod telemetry;
