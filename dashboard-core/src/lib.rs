//! Core library for the `weather-dashboard` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeatherMap provider
//! - The forecast-to-chart transform
//! - Dashboard session state and the text renderer
//!
//! It is used by `dashboard-cli`, but can also be reused by other front-ends.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod render;

pub use config::Config;
pub use dashboard::{Dashboard, DashboardUpdate, Panel, PanelUpdate};
pub use error::DashboardError;
pub use forecast::{extract_series, extract_series_in};
pub use model::{
    ChartSeries, CurrentConditions, DailySample, DashboardContext, ForecastEntry, UnitPreference,
};
pub use provider::{WeatherProvider, provider_from_config};
