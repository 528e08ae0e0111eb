//! Dashboard session: the current context, one panel per card, and the fetch tasks feeding them.
//!
//! Every context change bumps a request generation and starts two independent
//! tasks (current conditions and forecast). Their results come back over a
//! channel tagged with the generation they were issued under, and
//! [`Dashboard::apply`] drops anything from an older generation so a slow
//! response for a previous city or unit choice can't overwrite a newer one.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    error::DashboardError,
    forecast,
    model::{ChartSeries, CurrentConditions, DashboardContext, UnitPreference},
    provider::WeatherProvider,
};

/// State of one card.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> Panel<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Panel::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelUpdate {
    Current(Panel<CurrentConditions>),
    Forecast(Panel<ChartSeries>),
}

/// A panel result tagged with the generation of the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardUpdate {
    pub generation: u64,
    pub panel: PanelUpdate,
}

/// Fetch current conditions and map the outcome to a panel.
pub async fn load_current(
    provider: &dyn WeatherProvider,
    context: &DashboardContext,
) -> Panel<CurrentConditions> {
    match provider.current_conditions(context).await {
        Ok(current) => Panel::Ready(current),
        Err(err) => {
            log_failure(&err, "current weather");
            Panel::Failed(err.current_message(&context.city))
        }
    }
}

/// Fetch the forecast and reduce it to a chart series.
pub async fn load_forecast(
    provider: &dyn WeatherProvider,
    context: &DashboardContext,
) -> Panel<ChartSeries> {
    match provider.forecast(context).await {
        Ok(entries) => Panel::Ready(forecast::extract_series(&entries)),
        Err(err) => {
            log_failure(&err, "forecast");
            Panel::Failed(err.forecast_message())
        }
    }
}

/// Run both fetches concurrently and wait for both.
pub async fn load_both(
    provider: &dyn WeatherProvider,
    context: &DashboardContext,
) -> (Panel<CurrentConditions>, Panel<ChartSeries>) {
    tokio::join!(load_current(provider, context), load_forecast(provider, context))
}

fn log_failure(err: &DashboardError, what: &str) {
    match err {
        DashboardError::Configuration { .. } => warn!("{what}: {err}"),
        _ => warn!(error = %err, "Failed to load {what}"),
    }
}

#[derive(Debug)]
pub struct Dashboard {
    provider: Arc<dyn WeatherProvider>,
    context: DashboardContext,
    generation: u64,
    current: Panel<CurrentConditions>,
    forecast: Panel<ChartSeries>,
    updates: mpsc::UnboundedSender<DashboardUpdate>,
}

impl Dashboard {
    /// Create a session. Nothing is fetched until [`Dashboard::refresh`] or a context change.
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        context: DashboardContext,
    ) -> (Self, mpsc::UnboundedReceiver<DashboardUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let dashboard = Self {
            provider,
            context,
            generation: 0,
            current: Panel::Loading,
            forecast: Panel::Loading,
            updates,
        };
        (dashboard, rx)
    }

    pub fn context(&self) -> &DashboardContext {
        &self.context
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current(&self) -> &Panel<CurrentConditions> {
        &self.current
    }

    pub fn forecast(&self) -> &Panel<ChartSeries> {
        &self.forecast
    }

    /// Search for a new city. Blank input is ignored and returns `false`.
    pub fn search(&mut self, city: &str) -> bool {
        let city = city.trim();
        if city.is_empty() {
            return false;
        }
        self.context.city = city.to_string();
        self.refresh();
        true
    }

    pub fn set_units(&mut self, units: UnitPreference) {
        self.context.units = units;
        self.refresh();
    }

    pub fn toggle_units(&mut self) {
        self.set_units(self.context.units.toggled());
    }

    /// Start a new generation: reset both panels to loading and spawn both fetches.
    pub fn refresh(&mut self) {
        self.generation += 1;
        self.current = Panel::Loading;
        self.forecast = Panel::Loading;

        info!(
            generation = self.generation,
            city = %self.context.city,
            units = %self.context.units,
            "Refreshing dashboard"
        );

        let generation = self.generation;

        let provider = Arc::clone(&self.provider);
        let context = self.context.clone();
        let tx = self.updates.clone();
        tokio::spawn(async move {
            let panel = load_current(provider.as_ref(), &context).await;
            let _ = tx.send(DashboardUpdate { generation, panel: PanelUpdate::Current(panel) });
        });

        let provider = Arc::clone(&self.provider);
        let context = self.context.clone();
        let tx = self.updates.clone();
        tokio::spawn(async move {
            let panel = load_forecast(provider.as_ref(), &context).await;
            let _ = tx.send(DashboardUpdate { generation, panel: PanelUpdate::Forecast(panel) });
        });
    }

    /// Apply a fetch result. Returns `false` when it belongs to an older generation and was dropped.
    pub fn apply(&mut self, update: DashboardUpdate) -> bool {
        if update.generation != self.generation {
            debug!(
                stale = update.generation,
                latest = self.generation,
                "Discarding stale dashboard update"
            );
            return false;
        }

        match update.panel {
            PanelUpdate::Current(panel) => self.current = panel,
            PanelUpdate::Forecast(panel) => self.forecast = panel,
        }
        true
    }

    /// Both panels have resolved for the latest generation.
    pub fn is_settled(&self) -> bool {
        !self.current.is_loading() && !self.forecast.is_loading()
    }
}
