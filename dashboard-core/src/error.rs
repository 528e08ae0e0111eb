use thiserror::Error;

/// Failure of a single dashboard fetch.
///
/// Each variant carries the detail that goes to the log; [`DashboardError::user_message`]
/// gives the short text shown in the affected panel.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// No API key available from the environment or the config file.
    #[error("API key is missing. Set {env_var} or run `weather-dashboard configure`.")]
    Configuration { env_var: &'static str },

    /// Transport failure or a non-2xx status.
    #[error("Request to {endpoint} failed: {detail}")]
    Network { endpoint: &'static str, detail: String },

    /// The body did not contain the fields the dashboard needs.
    #[error("Unexpected {endpoint} payload: {detail}")]
    UnexpectedShape { endpoint: &'static str, detail: String },
}

impl DashboardError {
    pub fn network(endpoint: &'static str, detail: impl Into<String>) -> Self {
        Self::Network { endpoint, detail: detail.into() }
    }

    pub fn unexpected_shape(endpoint: &'static str, detail: impl Into<String>) -> Self {
        Self::UnexpectedShape { endpoint, detail: detail.into() }
    }

    /// Panel text for a failed fetch of current conditions for `city`.
    pub fn current_message(&self, city: &str) -> String {
        match self {
            Self::Configuration { .. } => self.to_string(),
            Self::Network { .. } => format!("Failed to fetch current weather for '{city}'."),
            Self::UnexpectedShape { .. } => UNEXPECTED_FORMAT.to_string(),
        }
    }

    /// Panel text for a failed forecast fetch.
    pub fn forecast_message(&self) -> String {
        match self {
            Self::Configuration { .. } => self.to_string(),
            Self::Network { .. } => "Failed to fetch forecast data.".to_string(),
            Self::UnexpectedShape { .. } => UNEXPECTED_FORMAT.to_string(),
        }
    }
}

const UNEXPECTED_FORMAT: &str = "Received an unexpected data format from the weather API.";
