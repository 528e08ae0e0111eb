use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Metric or imperial display, also sent as the API `units` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    Metric,
    #[default]
    Imperial,
}

impl UnitPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "metric",
            UnitPreference::Imperial => "imperial",
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "°C",
            UnitPreference::Imperial => "°F",
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            UnitPreference::Metric => "m/s",
            UnitPreference::Imperial => "mph",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            UnitPreference::Metric => UnitPreference::Imperial,
            UnitPreference::Imperial => UnitPreference::Metric,
        }
    }

    /// Legend for the temperature line, e.g. `Avg Temp (°C)`.
    pub fn temperature_legend(&self) -> String {
        format!("Avg Temp ({})", self.temperature_symbol())
    }

    /// Legend for the feels-like line, e.g. `Feels Like (°F)`.
    pub fn feels_like_legend(&self) -> String {
        format!("Feels Like ({})", self.temperature_symbol())
    }

    pub const fn all() -> &'static [UnitPreference] {
        &[UnitPreference::Metric, UnitPreference::Imperial]
    }
}

impl fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitPreference {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" | "c" | "celsius" => Ok(UnitPreference::Metric),
            "imperial" | "f" | "fahrenheit" => Ok(UnitPreference::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

impl FromStr for UnitPreference {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// The city and units the dashboard is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardContext {
    pub city: String,
    pub units: UnitPreference,
}

impl DashboardContext {
    pub fn new(city: impl Into<String>, units: UnitPreference) -> Self {
        Self { city: city.into(), units }
    }
}

/// One 3-hourly sample from the forecast endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Unix seconds.
    pub timestamp: i64,
    /// `YYYY-MM-DD HH:MM:SS` as supplied by the API.
    pub timestamp_text: String,
    pub temperature: f64,
    pub feels_like: f64,
}

/// The midday sample chosen to represent one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySample {
    pub label: String,
    pub temperature: f64,
    pub feels_like: f64,
}

/// Equal-length label / temperature / feels-like columns ready for plotting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub temperature_series: Vec<f64>,
    pub feels_like_series: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Re-zips the columns into per-day samples.
    pub fn samples(&self) -> impl Iterator<Item = DailySample> + '_ {
        self.labels
            .iter()
            .zip(&self.temperature_series)
            .zip(&self.feels_like_series)
            .map(|((label, &temperature), &feels_like)| DailySample {
                label: label.clone(),
                temperature,
                feels_like,
            })
    }
}

impl FromIterator<DailySample> for ChartSeries {
    fn from_iter<I: IntoIterator<Item = DailySample>>(iter: I) -> Self {
        let mut series = ChartSeries::default();
        for sample in iter {
            series.labels.push(sample.label);
            series.temperature_series.push(sample.temperature);
            series.feels_like_series.push(sample.feels_like);
        }
        series
    }
}

/// Current conditions as shown on the weather card. Values are in the units requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city_name: String,
    /// Unix seconds of the observation.
    pub observed_at: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_as_str_roundtrip() {
        for units in UnitPreference::all() {
            let parsed: UnitPreference = units.as_str().parse().expect("roundtrip should succeed");
            assert_eq!(*units, parsed);
        }
    }

    #[test]
    fn unknown_units_error() {
        let err = UnitPreference::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown units"));
    }

    #[test]
    fn toggle_flips_and_labels_follow() {
        let units = UnitPreference::Imperial.toggled();
        assert_eq!(units, UnitPreference::Metric);
        assert_eq!(units.temperature_legend(), "Avg Temp (°C)");
        assert_eq!(units.toggled().feels_like_legend(), "Feels Like (°F)");
        assert_eq!(units.speed_symbol(), "m/s");
    }

    #[test]
    fn chart_series_collects_into_equal_columns() {
        let series: ChartSeries = vec![
            DailySample { label: "Mon".into(), temperature: 20.0, feels_like: 19.0 },
            DailySample { label: "Tue".into(), temperature: 22.5, feels_like: 23.0 },
        ]
        .into_iter()
        .collect();

        assert_eq!(series.labels, vec!["Mon", "Tue"]);
        assert_eq!(series.temperature_series, vec![20.0, 22.5]);
        assert_eq!(series.feels_like_series, vec![19.0, 23.0]);
        assert_eq!(series.samples().count(), 2);
    }
}
