//! Plain-text cards for the terminal.

use chrono::{DateTime, Local, TimeZone, Timelike};
use std::fmt::Write;

use crate::{
    dashboard::Panel,
    model::{ChartSeries, CurrentConditions, UnitPreference},
};

const CHART_HEIGHT: usize = 8;
const COLUMN_WIDTH: usize = 7;
const AXIS_WIDTH: usize = 7;

const TEMPERATURE_MARK: char = '●';
const FEELS_LIKE_MARK: char = '○';
const OVERLAP_MARK: char = '◉';

/// Both cards, current conditions first.
pub fn render_dashboard(
    current: &Panel<CurrentConditions>,
    forecast: &Panel<ChartSeries>,
    units: UnitPreference,
) -> String {
    format!("{}\n{}", render_current(current, units), render_forecast(forecast, units))
}

pub fn render_current(panel: &Panel<CurrentConditions>, units: UnitPreference) -> String {
    render_current_in(panel, units, &Local)
}

/// Current-conditions card with the update time shown in `tz`.
pub fn render_current_in<Tz: TimeZone>(
    panel: &Panel<CurrentConditions>,
    units: UnitPreference,
    tz: &Tz,
) -> String {
    let current = match panel {
        Panel::Loading => return "Loading current weather...\n".to_string(),
        Panel::Failed(message) => return format!("{message}\n"),
        Panel::Ready(current) => current,
    };

    let temp = units.temperature_symbol();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Current Weather in {}    Updated: {}",
        current.city_name,
        clock_time(current.observed_at, tz)
    );
    let _ = writeln!(out, "  {}{}  {}", round_half_up(current.temperature), temp, current.description);
    let _ = writeln!(
        out,
        "  Feels Like: {}{}   Humidity: {}%   Wind: {:.1} {}",
        round_half_up(current.feels_like),
        temp,
        current.humidity_pct,
        current.wind_speed,
        units.speed_symbol()
    );
    out
}

/// Forecast card: legend, text line chart and the plotted values.
pub fn render_forecast(panel: &Panel<ChartSeries>, units: UnitPreference) -> String {
    let series = match panel {
        Panel::Loading => return "Loading forecast...\n".to_string(),
        Panel::Failed(message) => return format!("{message}\n"),
        Panel::Ready(series) => series,
    };

    let mut out = String::from("5-Day Forecast\n");
    if series.is_empty() {
        out.push_str("No forecast data to plot.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{TEMPERATURE_MARK} {}   {FEELS_LIKE_MARK} {}",
        units.temperature_legend(),
        units.feels_like_legend()
    );
    for line in plot(series) {
        let _ = writeln!(out, "{line}");
    }
    out.push('\n');

    let temp = units.temperature_symbol();
    for sample in series.samples() {
        let _ = writeln!(
            out,
            "  {:<4} {:>6.1}{temp}  {:>6.1}{temp}",
            sample.label, sample.temperature, sample.feels_like
        );
    }
    out
}

/// Rows of the chart, top to bottom, followed by the x axis and day labels.
fn plot(series: &ChartSeries) -> Vec<String> {
    let values = series.temperature_series.iter().chain(&series.feels_like_series);
    let min = values.clone().copied().fold(f64::INFINITY, f64::min);
    let max = values.copied().fold(f64::NEG_INFINITY, f64::max);

    let row_of = |value: f64| -> usize {
        if max - min < f64::EPSILON {
            return CHART_HEIGHT / 2;
        }
        let norm = ((value - min) / (max - min)).clamp(0.0, 1.0);
        (norm * (CHART_HEIGHT - 1) as f64).round() as usize
    };

    let temp_rows: Vec<usize> = series.temperature_series.iter().map(|&v| row_of(v)).collect();
    let feels_rows: Vec<usize> = series.feels_like_series.iter().map(|&v| row_of(v)).collect();

    let mut lines = Vec::with_capacity(CHART_HEIGHT + 2);
    for row in (0..CHART_HEIGHT).rev() {
        let axis = if row == CHART_HEIGHT - 1 {
            format!("{max:>width$.1} ┤", width = AXIS_WIDTH)
        } else if row == 0 {
            format!("{min:>width$.1} ┤", width = AXIS_WIDTH)
        } else {
            format!("{:>width$} │", "", width = AXIS_WIDTH)
        };

        let cells: String = temp_rows
            .iter()
            .zip(&feels_rows)
            .map(|(&t, &f)| {
                let mark = match (t == row, f == row) {
                    (true, true) => OVERLAP_MARK,
                    (true, false) => TEMPERATURE_MARK,
                    (false, true) => FEELS_LIKE_MARK,
                    (false, false) => ' ',
                };
                format!("{mark:^width$}", width = COLUMN_WIDTH)
            })
            .collect();

        lines.push(format!("{axis}{}", cells.trim_end()));
    }

    lines.push(format!(
        "{:>width$} └{}",
        "",
        "─".repeat(series.len() * COLUMN_WIDTH),
        width = AXIS_WIDTH
    ));

    let labels: String = series
        .labels
        .iter()
        .map(|label| format!("{label:^width$}", width = COLUMN_WIDTH))
        .collect();
    lines.push(format!("{:>width$}  {}", "", labels.trim_end(), width = AXIS_WIDTH));

    lines
}

/// Rounds .5 upwards, the way the dashboard has always displayed whole degrees.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn clock_time<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| {
            let local = utc.with_timezone(tz);
            format!("{:02}:{:02}", local.hour(), local.minute())
        })
        .unwrap_or_else(|| "--:--".to_string())
}
