//! Turns the raw 3-hourly forecast list into a five-day chart series.
//!
//! The API steps in 3 hour increments, so each calendar day has one sample
//! stamped `12:00:00`. That sample stands in for the day.

use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeZone};

use crate::model::{ChartSeries, DailySample, ForecastEntry};

/// Marker in `dt_txt` identifying the midday slot.
pub const MIDDAY_MARKER: &str = "12:00:00";

/// Number of days plotted.
pub const MAX_DAYS: usize = 5;

/// Builds a [`ChartSeries`] from forecast entries, labelling days in the viewer's local time zone.
pub fn extract_series(entries: &[ForecastEntry]) -> ChartSeries {
    extract_series_in(entries, &Local)
}

/// Same as [`extract_series`] with an explicit time zone for the weekday labels.
///
/// Filtering is a plain substring match on `timestamp_text`; the time zone only
/// affects which weekday name a midday sample gets.
pub fn extract_series_in<Tz: TimeZone>(entries: &[ForecastEntry], tz: &Tz) -> ChartSeries {
    midday_entries(entries)
        .map(|entry| DailySample {
            label: weekday_label(entry, tz),
            temperature: entry.temperature,
            feels_like: entry.feels_like,
        })
        .collect()
}

/// The first [`MAX_DAYS`] midday entries, in input order.
pub fn midday_entries(entries: &[ForecastEntry]) -> impl Iterator<Item = &ForecastEntry> {
    entries
        .iter()
        .filter(|entry| entry.timestamp_text.contains(MIDDAY_MARKER))
        .take(MAX_DAYS)
}

fn weekday_label<Tz: TimeZone>(entry: &ForecastEntry, tz: &Tz) -> String {
    if let Some(utc) = DateTime::from_timestamp(entry.timestamp, 0) {
        return utc.with_timezone(tz).weekday().to_string();
    }

    // Timestamp outside chrono's range; fall back to the API's own date text.
    NaiveDateTime::parse_from_str(&entry.timestamp_text, "%Y-%m-%d %H:%M:%S")
        .map(|ndt| ndt.weekday().to_string())
        .unwrap_or_else(|_| "?".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, NaiveDate, Utc};

    /// Entries every `step_hours` starting at `start` (UTC), with temperature = index.
    fn entries_from(start: NaiveDateTime, count: usize, step_hours: i64) -> Vec<ForecastEntry> {
        (0..count)
            .map(|i| {
                let at = start + Duration::hours(step_hours * i as i64);
                ForecastEntry {
                    timestamp: at.and_utc().timestamp(),
                    timestamp_text: at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    temperature: i as f64,
                    feels_like: i as f64 - 0.5,
                }
            })
            .collect()
    }

    fn monday_midnight() -> NaiveDateTime {
        // 2024-01-15 is a Monday.
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date")
    }

    fn assert_equal_lengths(series: &ChartSeries) {
        assert_eq!(series.labels.len(), series.temperature_series.len());
        assert_eq!(series.labels.len(), series.feels_like_series.len());
        assert!(series.len() <= MAX_DAYS);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let series = extract_series_in(&[], &Utc);
        assert!(series.is_empty());
        assert!(series.temperature_series.is_empty());
        assert!(series.feels_like_series.is_empty());
    }

    #[test]
    fn no_midday_entries_gives_empty_series() {
        let start = monday_midnight() + Duration::hours(13);
        // 13:00, 16:00, 19:00, 22:00 - no midday slot
        let entries = entries_from(start, 4, 3);
        assert!(extract_series_in(&entries, &Utc).is_empty());
    }

    #[test]
    fn single_midday_entry_is_kept_verbatim() {
        let entries = vec![
            ForecastEntry {
                timestamp: 1_705_309_200,
                timestamp_text: "2024-01-15 09:00:00".into(),
                temperature: 1.0,
                feels_like: 0.0,
            },
            ForecastEntry {
                timestamp: 1_705_320_000,
                timestamp_text: "2024-01-15 12:00:00".into(),
                temperature: 7.25,
                feels_like: 4.5,
            },
            ForecastEntry {
                timestamp: 1_705_330_800,
                timestamp_text: "2024-01-15 15:00:00".into(),
                temperature: 6.0,
                feels_like: 3.0,
            },
        ];

        let series = extract_series_in(&entries, &Utc);
        assert_eq!(series.labels, vec!["Mon"]);
        assert_eq!(series.temperature_series, vec![7.25]);
        assert_eq!(series.feels_like_series, vec![4.5]);
    }

    #[test]
    fn five_days_of_data_yield_five_chronological_labels() {
        // Two samples per day (09:00 and 12:00) over five days.
        let entries: Vec<ForecastEntry> = (0..5)
            .flat_map(|day| {
                let morning = monday_midnight() + Duration::days(day) + Duration::hours(9);
                entries_from(morning, 2, 3)
            })
            .collect();
        assert_eq!(entries.len(), 10);

        let series = extract_series_in(&entries, &Utc);
        assert_equal_lengths(&series);
        assert_eq!(series.labels, vec!["Mon", "Tue", "Wed", "Thu", "Fri"]);
    }

    #[test]
    fn non_midday_entries_never_appear() {
        let entries = entries_from(monday_midnight(), 40, 3);
        let series = extract_series_in(&entries, &Utc);

        assert_equal_lengths(&series);
        let midday_temps: Vec<f64> = entries
            .iter()
            .filter(|e| e.timestamp_text.ends_with("12:00:00"))
            .map(|e| e.temperature)
            .take(MAX_DAYS)
            .collect();
        assert_eq!(series.temperature_series, midday_temps);
    }

    #[test]
    fn more_than_five_middays_keeps_first_five() {
        // Seven days at 3 hour steps.
        let entries = entries_from(monday_midnight(), 56, 3);
        let series = extract_series_in(&entries, &Utc);

        assert_eq!(series.len(), MAX_DAYS);
        assert_eq!(series.labels, vec!["Mon", "Tue", "Wed", "Thu", "Fri"]);
        // Midday is index 4 of each 8-sample day.
        assert_eq!(series.temperature_series, vec![4.0, 12.0, 20.0, 28.0, 36.0]);
        assert_eq!(series.feels_like_series, vec![3.5, 11.5, 19.5, 27.5, 35.5]);
    }

    #[test]
    fn short_range_is_not_padded() {
        let entries = entries_from(monday_midnight(), 21, 3);
        let series = extract_series_in(&entries, &Utc);
        assert_eq!(series.len(), 3);
        assert_equal_lengths(&series);
    }

    #[test]
    fn labels_follow_viewer_time_zone() {
        // Midday UTC Monday is already Tuesday at UTC+13.
        let entries = entries_from(monday_midnight() + Duration::hours(12), 1, 3);
        let tz = FixedOffset::east_opt(13 * 3600).expect("valid offset");
        let series = extract_series_in(&entries, &tz);
        assert_eq!(series.labels, vec!["Tue"]);
    }

    #[test]
    fn out_of_range_timestamp_falls_back_to_text() {
        let entries = vec![ForecastEntry {
            timestamp: i64::MAX,
            timestamp_text: "2024-01-17 12:00:00".into(),
            temperature: 3.0,
            feels_like: 1.0,
        }];
        let series = extract_series_in(&entries, &Utc);
        assert_eq!(series.labels, vec!["Wed"]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let entries = entries_from(monday_midnight(), 40, 3);
        let first = extract_series_in(&entries, &Utc);
        let second = extract_series_in(&entries, &Utc);
        assert_eq!(first, second);
    }
}
