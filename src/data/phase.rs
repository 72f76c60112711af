use chrono::NaiveTime;

use super::error::DataError;
use super::model::SensorSeries;

// ---------------------------------------------------------------------------
// PhaseWindow – a named time-of-day interval
// ---------------------------------------------------------------------------

/// A named, fixed time-of-day interval ("Ramp Up", "Steady State", …) used to
/// compare controller behaviour across scenarios. Declared per scenario in
/// the catalog; never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseWindow {
    pub label: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl PhaseWindow {
    pub fn new(label: impl Into<String>, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    /// Parse a window from `HH:MM` 24-hour strings (no timezone).
    pub fn parse(label: &str, start: &str, end: &str) -> Result<Self, DataError> {
        let parse_hhmm = |raw: &str| {
            NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| {
                DataError::Parse(format!(
                    "phase window {label:?}: {raw:?} is not a valid HH:MM time"
                ))
            })
        };
        Ok(Self::new(label, parse_hhmm(start)?, parse_hhmm(end)?))
    }
}

// ---------------------------------------------------------------------------
// Phase slicing
// ---------------------------------------------------------------------------

/// Rows of `series` whose timestamp falls within the window, inclusive on
/// both ends.
///
/// The window's date is taken from the series' first record; runs are assumed
/// to fit in one calendar day, so on a series that crosses midnight the rows
/// past midnight fall outside the window. A window with `start > end` selects
/// nothing. An empty result is a valid answer, not an error.
pub fn phase_slice(series: &SensorSeries, window: &PhaseWindow) -> SensorSeries {
    let Some(date) = series.start_date() else {
        return SensorSeries::default();
    };
    let start = date.and_time(window.start);
    let end = date.and_time(window.end);

    let records = series
        .records
        .iter()
        .filter(|r| r.timestamp >= start && r.timestamp <= end)
        .cloned()
        .collect();
    SensorSeries::from_records(records)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::data::model::SensorRecord;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn series_at(stamps: &[NaiveDateTime]) -> SensorSeries {
        SensorSeries::from_records(
            stamps
                .iter()
                .map(|&timestamp| SensorRecord {
                    timestamp,
                    values: BTreeMap::new(),
                })
                .collect(),
        )
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let series = series_at(&[
            ts(0, 17, 59),
            ts(0, 18, 0),
            ts(0, 19, 30),
            ts(0, 21, 0),
            ts(0, 21, 1),
        ]);
        let window = PhaseWindow::parse("Ramp Up", "00:18", "00:21").unwrap();
        let slice = phase_slice(&series, &window);
        let kept: Vec<NaiveDateTime> = slice.records.iter().map(|r| r.timestamp).collect();
        assert_eq!(kept, vec![ts(0, 18, 0), ts(0, 19, 30), ts(0, 21, 0)]);
    }

    #[test]
    fn inverted_window_selects_nothing() {
        let series = series_at(&[ts(0, 10, 0), ts(0, 20, 0)]);
        let window = PhaseWindow::parse("Inverted", "00:30", "00:05").unwrap();
        let slice = phase_slice(&series, &window);
        assert!(slice.is_empty());
    }

    #[test]
    fn empty_series_yields_empty_slice() {
        let window = PhaseWindow::parse("Any", "00:00", "23:59").unwrap();
        let slice = phase_slice(&SensorSeries::default(), &window);
        assert!(slice.is_empty());
    }

    #[test]
    fn window_anchors_to_first_record_date() {
        let next_day = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 19, 0)
            .unwrap();
        let series = series_at(&[ts(23, 50, 0), next_day]);
        // 00:18–00:21 lands on 2024-01-01, before the series starts; the
        // sample past midnight is on the next date and is excluded.
        let window = PhaseWindow::parse("Ramp Up", "00:18", "00:21").unwrap();
        let slice = phase_slice(&series, &window);
        assert!(slice.is_empty());
    }

    #[test]
    fn malformed_time_of_day_is_a_parse_error() {
        let err = PhaseWindow::parse("Bad", "24:99", "00:10").unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
        let err = PhaseWindow::parse("Bad", "00:10", "later").unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }
}
