use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Channel – one logical sensor signal
// ---------------------------------------------------------------------------

/// The closed set of logical sensor channels a scenario log can carry.
///
/// Which channels actually appear varies by dataset; the totalizer in
/// particular is absent on runs recorded before the flow computer was fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    TempPv,
    TempSp,
    InletPressure,
    OutletPressure,
    PressureSp,
    FlowRate,
    Totalizer,
    ValveOpening,
}

impl Channel {
    pub const ALL: [Channel; 8] = [
        Channel::TempPv,
        Channel::TempSp,
        Channel::InletPressure,
        Channel::OutletPressure,
        Channel::PressureSp,
        Channel::FlowRate,
        Channel::Totalizer,
        Channel::ValveOpening,
    ];

    /// Short label used in plot legends.
    pub fn label(self) -> &'static str {
        match self {
            Channel::TempPv => "Temp PV",
            Channel::TempSp => "Temp SP",
            Channel::InletPressure => "Inlet P1",
            Channel::OutletPressure => "Outlet P2",
            Channel::PressureSp => "Pressure SP",
            Channel::FlowRate => "Steam Flow",
            Channel::Totalizer => "Totalizer",
            Channel::ValveOpening => "Valve",
        }
    }

    /// Engineering unit of the channel.
    pub fn unit(self) -> &'static str {
        match self {
            Channel::TempPv | Channel::TempSp => "°C",
            Channel::InletPressure | Channel::OutletPressure | Channel::PressureSp => "bar",
            Channel::FlowRate => "kg/hr",
            Channel::Totalizer => "kg",
            Channel::ValveOpening => "%",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// ColumnSchema – logical channel → physical CSV header
// ---------------------------------------------------------------------------

/// Maps logical fields to the physical column names of the historian export.
///
/// The timestamp column is required; every channel column is optional.
/// Resolved once against the header row at load time — the loader never looks
/// a name up per row.
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    /// Header of the required timestamp column.
    pub timestamp: String,
    /// Header name for each channel the schema knows about.
    pub channels: Vec<(Channel, String)>,
}

impl Default for ColumnSchema {
    /// Column names as written by the plant historian export.
    fn default() -> Self {
        Self {
            timestamp: "Timestamp".to_owned(),
            channels: vec![
                (Channel::TempPv, "Process Temp".to_owned()),
                (Channel::TempSp, "Process Temp SP".to_owned()),
                (Channel::FlowRate, "Steam Flow Rate".to_owned()),
                (Channel::Totalizer, "Steam Totalizer".to_owned()),
                (Channel::ValveOpening, "QualSteam Valve Opening".to_owned()),
                (Channel::InletPressure, "Inlet Steam Pressure".to_owned()),
                (Channel::OutletPressure, "Outlet Steam Pressure".to_owned()),
                (Channel::PressureSp, "Pressure SP".to_owned()),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// SensorRecord – one sample (one CSV row)
// ---------------------------------------------------------------------------

/// A single sample: a timestamp plus whichever channel values the row carried.
/// Empty CSV cells are absent values, not zeros.
#[derive(Debug, Clone)]
pub struct SensorRecord {
    pub timestamp: NaiveDateTime,
    pub values: BTreeMap<Channel, f64>,
}

impl SensorRecord {
    pub fn value(&self, channel: Channel) -> Option<f64> {
        self.values.get(&channel).copied()
    }
}

// ---------------------------------------------------------------------------
// SensorSeries – one loaded scenario
// ---------------------------------------------------------------------------

/// A complete scenario log, sorted non-decreasing by timestamp.
///
/// Construction sorts (stably, so duplicate timestamps keep their input
/// order) and indexes channel presence; the series is immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct SensorSeries {
    pub records: Vec<SensorRecord>,
    /// Channels that appear on at least one record.
    pub channels: BTreeSet<Channel>,
}

impl SensorSeries {
    pub fn from_records(mut records: Vec<SensorRecord>) -> Self {
        records.sort_by_key(|r| r.timestamp);
        let channels = records
            .iter()
            .flat_map(|r| r.values.keys().copied())
            .collect();
        Self { records, channels }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_channel(&self, channel: Channel) -> bool {
        self.channels.contains(&channel)
    }

    /// Ordered `(timestamp, value)` pairs for one channel, skipping records
    /// where the channel is absent. This is the shape the plot layer consumes.
    pub fn channel_points(&self, channel: Channel) -> Vec<(NaiveDateTime, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.value(channel).map(|v| (r.timestamp, v)))
            .collect()
    }

    /// Calendar date of the first record. Phase windows anchor to this.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.timestamp.date())
    }

    /// First and last timestamps of the series.
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }

    /// A run is assumed to fit in one calendar day; phase filtering anchors
    /// to the first record's date and cannot reach past midnight.
    pub fn spans_multiple_days(&self) -> bool {
        match self.time_span() {
            Some((first, last)) => first.date() != last.date(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn record(timestamp: NaiveDateTime, values: &[(Channel, f64)]) -> SensorRecord {
        SensorRecord {
            timestamp,
            values: values.iter().copied().collect(),
        }
    }

    #[test]
    fn from_records_sorts_by_timestamp() {
        let series = SensorSeries::from_records(vec![
            record(ts(0, 30, 0), &[(Channel::FlowRate, 3.0)]),
            record(ts(0, 10, 0), &[(Channel::FlowRate, 1.0)]),
            record(ts(0, 20, 0), &[(Channel::FlowRate, 2.0)]),
        ]);
        let flows: Vec<f64> = series
            .records
            .iter()
            .map(|r| r.value(Channel::FlowRate).unwrap())
            .collect();
        assert_eq!(flows, vec![1.0, 2.0, 3.0]);
        for pair in series.records.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[test]
    fn sort_is_stable_for_duplicate_timestamps() {
        let series = SensorSeries::from_records(vec![
            record(ts(0, 10, 0), &[(Channel::ValveOpening, 1.0)]),
            record(ts(0, 10, 0), &[(Channel::ValveOpening, 2.0)]),
            record(ts(0, 5, 0), &[(Channel::ValveOpening, 0.0)]),
            record(ts(0, 10, 0), &[(Channel::ValveOpening, 3.0)]),
        ]);
        let valves: Vec<f64> = series
            .records
            .iter()
            .map(|r| r.value(Channel::ValveOpening).unwrap())
            .collect();
        assert_eq!(valves, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn channel_index_is_the_union_over_records() {
        let series = SensorSeries::from_records(vec![
            record(ts(0, 0, 0), &[(Channel::TempPv, 25.0)]),
            record(ts(0, 0, 10), &[(Channel::FlowRate, 40.0)]),
        ]);
        assert!(series.has_channel(Channel::TempPv));
        assert!(series.has_channel(Channel::FlowRate));
        assert!(!series.has_channel(Channel::Totalizer));
    }

    #[test]
    fn channel_points_skips_absent_values() {
        let series = SensorSeries::from_records(vec![
            record(ts(0, 0, 0), &[(Channel::TempPv, 25.0)]),
            record(ts(0, 0, 10), &[]),
            record(ts(0, 0, 20), &[(Channel::TempPv, 26.0)]),
        ]);
        let points = series.channel_points(Channel::TempPv);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], (ts(0, 0, 0), 25.0));
        assert_eq!(points[1], (ts(0, 0, 20), 26.0));
    }

    #[test]
    fn multi_day_detection() {
        let single = SensorSeries::from_records(vec![
            record(ts(0, 0, 0), &[]),
            record(ts(23, 59, 59), &[]),
        ]);
        assert!(!single.spans_multiple_days());

        let next_day = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 1)
            .unwrap();
        let multi = SensorSeries::from_records(vec![
            record(ts(23, 59, 0), &[]),
            record(next_day, &[]),
        ]);
        assert!(multi.spans_multiple_days());
    }
}
