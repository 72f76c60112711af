use std::fmt;

use super::error::DataError;
use super::model::{Channel, SensorSeries};

// ---------------------------------------------------------------------------
// SteamConsumption – the one derived scalar per series
// ---------------------------------------------------------------------------

/// How the consumption figure was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumptionMethod {
    /// Last minus first totalizer reading.
    TotalizerDelta,
    /// Time-weighted integration of the flow-rate channel.
    FlowIntegration,
}

impl fmt::Display for ConsumptionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsumptionMethod::TotalizerDelta => write!(f, "totalizer"),
            ConsumptionMethod::FlowIntegration => write!(f, "flow integration"),
        }
    }
}

/// Total steam consumed over a run, in kilograms. Derived data only,
/// recomputed on every load.
#[derive(Debug, Clone, Copy)]
pub struct SteamConsumption {
    pub kilograms: f64,
    pub method: ConsumptionMethod,
}

// ---------------------------------------------------------------------------
// Consumption metric
// ---------------------------------------------------------------------------

/// Total steam consumed over the series.
///
/// Prefers the totalizer channel (last reading minus first); falls back to
/// integrating flow rate over time when no totalizer was recorded. A negative
/// totalizer delta passes through unmodified: a counter reset mid-run is a
/// forensic signal, not something to clamp away.
pub fn steam_consumed(series: &SensorSeries) -> Result<SteamConsumption, DataError> {
    if series.len() < 2 {
        return Err(DataError::InsufficientData(format!(
            "consumption needs at least two samples, got {}",
            series.len()
        )));
    }

    if series.has_channel(Channel::Totalizer) {
        totalizer_delta(series)
    } else {
        flow_integration(series)
    }
}

fn totalizer_delta(series: &SensorSeries) -> Result<SteamConsumption, DataError> {
    let mut readings = series
        .records
        .iter()
        .filter_map(|r| r.value(Channel::Totalizer));

    let first = readings.next();
    let last = readings.last();
    match (first, last) {
        (Some(first), Some(last)) => {
            let kilograms = last - first;
            if kilograms < 0.0 {
                log::warn!("totalizer decreased over the run ({first} → {last}): counter reset?");
            }
            Ok(SteamConsumption {
                kilograms,
                method: ConsumptionMethod::TotalizerDelta,
            })
        }
        _ => Err(DataError::InsufficientData(
            "totalizer column carries fewer than two readings".to_owned(),
        )),
    }
}

/// Sum of `flow × Δt` over consecutive-sample intervals, with the flow taken
/// at the later sample of each interval. The first record contributes no
/// interval; intervals whose later record has no flow value contribute
/// nothing.
fn flow_integration(series: &SensorSeries) -> Result<SteamConsumption, DataError> {
    if !series.has_channel(Channel::FlowRate) {
        return Err(DataError::InsufficientData(
            "series carries neither a totalizer nor a flow-rate channel".to_owned(),
        ));
    }

    let mut kilograms = 0.0;
    for pair in series.records.windows(2) {
        let dt_hours =
            (pair[1].timestamp - pair[0].timestamp).num_milliseconds() as f64 / 3_600_000.0;
        if let Some(flow) = pair[1].value(Channel::FlowRate) {
            kilograms += flow * dt_hours;
        }
    }
    Ok(SteamConsumption {
        kilograms,
        method: ConsumptionMethod::FlowIntegration,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::data::model::SensorRecord;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn series(rows: Vec<(NaiveDateTime, Vec<(Channel, f64)>)>) -> SensorSeries {
        SensorSeries::from_records(
            rows.into_iter()
                .map(|(timestamp, values)| SensorRecord {
                    timestamp,
                    values: values.into_iter().collect(),
                })
                .collect(),
        )
    }

    #[test]
    fn totalizer_delta_is_last_minus_first() {
        let s = series(vec![
            (ts(0, 0, 0), vec![(Channel::Totalizer, 100.0)]),
            (ts(0, 30, 0), vec![(Channel::Totalizer, 150.0)]),
        ]);
        let c = steam_consumed(&s).unwrap();
        assert_eq!(c.method, ConsumptionMethod::TotalizerDelta);
        assert!((c.kilograms - 50.0).abs() < 1e-9);
    }

    #[test]
    fn totalizer_reset_passes_through_negative() {
        let s = series(vec![
            (ts(0, 0, 0), vec![(Channel::Totalizer, 980.0)]),
            (ts(0, 10, 0), vec![(Channel::Totalizer, 990.0)]),
            (ts(0, 20, 0), vec![(Channel::Totalizer, 5.0)]),
        ]);
        let c = steam_consumed(&s).unwrap();
        assert!((c.kilograms - (5.0 - 980.0)).abs() < 1e-9);
    }

    #[test]
    fn flow_integration_weights_by_elapsed_hours() {
        let s = series(vec![
            (ts(0, 0, 0), vec![(Channel::FlowRate, 999.0)]),
            (ts(1, 0, 0), vec![(Channel::FlowRate, 20.0)]),
        ]);
        let c = steam_consumed(&s).unwrap();
        assert_eq!(c.method, ConsumptionMethod::FlowIntegration);
        // 1 h × 20 kg/hr at the later sample; the first row opens no interval.
        assert!((c.kilograms - 20.0).abs() < 1e-9);
    }

    #[test]
    fn flow_integration_sums_consecutive_intervals() {
        let s = series(vec![
            (ts(0, 0, 0), vec![(Channel::FlowRate, 0.0)]),
            (ts(0, 30, 0), vec![(Channel::FlowRate, 10.0)]),
            (ts(1, 0, 0), vec![(Channel::FlowRate, 40.0)]),
        ]);
        let c = steam_consumed(&s).unwrap();
        // 0.5 h × 10 + 0.5 h × 40
        assert!((c.kilograms - 25.0).abs() < 1e-9);
    }

    #[test]
    fn interval_without_flow_reading_contributes_nothing() {
        let s = series(vec![
            (ts(0, 0, 0), vec![(Channel::FlowRate, 10.0)]),
            (ts(0, 30, 0), vec![]),
            (ts(1, 0, 0), vec![(Channel::FlowRate, 40.0)]),
        ]);
        let c = steam_consumed(&s).unwrap();
        assert!((c.kilograms - 20.0).abs() < 1e-9);
    }

    #[test]
    fn one_row_is_insufficient() {
        let s = series(vec![(ts(0, 0, 0), vec![(Channel::Totalizer, 100.0)])]);
        let err = steam_consumed(&s).unwrap_err();
        assert!(matches!(err, DataError::InsufficientData(_)));
    }

    #[test]
    fn empty_series_is_insufficient() {
        let err = steam_consumed(&SensorSeries::default()).unwrap_err();
        assert!(matches!(err, DataError::InsufficientData(_)));
    }

    #[test]
    fn single_totalizer_reading_is_insufficient() {
        let s = series(vec![
            (ts(0, 0, 0), vec![(Channel::Totalizer, 100.0)]),
            (ts(0, 10, 0), vec![(Channel::TempPv, 25.0)]),
        ]);
        let err = steam_consumed(&s).unwrap_err();
        assert!(matches!(err, DataError::InsufficientData(_)));
    }

    #[test]
    fn no_flow_and_no_totalizer_is_insufficient() {
        let s = series(vec![
            (ts(0, 0, 0), vec![(Channel::TempPv, 25.0)]),
            (ts(0, 10, 0), vec![(Channel::TempPv, 26.0)]),
        ]);
        let err = steam_consumed(&s).unwrap_err();
        assert!(matches!(err, DataError::InsufficientData(_)));
    }
}
