use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;

use super::catalog::DatasetCatalog;
use super::error::DataError;
use super::model::{Channel, ColumnSchema, SensorRecord, SensorSeries};

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

/// Timestamp formats the plant historian has been seen to export.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Load one scenario CSV from disk.
pub fn load_series(path: &Path, schema: &ColumnSchema) -> Result<SensorSeries, DataError> {
    let file = std::fs::File::open(path)?;
    read_series(file, schema)
}

/// Parse a scenario log from any reader.
///
/// The header row is resolved against the schema once: the timestamp column
/// must exist, channel columns are optional, unknown headers are ignored.
/// A row with an unparseable timestamp or a malformed non-empty numeric cell
/// fails the whole load. Output records are sorted ascending by timestamp,
/// stably for duplicates.
pub fn read_series<R: Read>(input: R, schema: &ColumnSchema) -> Result<SensorSeries, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| DataError::Parse(format!("reading CSV header: {e}")))?
        .clone();

    let ts_idx = headers
        .iter()
        .position(|h| h == schema.timestamp)
        .ok_or_else(|| {
            DataError::Parse(format!("missing timestamp column {:?}", schema.timestamp))
        })?;

    let channel_columns: Vec<(Channel, usize)> = schema
        .channels
        .iter()
        .filter_map(|(channel, name)| {
            headers.iter().position(|h| h == name).map(|i| (*channel, i))
        })
        .collect();

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DataError::Parse(format!("CSV row {row_no}: {e}")))?;

        let raw_ts = record.get(ts_idx).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| {
            DataError::Parse(format!("row {row_no}: unparseable timestamp {raw_ts:?}"))
        })?;

        let mut values = BTreeMap::new();
        for &(channel, idx) in &channel_columns {
            let cell = record.get(idx).unwrap_or("");
            if cell.is_empty() {
                continue; // absent value, not an error
            }
            let value: f64 = cell.parse().map_err(|_| {
                DataError::Parse(format!(
                    "row {row_no}, column {:?}: {cell:?} is not a number",
                    headers.get(idx).unwrap_or("")
                ))
            })?;
            values.insert(channel, value);
        }

        records.push(SensorRecord { timestamp, values });
    }

    let series = SensorSeries::from_records(records);
    if series.spans_multiple_days() {
        log::warn!(
            "series spans multiple calendar days; phase windows anchor to the first record's date"
        );
    }
    Ok(series)
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

// ---------------------------------------------------------------------------
// SeriesCache – write-once memoization per scenario name
// ---------------------------------------------------------------------------

/// Explicit load-result cache keyed by scenario name.
///
/// Datasets are static files, so there is no invalidation: the first load of
/// a name wins and every later request returns the same `Arc`. Failed loads
/// are not cached; they fail identically on retry anyway.
#[derive(Debug, Default)]
pub struct SeriesCache {
    loaded: HashMap<String, Arc<SensorSeries>>,
}

impl SeriesCache {
    pub fn get_or_load(
        &mut self,
        catalog: &DatasetCatalog,
        schema: &ColumnSchema,
        scenario: &str,
    ) -> Result<Arc<SensorSeries>, DataError> {
        if let Some(series) = self.loaded.get(scenario) {
            log::debug!("cache hit for {scenario:?}");
            return Ok(Arc::clone(series));
        }

        let entry = catalog.resolve(scenario)?;
        let series = Arc::new(load_series(&entry.path, schema)?);
        log::info!(
            "loaded {scenario:?}: {} records, channels {:?}",
            series.len(),
            series.channels
        );
        self.loaded.insert(scenario.to_owned(), Arc::clone(&series));
        Ok(series)
    }
}
