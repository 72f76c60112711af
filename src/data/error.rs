use thiserror::Error;

// ---------------------------------------------------------------------------
// Data-layer error taxonomy
// ---------------------------------------------------------------------------

/// Everything that can go wrong between a scenario name and a plotted series.
///
/// An empty phase slice is *not* an error; emptiness is a valid answer and is
/// represented by an empty [`crate::data::model::SensorSeries`].
#[derive(Debug, Error)]
pub enum DataError {
    /// The scenario name is not in the catalog. No fallback dataset is ever
    /// substituted.
    #[error("unknown scenario {0:?}")]
    NotFound(String),

    /// Malformed timestamp, numeric cell, header row, or `HH:MM` string.
    /// A single bad row fails the whole load; there is no row-skipping.
    #[error("parse error: {0}")]
    Parse(String),

    /// The consumption metric needs at least two ordered samples (or two
    /// totalizer readings).
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
