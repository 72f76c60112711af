/// Data layer: core types, loading, metrics, and phase filtering.
///
/// Architecture:
/// ```text
///  scenario name
///        │
///        ▼
///   ┌──────────┐
///   │ catalog   │  name → CSV path + phase table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + sort → SensorSeries (cached per name)
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │ metrics   │   │  phase    │
///   │ steam kg  │   │  slicing  │
///   └──────────┘   └──────────┘
/// ```
pub mod catalog;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod phase;
