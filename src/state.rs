use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::PhaseColors;
use crate::data::catalog::DatasetCatalog;
use crate::data::loader::SeriesCache;
use crate::data::metrics::{SteamConsumption, steam_consumed};
use crate::data::model::{ColumnSchema, SensorSeries};
use crate::data::phase::PhaseWindow;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which central view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Four stacked panels over the full run.
    Dashboard,
    /// One outlet-pressure panel per selected phase window.
    Phases,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Known scenarios and their phase tables.
    pub catalog: DatasetCatalog,

    /// Logical-to-physical column mapping used for every load.
    pub schema: ColumnSchema,

    /// Write-once load cache, keyed by scenario name.
    pub cache: SeriesCache,

    /// Currently selected scenario, if any.
    pub selected_scenario: Option<String>,

    /// Series of the selected scenario (None until one loads).
    pub series: Option<Arc<SensorSeries>>,

    /// Consumption metric of the selected scenario.
    pub consumption: Option<SteamConsumption>,

    /// Active central view.
    pub view: ViewMode,

    /// Phase-window labels currently ticked for the selected scenario.
    pub selected_phases: BTreeSet<String>,

    /// Colour per phase-window label of the selected scenario.
    pub phase_colors: PhaseColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            catalog: DatasetCatalog::load_or_builtin(Path::new("scenarios.json")),
            schema: ColumnSchema::default(),
            cache: SeriesCache::default(),
            selected_scenario: None,
            series: None,
            consumption: None,
            view: ViewMode::Dashboard,
            selected_phases: BTreeSet::new(),
            phase_colors: PhaseColors::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Load a scenario and recompute its metric. One selection is one
    /// synchronous load-then-compute pass; a failure scopes to this scenario
    /// and leaves previously cached ones untouched.
    pub fn select_scenario(&mut self, name: &str) {
        self.selected_scenario = Some(name.to_owned());
        self.status_message = None;

        match self.cache.get_or_load(&self.catalog, &self.schema, name) {
            Ok(series) => {
                self.consumption = match steam_consumed(&series) {
                    Ok(consumption) => Some(consumption),
                    Err(e) => {
                        log::warn!("no consumption figure for {name:?}: {e}");
                        self.status_message = Some(e.to_string());
                        None
                    }
                };
                self.series = Some(series);
                self.reset_phase_selection(name);
            }
            Err(e) => {
                log::error!("failed to load {name:?}: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.series = None;
                self.consumption = None;
                self.selected_phases.clear();
                self.phase_colors = PhaseColors::default();
            }
        }
    }

    /// Phase windows declared for the selected scenario.
    pub fn phase_windows(&self) -> &[PhaseWindow] {
        self.selected_scenario
            .as_deref()
            .and_then(|name| self.catalog.resolve(name).ok())
            .map(|entry| entry.phases.as_slice())
            .unwrap_or(&[])
    }

    /// Toggle one phase window on or off.
    pub fn toggle_phase(&mut self, label: &str) {
        if !self.selected_phases.remove(label) {
            self.selected_phases.insert(label.to_owned());
        }
    }

    /// Tick every phase window of the selected scenario.
    pub fn select_all_phases(&mut self) {
        self.selected_phases = self
            .phase_windows()
            .iter()
            .map(|w| w.label.clone())
            .collect();
    }

    /// Untick every phase window.
    pub fn select_no_phases(&mut self) {
        self.selected_phases.clear();
    }

    /// Register an externally opened CSV and select it. The file lands in
    /// the catalog under its file stem, with no phase table.
    pub fn open_adhoc(&mut self, path: PathBuf) {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("imported")
            .to_owned();
        self.catalog.insert_adhoc(name.clone(), path);
        self.select_scenario(&name);
    }

    fn reset_phase_selection(&mut self, name: &str) {
        let labels: Vec<String> = self
            .catalog
            .resolve(name)
            .map(|entry| entry.phases.iter().map(|w| w.label.clone()).collect())
            .unwrap_or_default();
        self.selected_phases = labels.iter().cloned().collect();
        self.phase_colors = PhaseColors::new(labels.iter().map(String::as_str));
    }
}
