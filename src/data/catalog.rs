use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use super::error::DataError;
use super::phase::PhaseWindow;

// ---------------------------------------------------------------------------
// ScenarioEntry – one named recorded run
// ---------------------------------------------------------------------------

/// One recorded operational run: a display name, the CSV it lives in, and the
/// phase windows declared for it.
#[derive(Debug, Clone)]
pub struct ScenarioEntry {
    pub name: String,
    pub path: PathBuf,
    pub phases: Vec<PhaseWindow>,
}

// ---------------------------------------------------------------------------
// DatasetCatalog – the closed set of known scenarios
// ---------------------------------------------------------------------------

/// Ordered mapping from scenario name to dataset file and phase table.
///
/// Injected configuration: the application ships a built-in table for the
/// four recorded runs and accepts the same structure from a JSON file. The
/// catalog is the only authority on scenario names; an unknown name is
/// [`DataError::NotFound`], never a fallback dataset.
#[derive(Debug, Clone, Default)]
pub struct DatasetCatalog {
    entries: Vec<ScenarioEntry>,
}

impl DatasetCatalog {
    /// The four recorded runs, matching the files written by
    /// `generate_sample`.
    pub fn builtin() -> Self {
        fn window(label: &str, start: &str, end: &str) -> PhaseWindow {
            PhaseWindow::parse(label, start, end).expect("literal HH:MM")
        }

        let entries = vec![
            ScenarioEntry {
                name: "Scenario 1".to_owned(),
                path: PathBuf::from("data/scenario_1.csv"),
                phases: vec![
                    window("Ramp Up", "00:18", "00:21"),
                    window("Stabilization", "00:21", "00:27"),
                    window("Steady State", "00:27", "00:42"),
                ],
            },
            ScenarioEntry {
                name: "Scenario 2".to_owned(),
                path: PathBuf::from("data/scenario_2.csv"),
                phases: vec![
                    window("Ramp Up", "00:15", "00:19"),
                    window("Stabilization", "00:19", "00:25"),
                    window("Steady State", "00:25", "00:42"),
                ],
            },
            ScenarioEntry {
                name: "Scenario 3".to_owned(),
                path: PathBuf::from("data/scenario_3.csv"),
                phases: vec![
                    window("Ramp Up", "00:20", "00:24"),
                    window("Stabilization", "00:24", "00:30"),
                    window("Steady State", "00:30", "00:42"),
                ],
            },
            ScenarioEntry {
                name: "Scenario 4".to_owned(),
                path: PathBuf::from("data/scenario_4.csv"),
                phases: vec![
                    window("Ramp Up", "00:16", "00:20"),
                    window("Stabilization", "00:20", "00:26"),
                    window("Steady State", "00:26", "00:42"),
                ],
            },
        ];
        Self { entries }
    }

    /// Read a catalog from a JSON file; see [`Self::from_json_str`] for the
    /// expected shape.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        Ok(Self::from_json_str(&text)?)
    }

    /// Parse a catalog from JSON:
    ///
    /// ```json
    /// {
    ///   "scenarios": [
    ///     {
    ///       "name": "Scenario 1",
    ///       "path": "data/scenario_1.csv",
    ///       "phases": [
    ///         { "label": "Ramp Up", "start": "00:18", "end": "00:21" }
    ///       ]
    ///     }
    ///   ]
    /// }
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, DataError> {
        let file: CatalogFile = serde_json::from_str(text)
            .map_err(|e| DataError::Parse(format!("catalog JSON: {e}")))?;

        let mut entries = Vec::with_capacity(file.scenarios.len());
        for spec in file.scenarios {
            let phases = spec
                .phases
                .iter()
                .map(|p| PhaseWindow::parse(&p.label, &p.start, &p.end))
                .collect::<Result<Vec<_>, _>>()?;
            entries.push(ScenarioEntry {
                name: spec.name,
                path: spec.path,
                phases,
            });
        }
        Ok(Self { entries })
    }

    /// Use the JSON catalog next to the executable when present, otherwise
    /// the built-in table.
    pub fn load_or_builtin(path: &Path) -> Self {
        if path.is_file() {
            match Self::from_json_file(path) {
                Ok(catalog) => {
                    log::info!(
                        "using catalog {} ({} scenarios)",
                        path.display(),
                        catalog.entries.len()
                    );
                    return catalog;
                }
                Err(e) => log::error!("ignoring catalog {}: {e:#}", path.display()),
            }
        }
        Self::builtin()
    }

    pub fn entries(&self) -> &[ScenarioEntry] {
        &self.entries
    }

    /// Look a scenario up by name.
    pub fn resolve(&self, name: &str) -> Result<&ScenarioEntry, DataError> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| DataError::NotFound(name.to_owned()))
    }

    /// Register an externally opened CSV under its own name, with no phase
    /// table. Existing entries are never replaced: loaded series are memoized
    /// write-once by name.
    pub fn insert_adhoc(&mut self, name: String, path: PathBuf) {
        if self.resolve(&name).is_ok() {
            log::debug!("scenario {name:?} already registered");
            return;
        }
        self.entries.push(ScenarioEntry {
            name,
            path,
            phases: Vec::new(),
        });
    }
}

// -- Raw JSON shapes, validated into runtime types above --

#[derive(Deserialize)]
struct CatalogFile {
    scenarios: Vec<ScenarioSpec>,
}

#[derive(Deserialize)]
struct ScenarioSpec {
    name: String,
    path: PathBuf,
    #[serde(default)]
    phases: Vec<PhaseSpec>,
}

#[derive(Deserialize)]
struct PhaseSpec {
    label: String,
    start: String,
    end: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_scenario_is_not_found() {
        let catalog = DatasetCatalog::builtin();
        let err = catalog.resolve("Scenario 99").unwrap_err();
        assert!(matches!(err, DataError::NotFound(name) if name == "Scenario 99"));
    }

    #[test]
    fn builtin_scenarios_resolve_in_order() {
        let catalog = DatasetCatalog::builtin();
        let names: Vec<&str> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Scenario 1", "Scenario 2", "Scenario 3", "Scenario 4"]
        );
        assert!(catalog.resolve("Scenario 1").is_ok());
    }

    #[test]
    fn catalog_json_round_trip() {
        let catalog = DatasetCatalog::from_json_str(
            r#"{
                "scenarios": [
                    {
                        "name": "Night run",
                        "path": "data/night.csv",
                        "phases": [
                            { "label": "Ramp Up", "start": "00:18", "end": "00:21" }
                        ]
                    },
                    { "name": "Bare run", "path": "data/bare.csv" }
                ]
            }"#,
        )
        .unwrap();

        let entry = catalog.resolve("Night run").unwrap();
        assert_eq!(entry.path, PathBuf::from("data/night.csv"));
        assert_eq!(entry.phases.len(), 1);
        assert_eq!(entry.phases[0].label, "Ramp Up");
        assert!(catalog.resolve("Bare run").unwrap().phases.is_empty());
    }

    #[test]
    fn catalog_json_rejects_malformed_phase_time() {
        let err = DatasetCatalog::from_json_str(
            r#"{
                "scenarios": [
                    {
                        "name": "Bad",
                        "path": "data/bad.csv",
                        "phases": [ { "label": "X", "start": "aa:bb", "end": "00:10" } ]
                    }
                ]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn adhoc_insert_does_not_replace() {
        let mut catalog = DatasetCatalog::builtin();
        let original = catalog.resolve("Scenario 1").unwrap().path.clone();
        catalog.insert_adhoc("Scenario 1".to_owned(), PathBuf::from("elsewhere.csv"));
        assert_eq!(catalog.resolve("Scenario 1").unwrap().path, original);

        catalog.insert_adhoc("imported".to_owned(), PathBuf::from("imported.csv"));
        assert!(catalog.resolve("imported").is_ok());
    }
}
