use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, ViewMode};

// ---------------------------------------------------------------------------
// Left side panel – scenario and phase selection
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Scenarios");
    ui.separator();

    // Clone what we need so we can mutate state inside the loops.
    let scenario_names: Vec<String> = state
        .catalog
        .entries()
        .iter()
        .map(|e| e.name.clone())
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Scenario selector ----
            for name in &scenario_names {
                let is_selected = state.selected_scenario.as_deref() == Some(name);
                if ui.selectable_label(is_selected, name).clicked() && !is_selected {
                    state.select_scenario(name);
                }
            }

            ui.separator();

            // ---- View switch ----
            ui.strong("View");
            ui.horizontal(|ui: &mut Ui| {
                if ui
                    .selectable_label(state.view == ViewMode::Dashboard, "Dashboard")
                    .clicked()
                {
                    state.view = ViewMode::Dashboard;
                }
                if ui
                    .selectable_label(state.view == ViewMode::Phases, "Phases")
                    .clicked()
                {
                    state.view = ViewMode::Phases;
                }
            });

            ui.separator();

            // ---- Phase windows of the selected scenario ----
            ui.strong("Phase windows");
            let windows: Vec<(String, String)> = state
                .phase_windows()
                .iter()
                .map(|w| {
                    (
                        w.label.clone(),
                        format!(
                            "{}  {}–{}",
                            w.label,
                            w.start.format("%H:%M"),
                            w.end.format("%H:%M")
                        ),
                    )
                })
                .collect();

            if windows.is_empty() {
                ui.label("No phase table for this scenario.");
            } else {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        state.select_all_phases();
                    }
                    if ui.small_button("None").clicked() {
                        state.select_no_phases();
                    }
                });

                for (label, text) in &windows {
                    let mut checked = state.selected_phases.contains(label);
                    let swatch = state.phase_colors.color_for(label);
                    if ui
                        .checkbox(&mut checked, RichText::new(text).color(swatch))
                        .changed()
                    {
                        state.toggle_phase(label);
                    }
                }
            }

            ui.separator();

            // ---- Consumption readout ----
            ui.strong("Total steam consumed");
            match &state.consumption {
                Some(c) => {
                    ui.label(RichText::new(format!("{:.1} kg", c.kilograms)).size(20.0));
                    ui.small(format!("via {}", c.method));
                }
                None => {
                    ui.label(RichText::new("—").size(20.0));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(series) = &state.series {
            if let Some((first, last)) = series.time_span() {
                ui.label(format!(
                    "{} samples, {} – {}",
                    series.len(),
                    first.format("%H:%M:%S"),
                    last.format("%H:%M:%S")
                ));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sensor log")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("opening {}", path.display());
        state.open_adhoc(path);
    }
}
