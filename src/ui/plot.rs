use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use eframe::egui::{RichText, ScrollArea, Ui};
use egui_plot::{Line, LineStyle, Plot, PlotPoints, VLine};

use crate::color::channel_color;
use crate::data::model::{Channel, SensorSeries};
use crate::data::phase::{PhaseWindow, phase_slice};
use crate::state::{AppState, ViewMode};

// ---------------------------------------------------------------------------
// Central panel – dashboard / phase comparison
// ---------------------------------------------------------------------------

/// The four dashboard panels, top to bottom. Setpoint channels draw dashed.
const PANELS: &[(&str, &str, &[(Channel, bool)])] = &[
    (
        "temperature_panel",
        "Temperature Control",
        &[(Channel::TempSp, true), (Channel::TempPv, false)],
    ),
    (
        "pressure_panel",
        "Pressure Dynamics",
        &[
            (Channel::PressureSp, true),
            (Channel::InletPressure, false),
            (Channel::OutletPressure, false),
        ],
    ),
    (
        "flow_panel",
        "Steam Flow Rate",
        &[(Channel::FlowRate, false)],
    ),
    (
        "valve_panel",
        "Control Valve Output",
        &[(Channel::ValveOpening, false)],
    ),
];

/// Render the central panel for the active view mode.
pub fn central_view(ui: &mut Ui, state: &AppState) {
    let Some(series) = state.series.as_deref() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Select a scenario to begin");
        });
        return;
    };
    if series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("The selected dataset has no samples");
        });
        return;
    }

    match state.view {
        ViewMode::Dashboard => dashboard(ui, state, series),
        ViewMode::Phases => phase_comparison(ui, state, series),
    }
}

// ---------------------------------------------------------------------------
// Dashboard view
// ---------------------------------------------------------------------------

fn dashboard(ui: &mut Ui, state: &AppState, series: &SensorSeries) {
    // start_date is Some for a non-empty series.
    let Some(anchor) = series.start_date() else {
        return;
    };
    let panel_height = ((ui.available_height() / PANELS.len() as f32) - 26.0).max(110.0);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, &(id, title, channels)) in PANELS.iter().enumerate() {
                ui.label(RichText::new(title).strong());

                let unit = channels
                    .first()
                    .map(|&(ch, _)| ch.unit())
                    .unwrap_or_default();
                let mut plot = Plot::new(id)
                    .legend(egui_plot::Legend::default())
                    .height(panel_height)
                    .y_axis_label(unit)
                    .allow_boxed_zoom(true)
                    .allow_drag(true)
                    .allow_scroll(false)
                    .allow_zoom(true);
                if i == PANELS.len() - 1 {
                    plot = plot.x_axis_label("Time of day (min)");
                }

                plot.show(ui, |plot_ui| {
                    for &(channel, dashed) in channels {
                        if let Some(line) = channel_line(series, anchor, channel, dashed) {
                            plot_ui.line(line);
                        }
                    }
                    for window in state.phase_windows() {
                        if !state.selected_phases.contains(&window.label) {
                            continue;
                        }
                        let color = state.phase_colors.color_for(&window.label);
                        plot_ui.vline(
                            VLine::new(minute_of_day(window.start))
                                .name(&window.label)
                                .color(color)
                                .style(LineStyle::dashed_dense()),
                        );
                        plot_ui.vline(
                            VLine::new(minute_of_day(window.end))
                                .name(&window.label)
                                .color(color)
                                .style(LineStyle::dashed_dense()),
                        );
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Phase comparison view
// ---------------------------------------------------------------------------

fn phase_comparison(ui: &mut Ui, state: &AppState, series: &SensorSeries) {
    let windows: Vec<&PhaseWindow> = state
        .phase_windows()
        .iter()
        .filter(|w| state.selected_phases.contains(&w.label))
        .collect();

    if windows.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Tick at least one phase window to compare");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for window in windows {
                let color = state.phase_colors.color_for(&window.label);
                ui.label(
                    RichText::new(format!(
                        "{}  {}–{}",
                        window.label,
                        window.start.format("%H:%M"),
                        window.end.format("%H:%M")
                    ))
                    .strong()
                    .color(color),
                );

                let slice = phase_slice(series, window);
                if slice.is_empty() {
                    ui.label("No samples in this window.");
                }
                // An empty slice renders as an empty plot; that is a valid
                // outcome, not a failure.
                let anchor = slice.start_date().or(series.start_date());
                Plot::new(format!("phase_{}", window.label))
                    .legend(egui_plot::Legend::default())
                    .height(220.0)
                    .y_axis_label("bar")
                    .x_axis_label("Time of day (min)")
                    .allow_boxed_zoom(true)
                    .allow_drag(true)
                    .allow_scroll(false)
                    .allow_zoom(true)
                    .show(ui, |plot_ui| {
                        let Some(anchor) = anchor else { return };
                        if let Some(line) =
                            channel_line(&slice, anchor, Channel::PressureSp, true)
                        {
                            plot_ui.line(line);
                        }
                        if let Some(points) =
                            channel_points(&slice, anchor, Channel::OutletPressure)
                        {
                            plot_ui.line(
                                Line::new(points)
                                    .name(Channel::OutletPressure.label())
                                    .color(color)
                                    .width(1.5),
                            );
                        }
                    });
                ui.add_space(8.0);
            }
        });
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Minutes since midnight of the anchor date. Monotone even if the series
/// runs past midnight, matching the single-day window anchoring.
fn x_minutes(anchor: NaiveDate, ts: NaiveDateTime) -> f64 {
    let midnight = anchor.and_time(NaiveTime::MIN);
    ts.signed_duration_since(midnight).num_milliseconds() as f64 / 60_000.0
}

fn minute_of_day(time: NaiveTime) -> f64 {
    f64::from(time.num_seconds_from_midnight()) / 60.0
}

fn channel_points(
    series: &SensorSeries,
    anchor: NaiveDate,
    channel: Channel,
) -> Option<PlotPoints> {
    let samples = series.channel_points(channel);
    if samples.is_empty() {
        return None;
    }
    Some(
        samples
            .into_iter()
            .map(|(ts, value)| [x_minutes(anchor, ts), value])
            .collect(),
    )
}

fn channel_line(
    series: &SensorSeries,
    anchor: NaiveDate,
    channel: Channel,
    dashed: bool,
) -> Option<Line> {
    let points = channel_points(series, anchor, channel)?;
    let mut line = Line::new(points)
        .name(channel.label())
        .color(channel_color(channel))
        .width(1.5);
    if dashed {
        line = line.style(LineStyle::dashed_loose());
    }
    Some(line)
}
