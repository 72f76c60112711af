use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Channel;

// ---------------------------------------------------------------------------
// Fixed channel colors
// ---------------------------------------------------------------------------

/// Plot color for each sensor channel, matching the plant's reporting
/// conventions (red process temperature, indigo outlet pressure, purple flow,
/// ochre valve; setpoints in neutral grey).
pub fn channel_color(channel: Channel) -> Color32 {
    match channel {
        Channel::TempPv => Color32::from_rgb(0xEF, 0x53, 0x50),
        Channel::TempSp | Channel::PressureSp => Color32::from_gray(180),
        Channel::InletPressure => Color32::from_rgb(0x26, 0xA6, 0x9A),
        Channel::OutletPressure => Color32::from_rgb(0x5C, 0x6B, 0xC0),
        Channel::FlowRate => Color32::from_rgb(0xAB, 0x47, 0xBC),
        Channel::Totalizer => Color32::from_rgb(0x8D, 0x6E, 0x63),
        Channel::ValveOpening => Color32::from_rgb(0xD4, 0xA0, 0x17),
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Phase color mapping: window label → Color32
// ---------------------------------------------------------------------------

/// Maps the phase-window labels of the current scenario to distinct colours.
#[derive(Debug, Clone, Default)]
pub struct PhaseColors {
    mapping: BTreeMap<String, Color32>,
}

impl PhaseColors {
    /// Assign one palette colour per label, in the order given.
    pub fn new<'a>(labels: impl Iterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(label, color)| (label.to_owned(), color))
            .collect();
        Self { mapping }
    }

    /// Look up the colour for a window label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_hues() {
        assert!(generate_palette(0).is_empty());
        let palette = generate_palette(3);
        assert_eq!(palette.len(), 3);
        assert_ne!(palette[0], palette[1]);
        assert_ne!(palette[1], palette[2]);
    }

    #[test]
    fn phase_colors_fall_back_to_grey() {
        let colors = PhaseColors::new(["Ramp Up", "Steady State"].into_iter());
        assert_ne!(colors.color_for("Ramp Up"), colors.color_for("Steady State"));
        assert_eq!(colors.color_for("Unknown"), Color32::GRAY);
    }
}
