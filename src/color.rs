use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Region palette
// ---------------------------------------------------------------------------

/// Hue step between neighbouring regions, in degrees.
const GOLDEN_ANGLE: f32 = 137.507_77;

/// `n` colours with hues stepped by the golden angle. Lightness alternates
/// between two bands to keep close hues apart when `n` is large.
pub fn region_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 * GOLDEN_ANGLE) % 360.0;
            let lightness = if i % 2 == 0 { 0.45 } else { 0.6 };
            let rgb: Srgb = Hsl::new(hue, 0.6, lightness).into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: region name → Color32
// ---------------------------------------------------------------------------

/// Stable colour per region, so a region keeps its colour across charts.
#[derive(Debug, Clone)]
pub struct RegionColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl RegionColors {
    /// Assign colours to the (sorted) region names of the selection domain.
    pub fn new(regions: &[String]) -> Self {
        let mapping = regions
            .iter()
            .cloned()
            .zip(region_palette(regions.len()))
            .collect();

        RegionColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, region: &str) -> Color32 {
        self.mapping
            .get(region)
            .copied()
            .unwrap_or(self.default_color)
    }
}
