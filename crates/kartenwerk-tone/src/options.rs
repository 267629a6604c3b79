// SPDX-License-Identifier: MIT
//
// Tone pipeline configuration.

use serde::{Deserialize, Serialize};

/// Options for the photo-to-monochrome tone pipeline.
///
/// All fields have sensible print defaults. `enable_local_contrast` and the
/// global auto-levels stretch are alternatives: when local contrast is on,
/// the global stretch is skipped entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneOptions {
    /// Tiled local contrast enhancement instead of the global stretch.
    /// Slower, blockier, but locally adaptive.
    pub enable_local_contrast: bool,
    /// Add film grain for an analog look. Uses a random source, so output
    /// is not bit-reproducible unless a seeded RNG is injected.
    pub add_grain: bool,
    /// Darken the frame edges with a radial vignette.
    pub add_vignette: bool,
    /// Floyd–Steinberg dithering to pure black/white for ink printers.
    pub enable_dithering: bool,
    /// Gamma override. When `None`, gamma is chosen from the measured median
    /// luminance: 0.8 for shadow-heavy images, 1.2 for highlight-heavy ones.
    pub gamma: Option<f32>,
    /// Steepness of the logistic mid-tone contrast curve (4–12).
    pub s_curve_strength: f32,
    /// Grain amplitude in luminance steps (0–32).
    pub grain_intensity: f32,
    /// Peak vignette opacity at the frame corners (0–0.3).
    pub vignette_strength: f32,
}

impl Default for ToneOptions {
    fn default() -> Self {
        Self {
            enable_local_contrast: false,
            add_grain: true,
            add_vignette: false,
            enable_dithering: false,
            gamma: None,
            s_curve_strength: 8.0,
            grain_intensity: 16.0,
            vignette_strength: 0.15,
        }
    }
}

impl ToneOptions {
    /// The preset used for card photos: light grain, gentle s-curve, no
    /// vignette or dithering, global auto-levels.
    pub fn card_preset() -> Self {
        Self {
            add_grain: true,
            grain_intensity: 12.0,
            s_curve_strength: 6.0,
            ..Self::default()
        }
    }
}
