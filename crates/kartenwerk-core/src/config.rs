// SPDX-License-Identifier: MIT
//
// Application configuration.

use serde::{Deserialize, Serialize};

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default output path for exported card sheets.
    pub output_path: String,
    /// How long cached event labels are kept before opportunistic purging.
    pub cache_retention_days: i64,
    /// Add film grain during tone conversion.
    pub add_grain: bool,
    /// Enable tiled local contrast instead of global auto-levels.
    pub enable_local_contrast: bool,
    /// Force pure black/white output via error-diffusion dithering.
    pub enable_dithering: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_path: "timeline-cards.pdf".into(),
            cache_retention_days: 30,
            add_grain: true,
            enable_local_contrast: false,
            enable_dithering: false,
        }
    }
}
