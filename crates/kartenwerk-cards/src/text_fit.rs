// SPDX-License-Identifier: MIT
//
// Text auto-fit for the monospace card banners. Budgets widen in tiers so
// that short labels do not balloon to fill the banner, and font metrics are
// probed once per distinct size through a small memo cache.

use std::collections::HashMap;

use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use kartenwerk_core::EVENT_NAME_MAX_CHARS;

/// Character budget for the date line on the year face ("Apr 2019").
pub const DATE_CHAR_BUDGET: usize = 8;

/// Reference size for the metrics probe. Monospace advance scales linearly
/// with the pixel size, so one probe covers every requested size.
const PROBE_SIZE_PX: f32 = 100.0;

/// Upper bound on distinct cached sizes.
const CACHE_CAP: usize = 64;

/// Sizing budget for a label: 5 for up to five characters, 15 for up to
/// fifteen, 20 otherwise. Labels longer than twenty characters are hard
/// truncated before sizing.
pub fn char_budget(char_count: usize) -> usize {
    if char_count <= 5 {
        5
    } else if char_count <= 15 {
        15
    } else {
        EVENT_NAME_MAX_CHARS
    }
}

/// Hard truncation at the banner character limit.
pub fn truncate_label(text: &str) -> &str {
    match text.char_indices().nth(EVENT_NAME_MAX_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Monospace advance metrics with an explicit, bounded memo cache keyed by
/// the integer pixel size.
pub struct MonoMetrics {
    font: FontRef<'static>,
    advance_cache: HashMap<u32, f32>,
}

impl MonoMetrics {
    pub fn new(font: FontRef<'static>) -> Self {
        Self {
            font,
            advance_cache: HashMap::new(),
        }
    }

    /// Advance of one glyph at the given pixel size. Every glyph in a
    /// monospace face shares this advance.
    pub fn char_width(&mut self, size_px: u32) -> f32 {
        if let Some(&advance) = self.advance_cache.get(&size_px) {
            return advance;
        }
        let advance = self.advance_per_px() * size_px as f32;
        if self.advance_cache.len() < CACHE_CAP {
            self.advance_cache.insert(size_px, advance);
        }
        advance
    }

    /// Largest integer pixel size whose rendered budget fits `avail_px`,
    /// floored at 1.
    pub fn fit_size(&mut self, avail_px: f32, char_budget: usize) -> u32 {
        let per_char = self.advance_per_px() * char_budget.max(1) as f32;
        let size = (avail_px / per_char).floor();
        size.max(1.0) as u32
    }

    /// Rendered width of `char_count` glyphs at `size_px`.
    pub fn text_width(&mut self, size_px: u32, char_count: usize) -> f32 {
        self.char_width(size_px) * char_count as f32
    }

    fn advance_per_px(&self) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(PROBE_SIZE_PX));
        scaled.h_advance(self.font.glyph_id('M')) / PROBE_SIZE_PX
    }
}
