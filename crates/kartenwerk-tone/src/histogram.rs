// SPDX-License-Identifier: MIT
//
// 256-bin luminance histogram and percentile lookup.

/// Luminance histogram accumulated during the grayscale pass.
#[derive(Debug, Clone)]
pub struct LumaHistogram {
    counts: [u32; 256],
    total: u64,
}

impl LumaHistogram {
    pub fn new() -> Self {
        Self {
            counts: [0; 256],
            total: 0,
        }
    }

    /// Record one pixel's luminance.
    #[inline]
    pub fn record(&mut self, luma: u8) {
        self.counts[luma as usize] += 1;
        self.total += 1;
    }

    /// Number of recorded pixels.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Count in a single bin.
    pub fn count(&self, bin: u8) -> u32 {
        self.counts[bin as usize]
    }

    /// Luminance value at the given percentile (0.0–1.0).
    ///
    /// Walks the histogram until the cumulative count crosses
    /// `percentile * total`, returning the bin index reached. The result is
    /// clamped to [0, 255] by construction.
    pub fn percentile_index(&self, percentile: f32) -> u8 {
        let target = percentile as f64 * self.total as f64;
        let mut acc = 0f64;
        let mut idx = 0usize;
        while acc < target && idx < 255 {
            acc += self.counts[idx] as f64;
            idx += 1;
        }
        idx as u8
    }
}

impl Default for LumaHistogram {
    fn default() -> Self {
        Self::new()
    }
}
