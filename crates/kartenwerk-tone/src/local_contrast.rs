// SPDX-License-Identifier: MIT
//
// Tiled local contrast enhancement (simplified CLAHE).
//
// The image is partitioned into 64x64 tiles; each tile is stretched between
// its own 1st/99th percentile bounds. Used instead of, never in addition to,
// the global auto-levels stretch.

/// Tile edge length in pixels.
const TILE_SIZE: u32 = 64;

/// Stretch each 64x64 tile of `luma` between its own percentile bounds.
///
/// `luma` holds one luminance byte per pixel in row-major order. Returns a
/// buffer of the same shape with the enhanced values.
pub fn enhance(luma: &[u8], width: u32, height: u32) -> Vec<u8> {
    let mut result = vec![0u8; luma.len()];
    let tiles_x = width.div_ceil(TILE_SIZE);
    let tiles_y = height.div_ceil(TILE_SIZE);

    for tile_y in 0..tiles_y {
        for tile_x in 0..tiles_x {
            let start_x = tile_x * TILE_SIZE;
            let start_y = tile_y * TILE_SIZE;
            let end_x = (start_x + TILE_SIZE).min(width);
            let end_y = (start_y + TILE_SIZE).min(height);

            // Tile-local histogram.
            let mut hist = [0u32; 256];
            let mut tile_pixels = 0u32;
            for y in start_y..end_y {
                for x in start_x..end_x {
                    let value = luma[(y * width + x) as usize];
                    hist[value as usize] += 1;
                    tile_pixels += 1;
                }
            }

            // Tile-local 1st/99th percentile bounds.
            let low_target = tile_pixels as f32 * 0.01;
            let high_target = tile_pixels as f32 * 0.99;
            let mut tile_low = 0u32;
            let mut tile_high = 255u32;
            let mut acc = 0f32;
            for (i, &count) in hist.iter().enumerate() {
                acc += count as f32;
                if acc >= low_target && tile_low == 0 {
                    tile_low = i as u32;
                }
                if acc >= high_target && tile_high == 255 {
                    tile_high = i as u32;
                    break;
                }
            }

            let tile_scale = 255.0 / (tile_high as f32 - tile_low as f32).max(1.0);

            for y in start_y..end_y {
                for x in start_x..end_x {
                    let idx = (y * width + x) as usize;
                    let enhanced =
                        ((luma[idx] as f32 - tile_low as f32) * tile_scale).clamp(0.0, 255.0);
                    result[idx] = enhanced.round() as u8;
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_tile_stays_within_range() {
        let luma = vec![100u8; 64 * 64];
        let out = enhance(&luma, 64, 64);
        assert_eq!(out.len(), luma.len());
        // A constant tile has lo == hi; the max(1) guard keeps the scale
        // finite and the output in range.
        assert!(out.iter().all(|&v| v <= 255));
    }

    #[test]
    fn low_contrast_tile_gets_stretched() {
        // Values confined to 100..=120 should spread out after enhancement.
        let width = 64u32;
        let height = 64u32;
        let luma: Vec<u8> = (0..width * height)
            .map(|i| 100 + (i % 21) as u8)
            .collect();
        let out = enhance(&luma, width, height);

        let min = *out.iter().min().unwrap();
        let max = *out.iter().max().unwrap();
        assert!(min < 30, "low end should approach 0, got {min}");
        assert!(max > 220, "high end should approach 255, got {max}");
    }

    #[test]
    fn tiles_are_stretched_independently() {
        // Left tile: narrow band around 100. Right tile: full 0..255 ramp.
        // The left tile should be stretched hard while the right tile keeps
        // roughly its original values.
        let width = 128u32;
        let height = 64u32;
        let mut luma = vec![0u8; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                let idx = (y * width + x) as usize;
                luma[idx] = if x < 64 {
                    100 + (x % 10) as u8
                } else {
                    (((y * 64 + (x - 64)) * 255) / (64 * 64 - 1)) as u8
                };
            }
        }
        let out = enhance(&luma, width, height);

        // Input 104 in the left tile lands well above 104 after stretching
        // the 100..=109 band across the full range.
        let left_idx = (10 * width + 4) as usize;
        assert_eq!(luma[left_idx], 104);
        assert!(out[left_idx] > 80, "left tile should be stretched up");

        // The right tile already spans the full range, so a mid value moves
        // only slightly.
        let right_idx = (32 * width + 96) as usize;
        let before = luma[right_idx] as i32;
        let after = out[right_idx] as i32;
        assert!((before - after).abs() <= 12, "right tile moved {before} -> {after}");
    }

    #[test]
    fn non_tile_aligned_dimensions_are_handled() {
        let width = 100u32;
        let height = 70u32;
        let luma: Vec<u8> = (0..width * height).map(|i| (i % 256) as u8).collect();
        let out = enhance(&luma, width, height);
        assert_eq!(out.len(), (width * height) as usize);
    }
}
