// SPDX-License-Identifier: MIT
//
// Radial vignette, multiply-blended over the whole buffer as a post-pass.

use image::RgbaImage;

/// Fraction of the corner radius that stays fully transparent.
const CLEAR_RADIUS: f32 = 0.7;

/// Darken the frame edges with a radial gradient.
///
/// Transparent out to 70% of the corner-to-center radius, ramping linearly to
/// `strength` opacity black at the full radius. Black at opacity `a` under a
/// multiply blend scales the underlying value by `1 - a`.
pub fn apply(image: &mut RgbaImage, strength: f32) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let max_radius = (width as f32).hypot(height as f32) / 2.0;

    for (x, y, px) in image.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - center_x;
        let dy = y as f32 + 0.5 - center_y;
        let normalized = dx.hypot(dy) / max_radius;

        if normalized <= CLEAR_RADIUS {
            continue;
        }

        let t = ((normalized - CLEAR_RADIUS) / (1.0 - CLEAR_RADIUS)).min(1.0);
        let alpha = t * strength;
        let factor = 1.0 - alpha;

        for channel in &mut px.0[..3] {
            *channel = (*channel as f32 * factor).round() as u8;
        }
    }
}
